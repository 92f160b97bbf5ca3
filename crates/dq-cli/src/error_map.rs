use std::fmt::Display;

use dq_core::{DynQuizError, ErrorKind};

fn map_error(code: &'static str, error: impl Display) -> DynQuizError {
    DynQuizError::new(ErrorKind::Configuration, code, error.to_string())
}

pub(crate) fn emit_error(error: DynQuizError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!("ERROR_MSG_JSON:{}", json_string(&error.message));
    if let Some(detail) = &error.detail {
        if let Ok(json) = serde_json::to_string(detail) {
            println!("ERROR_DETAIL_JSON:{}", json);
        }
    }
    1
}

pub(crate) fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> DynQuizError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_scan(error: std::path::StripPrefixError) -> DynQuizError {
    map_error("CLI_SOURCE_SCAN", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> DynQuizError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_output_json(error: serde_json::Error) -> DynQuizError {
    map_error("CLI_OUTPUT_JSON", error)
}
