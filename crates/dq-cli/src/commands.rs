use dq_api::{generate_instance, preview_definition, validate_definition, GenerateInstanceOptions};
use dq_core::DynQuizError;
use dq_runtime::EngineOptions;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    collect_definition_files, emit_error, json_string, load_definition, map_cli_output_json,
    read_definition, resolve_definitions_dir, CheckArgs, GenerateArgs, PreviewArgs,
};

pub(crate) fn run_generate(args: GenerateArgs) -> Result<i32, DynQuizError> {
    let definition = load_definition(&args.definition)?;
    let instance = generate_instance(GenerateInstanceOptions {
        definition,
        randomize: !args.no_randomize,
        random_seed: args.seed,
        engine_options: EngineOptions::default(),
    })?;
    emit_ok("INSTANCE_JSON", &instance, args.pretty)?;
    Ok(0)
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<i32, DynQuizError> {
    let definition = load_definition(&args.definition)?;
    let preview = preview_definition(&definition, args.randomize, args.seed)?;
    emit_ok("PREVIEW_JSON", &preview, false)?;
    Ok(0)
}

#[derive(Debug)]
pub(crate) struct CheckReport {
    pub(crate) relative: String,
    pub(crate) outcome: Result<(), DynQuizError>,
}

pub(crate) fn check_definitions(dir: &str) -> Result<Vec<CheckReport>, DynQuizError> {
    let root = resolve_definitions_dir(dir)?;
    let files = collect_definition_files(&root)?;
    Ok(files
        .into_iter()
        .map(|file| {
            let outcome = read_definition(&file.path)
                .and_then(|definition| validate_definition(&definition))
                .map(|_| ());
            match &outcome {
                Ok(()) => info!(file = %file.relative, "definition ok"),
                Err(error) => warn!(file = %file.relative, code = %error.code, "definition failed"),
            }
            CheckReport {
                relative: file.relative,
                outcome,
            }
        })
        .collect())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<i32, DynQuizError> {
    let reports = check_definitions(&args.dir)?;
    let failed = reports
        .iter()
        .filter(|report| report.outcome.is_err())
        .count();

    let exit_code = if failed == 0 {
        println!("RESULT:OK");
        0
    } else {
        emit_error(DynQuizError::configuration(
            "CLI_CHECK_FAILED",
            format!("{} of {} definitions failed.", failed, reports.len()),
        ))
    };

    for report in &reports {
        match &report.outcome {
            Ok(()) => println!("FILE_OK:{}", json_string(&report.relative)),
            Err(error) => println!(
                "FILE_ERROR:{}|{}|{}",
                json_string(&report.relative),
                error.code,
                json_string(&error.message)
            ),
        }
    }
    println!("CHECKED:{}", reports.len());
    Ok(exit_code)
}

fn emit_ok(label: &str, payload: &impl Serialize, pretty: bool) -> Result<(), DynQuizError> {
    let json = if pretty {
        serde_json::to_string_pretty(payload)
    } else {
        serde_json::to_string(payload)
    }
    .map_err(map_cli_output_json)?;
    println!("RESULT:OK");
    println!("{}:{}", label, json);
    Ok(())
}
