use std::ffi::OsString;

use clap::Parser;
use dq_core::DynQuizError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli_args;
mod commands;
mod error_map;
mod source_loader;

#[cfg(test)]
mod cli_test_support;

pub(crate) use cli_args::{CheckArgs, Cli, GenerateArgs, Mode, PreviewArgs};
pub(crate) use error_map::{
    emit_error, json_string, map_cli_output_json, map_cli_source_path, map_cli_source_read,
    map_cli_source_scan,
};
pub(crate) use source_loader::{
    collect_definition_files, load_definition, read_definition, resolve_definitions_dir,
};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

/// Logs go to stderr; stdout carries only the `RESULT:` protocol.
fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn run(cli: Cli) -> Result<i32, DynQuizError> {
    match cli.command {
        Mode::Generate(args) => commands::run_generate(args),
        Mode::Preview(args) => commands::run_preview(args),
        Mode::Check(args) => commands::run_check(args),
    }
}
