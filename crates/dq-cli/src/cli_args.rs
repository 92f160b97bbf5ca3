use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dynquiz")]
#[command(about = "Dynamic question generator CLI")]
pub(crate) struct Cli {
    /// Log pipeline stages at debug level on stderr.
    #[arg(long, global = true)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Generate one question instance from a definition file.
    Generate(GenerateArgs),
    /// Show how each final answer's decoys were produced.
    Preview(PreviewArgs),
    /// Validate every `*.question.json` under a directory.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub(crate) struct GenerateArgs {
    #[arg(long = "definition")]
    pub(crate) definition: String,
    #[arg(long = "seed")]
    pub(crate) seed: Option<u64>,
    #[arg(long = "no-randomize")]
    pub(crate) no_randomize: bool,
    #[arg(long = "pretty")]
    pub(crate) pretty: bool,
}

#[derive(Debug, Args)]
pub(crate) struct PreviewArgs {
    #[arg(long = "definition")]
    pub(crate) definition: String,
    #[arg(long = "seed")]
    pub(crate) seed: Option<u64>,
    #[arg(long = "randomize")]
    pub(crate) randomize: bool,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "dir")]
    pub(crate) dir: String,
}
