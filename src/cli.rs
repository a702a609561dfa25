//! CLI argument parsing for the survey binary.
use crate::config::GatewayKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "flexirent",
    version,
    about = "Flexirent rent-installment survey",
    after_help = "Commands:\n  steps [--role <ROLE>]        Print the survey steps\n  run                          Take the survey in the terminal\n  submit --answers <FILE>      Replay an answer sheet and submit it\n\nExamples:\n  flexirent steps --role tenant --json\n  flexirent run --gateway endpoint --endpoint https://example.com/api/submit-survey\n  flexirent submit --answers answers.json --gateway dry_run --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to <config dir>/flexirent/config.json when present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Where submissions go: dry_run, endpoint, or airtable
    #[arg(long, value_name = "KIND", value_parser = parse_gateway_kind, global = true)]
    pub gateway: Option<GatewayKind>,

    /// Survey submission endpoint URL
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Steps(StepsArgs),
    Run(RunArgs),
    Submit(SubmitArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Print the survey steps, optionally for one role")]
pub struct StepsArgs {
    /// Role whose sequence to print (tenant, landlord, both, other)
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Take the survey interactively in the terminal")]
pub struct RunArgs {}

#[derive(Parser, Debug)]
#[command(about = "Replay a JSON answer sheet through the survey and submit it")]
pub struct SubmitArgs {
    /// Answer sheet keyed by field identifier
    #[arg(long, value_name = "FILE")]
    pub answers: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

fn parse_gateway_kind(raw: &str) -> Result<GatewayKind, String> {
    GatewayKind::parse(raw)
        .ok_or_else(|| format!("unknown gateway {raw:?} (expected dry_run, endpoint, or airtable)"))
}
