use anyhow::{anyhow, Context, Result};
use clap::Parser;
use flexirent_survey::answers::{load_answer_sheet, replay, ReplayReport, ReplayStatus};
use flexirent_survey::cli::{Command, GlobalArgs, RootArgs, RunArgs, StepsArgs, SubmitArgs};
use flexirent_survey::config::{
    build_gateway, load_config, resolve_gateway_from_env, GatewayOverrides, SurveyConfig,
};
use flexirent_survey::gateway::Gateway;
use flexirent_survey::survey::schema::{Field, InputKind, Role, StepDescriptor, PREFIX_STEPS};
use flexirent_survey::survey::{StepKey, SurveyFlow};
use flexirent_survey::view::TerminalView;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    init_tracing(args.global.verbose);

    match args.command {
        Command::Steps(cmd) => run_steps(&cmd),
        Command::Run(cmd) => run_interactive(&args.global, &cmd),
        Command::Submit(cmd) => run_submit(&args.global, &cmd),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Serialize)]
struct StepRow {
    index: usize,
    key: StepKey,
    title: &'static str,
    input: InputKind,
    options: &'static [&'static str],
    fields: Vec<Field>,
}

fn step_rows(role: Role) -> Vec<StepRow> {
    PREFIX_STEPS
        .iter()
        .chain(role.steps())
        .enumerate()
        .map(|(index, step): (usize, &StepDescriptor)| StepRow {
            index,
            key: step.key,
            title: step.title,
            input: step.input,
            options: step.options,
            fields: step.fields().collect(),
        })
        .collect()
}

fn run_steps(args: &StepsArgs) -> Result<ExitCode> {
    let roles: Vec<Role> = match args.role.as_deref() {
        Some(raw) => vec![Role::parse(raw).ok_or_else(|| {
            anyhow!("unknown role {raw:?} (expected tenant, landlord, both, or other)")
        })?],
        None => Role::ALL.to_vec(),
    };

    if args.json {
        let text = match roles.as_slice() {
            [role] => serde_json::to_string_pretty(&step_rows(*role)),
            _ => {
                let by_role: BTreeMap<&str, Vec<StepRow>> = roles
                    .iter()
                    .map(|role| (role.as_str(), step_rows(*role)))
                    .collect();
                serde_json::to_string_pretty(&by_role)
            }
        }
        .context("serialize steps")?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    for role in roles {
        println!("{} ({})", role.label(), role.as_str());
        for row in step_rows(role) {
            let fields: Vec<&str> = row.fields.iter().map(Field::as_str).collect();
            if fields.is_empty() {
                println!("  {:>2}  {:<10}  {}", row.index, row.key.as_str(), row.title);
            } else {
                println!(
                    "  {:>2}  {:<10}  {}  [{}]",
                    row.index,
                    row.key.as_str(),
                    row.title,
                    fields.join(", ")
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn new_flow(global: &GlobalArgs) -> Result<SurveyFlow<Box<dyn Gateway>>> {
    let config: SurveyConfig = load_config(global.config.as_deref())?;
    let overrides = GatewayOverrides {
        kind: global.gateway,
        endpoint_url: global.endpoint.clone(),
    };
    let resolved = resolve_gateway_from_env(&config, &overrides)?;
    tracing::debug!(settings = ?resolved.settings, "gateway resolved");
    let mut flow = SurveyFlow::new(build_gateway(&resolved));
    flow.update_field(Field::CountryCode, &config.default_country_code)
        .context("apply default country code")?;
    Ok(flow)
}

fn run_interactive(global: &GlobalArgs, _args: &RunArgs) -> Result<ExitCode> {
    let mut flow = new_flow(global)?;
    let stdin = io::stdin();
    let mut view = TerminalView::new(stdin.lock(), io::stdout().lock());
    view.run(&mut flow)?;
    Ok(ExitCode::SUCCESS)
}

fn run_submit(global: &GlobalArgs, args: &SubmitArgs) -> Result<ExitCode> {
    let start = Instant::now();
    let mut flow = new_flow(global)?;
    let sheet = load_answer_sheet(&args.answers)?;
    let report = replay(&mut flow, &sheet)?;
    tracing::info!(
        status = report.status.as_str(),
        elapsed_ms = start.elapsed().as_millis(),
        "submit finished"
    );

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{text}");
    } else {
        print_report(&report);
    }
    if report.status == ReplayStatus::Submitted {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn print_report(report: &ReplayReport) {
    println!("status: {}", report.status.as_str());
    if let Some(step) = report.step {
        println!("step: {step}");
    }
    if let Some(id) = report.receipt.as_ref().and_then(|r| r.record_id.as_deref()) {
        println!("record: {id}");
    }
    if let Some(message) = &report.server_error_message {
        println!("error: {message}");
    }
    if let Some(errors) = &report.field_errors {
        for (field, message) in errors.iter() {
            println!("  {field}: {message}");
        }
    }
    if let Some(errors) = &report.server_errors {
        for message in errors {
            println!("  - {message}");
        }
    }
}
