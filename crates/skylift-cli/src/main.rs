//! Skylift - deploy a build artifact to Heroku from CI.
//!
//! Usage:
//!   skylift --app=<name> --artifact=<path>   # direct run, token from HEROKU_API_TOKEN
//!   skylift                                  # under a workflow, reads INPUT_* variables

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skylift_core::args::{ActionInputs, Arguments, CliFlags, TOKEN_ENV_VAR};
use skylift_core::context::CiContext;
use skylift_core::deploy::{self, DeployEvent, DeployOutcome, HerokuClient};
use skylift_core::status::RunStatus;

#[derive(Parser)]
#[command(name = "skylift")]
#[command(about = "Deploy a build artifact to Heroku", long_about = None)]
struct Cli {
    /// Target Heroku app (direct mode; requires --artifact)
    #[arg(long)]
    app: Option<String>,

    /// Path to the build artifact to upload
    #[arg(long)]
    artifact: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skylift=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let status = run(cli);
    ExitCode::from(status.exit_code() as u8)
}

fn run(cli: Cli) -> RunStatus {
    let flags = CliFlags {
        app: cli.app,
        artifact: cli.artifact,
        token: std::env::var(TOKEN_ENV_VAR).ok(),
    };
    tracing::debug!(cli_mode = flags.is_cli_mode(), "resolving arguments");

    let arguments = match Arguments::resolve(flags, &ActionInputs) {
        Ok(arguments) => arguments,
        Err(err) => {
            eprintln!("{} {err}", style("error:").red());
            return RunStatus::UsageError;
        }
    };

    let context = CiContext::from_env();
    let outcome = run_pipeline(&arguments, context.as_ref());
    let status = outcome.status();
    render_outcome(outcome);
    status
}

/// Build the client and runtime, then hand off to the core pipeline.
fn run_pipeline(arguments: &Arguments, context: Option<&CiContext>) -> DeployOutcome {
    let client = match HerokuClient::new(&arguments.token) {
        Ok(client) => client,
        Err(err) => return DeployOutcome::Failed(err),
    };
    let runtime = match tokio::runtime::Runtime::new().context("Failed to create async runtime") {
        Ok(runtime) => runtime,
        Err(err) => return DeployOutcome::Failed(err),
    };

    runtime.block_on(deploy::execute(&client, arguments, context, |event| {
        match event {
            DeployEvent::Started { app } => println!(
                "Starting deployment for app '{}' using artifact '{}'",
                style(app).blue(),
                style(arguments.artifact_path.display()).magenta()
            ),
            DeployEvent::ArtifactUploaded => {
                println!("{}", style("Artifact uploaded.").cyan());
            }
            DeployEvent::SourceSlotCreated | DeployEvent::BuildTriggered => {}
        }
    }))
}

fn render_outcome(outcome: DeployOutcome) {
    match outcome {
        DeployOutcome::Deployed => {
            println!("{}", style("Success!").green());
        }
        DeployOutcome::Skipped { branch_ref } => {
            println!(
                "{}",
                style(format!(
                    "No environment matches '{branch_ref}'; skipping deployment."
                ))
                .yellow()
            );
        }
        DeployOutcome::RuleErrors(errors) => {
            for error in &errors {
                eprintln!("{} {error}", style("error:").red());
            }
        }
        DeployOutcome::MissingBranch => {
            eprintln!(
                "{} GITHUB_REF not set; environment rules need a branch to match against.",
                style("error:").red()
            );
        }
        DeployOutcome::Failed(err) => report_failure(&err),
    }
}

/// Report a fatal error the way the caller expects: an `::error::` workflow
/// command under GitHub Actions, plain stderr otherwise.
fn report_failure(err: &anyhow::Error) {
    if std::env::var_os("GITHUB_ACTIONS").is_some() {
        println!("::error::{err:#}");
    } else {
        eprintln!("{} {err:#}", style("error:").red());
    }
}
