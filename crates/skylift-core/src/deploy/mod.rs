//! Deploy orchestration: target resolution and the strictly sequential
//! upload/build pipeline.

pub mod client;

use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::args::{AppTarget, Arguments};
use crate::context::CiContext;
use crate::matcher::{RuleError, match_branch, parse_rules};
use crate::status::RunStatus;

pub use client::{HEROKU_API_BASE, HerokuClient, SourceBlob};

/// One resolved deployment: target app, artifact on disk, optional version
/// metadata for the build record.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub app: String,
    pub artifact_path: PathBuf,
    pub version: Option<String>,
}

/// Milestones reported while the pipeline runs, so frontends can surface
/// progress without owning the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    /// Target app resolved; the HTTP sequence is about to start.
    Started { app: String },
    SourceSlotCreated,
    ArtifactUploaded,
    BuildTriggered,
}

/// How a run ended. Frontends render the details and translate the
/// status into an exit code.
#[derive(Debug)]
pub enum DeployOutcome {
    /// Artifact uploaded and build triggered.
    Deployed,
    /// No environment rule matched the branch; nothing was deployed.
    Skipped { branch_ref: String },
    /// The environments rule text failed to parse; nothing was deployed.
    RuleErrors(Vec<RuleError>),
    /// Rules were given but no branch reference is available to match.
    MissingBranch,
    /// The HTTP sequence or file I/O failed partway through.
    Failed(anyhow::Error),
}

impl DeployOutcome {
    /// Status this outcome maps to.
    pub fn status(&self) -> RunStatus {
        match self {
            DeployOutcome::Deployed => RunStatus::Success,
            DeployOutcome::Skipped { .. } => RunStatus::NoOp,
            DeployOutcome::RuleErrors(_) => RunStatus::ValidationError,
            DeployOutcome::MissingBranch => RunStatus::UsageError,
            DeployOutcome::Failed(_) => RunStatus::RuntimeError,
        }
    }
}

/// Resolve the target app and run the deploy sequence.
///
/// Rule-based targets are resolved against the branch reference before any
/// network activity: broken rule text or an unmatched branch ends the run
/// here, with zero HTTP calls made.
pub async fn execute(
    client: &HerokuClient,
    arguments: &Arguments,
    context: Option<&CiContext>,
    mut progress: impl FnMut(DeployEvent),
) -> DeployOutcome {
    let app = match &arguments.app {
        AppTarget::Direct(app) => app.clone(),
        AppTarget::Rules(rules) => {
            let matchers = match parse_rules(rules) {
                Ok(matchers) => matchers,
                Err(errors) => return DeployOutcome::RuleErrors(errors),
            };
            let Some(context) = context else {
                return DeployOutcome::MissingBranch;
            };
            match match_branch(&matchers, &context.branch_ref) {
                Some(app) => app.to_string(),
                None => {
                    warn!(branch = %context.branch_ref, "no environment matched, skipping");
                    return DeployOutcome::Skipped {
                        branch_ref: context.branch_ref.clone(),
                    };
                }
            }
        }
    };

    progress(DeployEvent::Started { app: app.clone() });
    let request = DeployRequest {
        app,
        artifact_path: arguments.artifact_path.clone(),
        version: context.map(|ctx| ctx.version_string()),
    };

    match run(client, &request, &mut progress).await {
        Ok(()) => DeployOutcome::Deployed,
        Err(err) => DeployOutcome::Failed(err),
    }
}

/// Run the three-call deploy sequence.
///
/// Each step gates the next. The first failure aborts the run with no
/// cleanup: the platform's own slot/build lifecycle is authoritative for
/// anything already created.
pub async fn run(
    client: &HerokuClient,
    request: &DeployRequest,
    mut progress: impl FnMut(DeployEvent),
) -> anyhow::Result<()> {
    info!(
        app = %request.app,
        artifact = %request.artifact_path.display(),
        "starting deployment"
    );

    let blob = client.create_source(&request.app).await?;
    debug!(put_url = %blob.put_url, "source slot created");
    progress(DeployEvent::SourceSlotCreated);

    // Fully buffered, read once; artifacts are uploaded as a single PUT.
    let artifact = std::fs::read(&request.artifact_path).with_context(|| {
        format!(
            "Failed to read artifact: {}",
            request.artifact_path.display()
        )
    })?;
    debug!(bytes = artifact.len(), "artifact read");

    client.upload_artifact(&blob.put_url, artifact).await?;
    info!("artifact uploaded");
    progress(DeployEvent::ArtifactUploaded);

    client
        .trigger_build(&request.app, &blob.get_url, request.version.as_deref())
        .await?;
    info!(app = %request.app, "build triggered");
    progress(DeployEvent::BuildTriggered);

    Ok(())
}
