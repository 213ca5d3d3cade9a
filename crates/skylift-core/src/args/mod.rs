//! Argument resolution.
//!
//! The tool runs in two modes behind one resolution interface: explicit
//! command-line flags (token from the `HEROKU_API_TOKEN` environment
//! variable), or GitHub-Actions-style named inputs when no flags are given.

pub mod inputs;

use std::path::PathBuf;

pub use inputs::{ActionInputs, InputSource, StaticInputs};

/// Environment variable holding the API token in direct CLI runs.
pub const TOKEN_ENV_VAR: &str = "HEROKU_API_TOKEN";

/// Usage hint printed alongside missing-flag errors.
pub const USAGE: &str = "usage: skylift --app=<your app> --artifact=<path>";

/// How the target application is determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppTarget {
    /// App name given literally.
    Direct(String),
    /// App resolved by matching the branch against `/regex/ -> app` rules.
    Rules(String),
}

/// Fully resolved run arguments. Constructed once per run, immutable after.
#[derive(Debug, Clone)]
pub struct Arguments {
    pub app: AppTarget,
    pub artifact_path: PathBuf,
    pub token: String,
}

/// Raw command-line flags, filled in by the binary.
///
/// `token` is read from [`TOKEN_ENV_VAR`] by the caller so resolution stays
/// free of environment access.
#[derive(Debug, Clone, Default)]
pub struct CliFlags {
    pub app: Option<String>,
    pub artifact: Option<PathBuf>,
    pub token: Option<String>,
}

impl CliFlags {
    /// Whether any flag was passed, selecting direct CLI mode.
    pub fn is_cli_mode(&self) -> bool {
        self.app.is_some() || self.artifact.is_some()
    }
}

/// Argument resolution failure, reported before any work starts.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("not enough arguments provided.\n{USAGE}")]
    MissingFlags,
    #[error("{TOKEN_ENV_VAR} not set in the environment.")]
    MissingToken,
    #[error("required input '{0}' is missing or empty")]
    MissingInput(&'static str),
    #[error("neither 'app' nor 'environments' input was provided")]
    MissingAppSource,
}

impl Arguments {
    /// Resolve arguments from flags when present, otherwise from CI inputs.
    pub fn resolve(flags: CliFlags, inputs: &dyn InputSource) -> Result<Self, ArgumentError> {
        if flags.is_cli_mode() {
            Self::from_flags(flags)
        } else {
            Self::from_inputs(inputs)
        }
    }

    fn from_flags(flags: CliFlags) -> Result<Self, ArgumentError> {
        let (Some(app), Some(artifact)) = (flags.app, flags.artifact) else {
            return Err(ArgumentError::MissingFlags);
        };
        let token = flags.token.ok_or(ArgumentError::MissingToken)?;
        Ok(Self {
            app: AppTarget::Direct(app),
            artifact_path: artifact,
            token,
        })
    }

    fn from_inputs(inputs: &dyn InputSource) -> Result<Self, ArgumentError> {
        let artifact = inputs
            .input("artifact-path")
            .or_else(|| inputs.input("artifact"))
            .ok_or(ArgumentError::MissingInput("artifact-path"))?;
        let token = inputs
            .input("token")
            .ok_or(ArgumentError::MissingInput("token"))?;

        // The two action variants differ only here: a literal app name, or
        // a rule string resolved against the branch later.
        let app = if let Some(app) = inputs.input("app") {
            AppTarget::Direct(app)
        } else if let Some(rules) = inputs.input("environments") {
            AppTarget::Rules(rules)
        } else {
            return Err(ArgumentError::MissingAppSource);
        };

        Ok(Self {
            app,
            artifact_path: PathBuf::from(artifact),
            token,
        })
    }
}
