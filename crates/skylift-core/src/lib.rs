//! Skylift Core Library
//!
//! Provides the domain logic for deploying build artifacts to Heroku from CI:
//! argument resolution, branch-to-app environment matching, and the
//! source-blob upload / build-trigger protocol.

pub mod args;
pub mod context;
pub mod deploy;
pub mod matcher;
pub mod status;

/// Re-exports of commonly used types
pub mod prelude {
    // Arguments
    pub use crate::args::{AppTarget, Arguments, CliFlags, InputSource};

    // CI context
    pub use crate::context::CiContext;

    // Matching
    pub use crate::matcher::{EnvironmentMatcher, RuleError, match_branch, parse_rules};

    // Deploy
    pub use crate::deploy::{DeployEvent, DeployOutcome, DeployRequest, HerokuClient, SourceBlob};

    // Status
    pub use crate::status::RunStatus;
}
