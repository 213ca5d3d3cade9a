//! CI run context.

/// Facts about the triggering CI run, read from the runner environment.
///
/// Only present when running under a workflow; direct CLI invocations carry
/// no context and therefore no version metadata on the build request.
#[derive(Debug, Clone)]
pub struct CiContext {
    pub branch_ref: String,
    pub commit_sha: String,
    pub actor: String,
}

impl CiContext {
    /// Read the context from the standard GitHub runner variables.
    ///
    /// Returns `None` unless all of `GITHUB_REF`, `GITHUB_SHA` and
    /// `GITHUB_ACTOR` are set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            branch_ref: std::env::var("GITHUB_REF").ok()?,
            commit_sha: std::env::var("GITHUB_SHA").ok()?,
            actor: std::env::var("GITHUB_ACTOR").ok()?,
        })
    }

    /// Create a context with explicit values (for testing).
    pub fn new(
        branch_ref: impl Into<String>,
        commit_sha: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            branch_ref: branch_ref.into(),
            commit_sha: commit_sha.into(),
            actor: actor.into(),
        }
    }

    /// Branch name with the `refs/heads/` prefix stripped.
    pub fn branch_name(&self) -> &str {
        self.branch_ref
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.branch_ref)
    }

    /// Human-readable version string attached to triggered builds,
    /// e.g. `main@1a2b3c4 by octocat`.
    pub fn version_string(&self) -> String {
        // char-based so an unexpected non-hex sha cannot split a byte slice
        let short_sha: String = self.commit_sha.chars().take(7).collect();
        format!("{}@{} by {}", self.branch_name(), short_sha, self.actor)
    }
}
