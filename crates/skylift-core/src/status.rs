//! Run outcome model.
//!
//! Every pipeline stage reports its outcome through [`RunStatus`] instead of
//! exiting the process mid-flight; the binary translates the final status
//! into an exit code in one place.

/// Outcome of a single deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Artifact uploaded and build triggered.
    Success,
    /// No environment rule matched the current branch; deployment skipped.
    NoOp,
    /// Missing or malformed arguments, detected before any work.
    UsageError,
    /// Rule text failed to parse; no deployment attempted.
    ValidationError,
    /// A failure during the HTTP sequence or file I/O.
    RuntimeError,
}

impl RunStatus {
    /// Process exit code for this outcome.
    ///
    /// A skipped deployment is a deliberate no-op, not a failure, so it
    /// shares exit code 0 with success.
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success | RunStatus::NoOp => 0,
            RunStatus::RuntimeError => 1,
            RunStatus::UsageError => 2,
            RunStatus::ValidationError => 3,
        }
    }

    /// Whether the run counts as successful from the caller's perspective.
    pub fn is_ok(self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::NoOp)
    }
}
