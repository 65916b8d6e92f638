use thiserror::Error;

/// Errors from stage-registry operations.
///
/// All of these are recoverable at the call site; boundary errors are
/// normally prevented by disabling the corresponding control and never
/// corrupt `WizardState`.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Navigation attempted past the first or last stage. `attempted` is
    /// the index the transition would have landed on (-1 for going back
    /// from stage 0).
    #[error("stage index {attempted} is out of range (stage count {stage_count})")]
    OutOfRange { attempted: i64, stage_count: usize },

    #[error("unknown stage key: '{0}'")]
    UnknownStage(String),

    #[error("invalid data for stage '{stage}': {message}")]
    InvalidStageData { stage: String, message: String },
}

/// Errors from the generation service and its providers.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Terminal generate action invoked with zero qualifying inputs
    /// (e.g. no research items selected). Reported inline to the user.
    #[error("nothing selected: {0}")]
    MissingSelection(String),

    /// A generation call is already pending for this session. The state
    /// and compiled prompt are untouched; retry after it settles.
    #[error("a generation request is already in progress")]
    InFlight,

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("generation request timed out")]
    Timeout,
}
