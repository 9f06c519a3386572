use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

/// Error type returned by skill code (handlers, interceptors, error handlers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stage of the dispatch pipeline an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Validating,
    Intercepting,
    Handling,
    ResponseIntercepting,
    ErrorDispatch,
}

/// Failure raised while processing a request.
///
/// Every variant is first offered to the configured error handlers. When none
/// of them claims it, `Skill::process` returns it to the caller unchanged.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "request application id {actual:?} does not match expected application id {expected:?}"
    )]
    IdentityMismatch { expected: String, actual: String },

    #[error("unable to parse request timestamp {timestamp:?}: {source}")]
    MalformedTimestamp {
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(
        "request timestamp {timestamp} was off the current time {now} by more than {tolerance_secs} seconds"
    )]
    StaleOrFutureRequest {
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
        tolerance_secs: u64,
    },

    #[error("request interceptor failed: {0}")]
    Interceptor(#[source] BoxError),

    #[error("request handler failed: {0}")]
    Handler(#[source] BoxError),

    #[error("response interceptor failed: {0}")]
    ResponseInterceptor(#[source] BoxError),

    #[error("error handler failed: {0}")]
    ErrorHandler(#[source] BoxError),
}

impl DispatchError {
    pub fn stage(&self) -> DispatchStage {
        match self {
            DispatchError::IdentityMismatch { .. }
            | DispatchError::MalformedTimestamp { .. }
            | DispatchError::StaleOrFutureRequest { .. } => DispatchStage::Validating,
            DispatchError::Interceptor(_) => DispatchStage::Intercepting,
            DispatchError::Handler(_) => DispatchStage::Handling,
            DispatchError::ResponseInterceptor(_) => DispatchStage::ResponseIntercepting,
            DispatchError::ErrorHandler(_) => DispatchStage::ErrorDispatch,
        }
    }

    /// True for failures of the origin/freshness gate.
    pub fn is_validation(&self) -> bool {
        self.stage() == DispatchStage::Validating
    }
}

/// A directive was appended without one of its required fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponseBuildError {
    #[error("{directive} directive requires a non-empty {field}")]
    MissingField {
        directive: &'static str,
        field: &'static str,
    },
}
