use thiserror::Error;

pub type Result<T, E = ConfigError> = core::result::Result<T, E>;

/// Failures raised while building an interpreter.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown pattern family: {0}")]
    UnknownFamily(String),
    #[error("invalid {family} pattern `{pattern}`: {source}")]
    Pattern {
        family: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failures of the external text-completion service.
///
/// These never reach callers of the interpreter; the variety gateway and the
/// translator recover from every variant locally.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service not configured")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("completion service returned status {0}")]
    Status(u16),
    #[error("completion service returned no text")]
    EmptyResponse,
    #[error("completion request timed out after {0} ms")]
    Timeout(u64),
}
