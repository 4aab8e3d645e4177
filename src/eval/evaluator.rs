use std::fmt;

use async_trait::async_trait;

use super::types::EvalRequest;

/// Errors an evaluator channel can report.
#[derive(Debug)]
pub enum EvalError {
    /// No interpreter for the language, or it could not be started.
    Unavailable(String),
    /// The interpreter ran but failed (non-zero exit, killed by a signal).
    Crashed(String),
    /// The channel to the interpreter went away mid-request.
    ChannelClosed,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Unavailable(msg) => write!(f, "evaluator unavailable: {msg}"),
            EvalError::Crashed(msg) => write!(f, "evaluator failed: {msg}"),
            EvalError::ChannelClosed => write!(f, "evaluator channel closed"),
        }
    }
}

impl std::error::Error for EvalError {}

/// An external interactive session that runs code and answers with its output.
///
/// The response is opaque text. Implementations must not block the thread;
/// the bridge bounds every call with a timeout.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Returns the name of the evaluator, for logs.
    fn name(&self) -> &str;

    /// Submits one unit of code and waits for one complete response.
    async fn submit(&self, request: EvalRequest) -> Result<String, EvalError>;
}
