/// One unit of code handed to an evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRequest {
    /// The fence's language tag, used to pick an interpreter.
    pub language: Option<String>,
    /// Block lines joined with `\n`, whitespace untouched.
    pub code: String,
}

/// Outcome of evaluating one code block. Created per request and never
/// reused across re-runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationResult {
    Success { output: String },
    Failed { message: String, timed_out: bool },
}

impl EvaluationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, EvaluationResult::Success { .. })
    }

    pub fn timed_out(&self) -> bool {
        matches!(self, EvaluationResult::Failed { timed_out: true, .. })
    }

    /// The text to show beneath the code block.
    pub fn text(&self) -> &str {
        match self {
            EvaluationResult::Success { output } => output,
            EvaluationResult::Failed { message, .. } => message,
        }
    }
}
