//! # Evaluator Bridge
//!
//! Hands the raw lines of one code block to an [`Evaluator`] and turns
//! whatever comes back into an [`EvaluationResult`]. Failures never escape
//! as errors: a crashed, missing or hung evaluator becomes a failed result
//! that the renderer shows inline.
//!
//! The bridge keeps no cache. Evaluating the same block twice submits it twice.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use super::evaluator::Evaluator;
use super::types::{EvalRequest, EvaluationResult};
use crate::core::deck::CodeBlock;

#[derive(Clone)]
pub struct Bridge {
    evaluator: Arc<dyn Evaluator>,
    timeout: Duration,
}

impl Bridge {
    pub fn new(evaluator: Arc<dyn Evaluator>, timeout: Duration) -> Self {
        Self { evaluator, timeout }
    }

    /// Evaluates one code block, waiting at most `timeout` for the response.
    pub async fn evaluate(&self, block: &CodeBlock) -> EvaluationResult {
        let request = EvalRequest {
            language: block.language.clone(),
            code: block.source(),
        };
        info!(
            "Submitting {} line(s) of {} to evaluator '{}'",
            block.lines.len(),
            block.language.as_deref().unwrap_or("untagged code"),
            self.evaluator.name()
        );

        match tokio::time::timeout(self.timeout, self.evaluator.submit(request)).await {
            Ok(Ok(output)) => EvaluationResult::Success { output },
            Ok(Err(e)) => {
                warn!("Evaluation failed: {}", e);
                EvaluationResult::Failed {
                    message: e.to_string(),
                    timed_out: false,
                }
            }
            Err(_) => {
                warn!(
                    "Evaluator '{}' timed out after {:?}",
                    self.evaluator.name(),
                    self.timeout
                );
                EvaluationResult::Failed {
                    message: format!("evaluation timed out after {}s", self.timeout.as_secs_f32()),
                    timed_out: true,
                }
            }
        }
    }
}
