//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::deck::CodeBlock;
use crate::eval::{EvalError, EvalRequest, Evaluator};

/// Answers every submission with the submitted code.
#[derive(Default)]
pub struct EchoEvaluator {
    calls: AtomicUsize,
}

impl EchoEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Evaluator for EchoEvaluator {
    fn name(&self) -> &str {
        "echo"
    }

    async fn submit(&self, request: EvalRequest) -> Result<String, EvalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(request.code)
    }
}

/// Reports a broken channel for every submission.
pub struct FailingEvaluator;

#[async_trait]
impl Evaluator for FailingEvaluator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn submit(&self, _request: EvalRequest) -> Result<String, EvalError> {
        Err(EvalError::ChannelClosed)
    }
}

/// Never answers.
pub struct SilentEvaluator;

#[async_trait]
impl Evaluator for SilentEvaluator {
    fn name(&self) -> &str {
        "silent"
    }

    async fn submit(&self, _request: EvalRequest) -> Result<String, EvalError> {
        std::future::pending().await
    }
}

/// Builds an evaluable code block from borrowed lines.
pub fn code_block(language: &str, lines: &[&str]) -> CodeBlock {
    CodeBlock {
        language: Some(language.to_string()),
        lines: lines.iter().map(|l| l.to_string()).collect(),
        evaluable: true,
    }
}
