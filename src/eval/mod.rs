pub mod bridge;
pub mod command;
pub mod evaluator;
pub mod session;
pub mod types;

pub use bridge::Bridge;
pub use command::CommandEvaluator;
pub use evaluator::{EvalError, Evaluator};
pub use types::{EvalRequest, EvaluationResult};
