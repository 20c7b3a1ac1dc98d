pub mod config;
pub mod constants;
pub mod core;
pub mod errors;
pub mod logging;
pub mod snapshot;
pub mod types;

pub use crate::core::allocation_optimizer::{optimize, AllocationOptimizer};
pub use crate::core::risk_evaluator::{evaluate, RiskEvaluator};
pub use errors::EngineError;
