pub mod allocation_optimizer;
pub mod catalog;
pub mod metrics;
pub mod protection;
pub mod risk_evaluator;
