pub mod alert;
pub mod allocation;
pub mod position;
pub mod risk;
pub mod strategy;

pub use alert::{AlertKind, RiskAlert, Severity};
pub use allocation::{AllocationReport, PortfolioAllocation};
pub use position::{Position, PositionKind};
pub use risk::{AggregateRisk, PositionRisk, RiskReport, RiskTier};
pub use strategy::{StrategyRisk, StrategyStatus, YieldStrategy};
