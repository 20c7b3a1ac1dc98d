use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::strategy::StrategyRisk;
use crate::core::metrics::saturating_add;

/// Capital assigned to one selected strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    pub strategy_id: String,
    pub risk: StrategyRisk,
    #[serde(with = "rust_decimal::serde::str")]
    pub apy_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// `amount / total_deposit`.
    #[serde(with = "rust_decimal::serde::str")]
    pub weight: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub projected_daily_earnings: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub health_factor: Decimal,
    pub lock_period_days: u32,
    /// `min_deposit <= amount <= max_deposit` for the strategy.
    pub within_deposit_bounds: bool,
}

/// Optimizer output: the allocation plus portfolio-level projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_deposit: Decimal,
    /// Stored alongside the result even when it does not shape the weights.
    #[serde(with = "rust_decimal::serde::str")]
    pub risk_tolerance: Decimal,
    pub allocations: Vec<PortfolioAllocation>,
    #[serde(with = "rust_decimal::serde::str")]
    pub expected_portfolio_apy: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_daily_earnings: Decimal,
    /// Unweighted mean of the selected strategies' nominal health factors.
    #[serde(with = "rust_decimal::serde::str")]
    pub average_health_factor: Decimal,
    /// Set when `average_health_factor` is below the high-risk cutoff.
    pub high_risk_warning: bool,
    pub out_of_bounds_count: usize,
}

impl AllocationReport {
    /// Degenerate result for an empty selection or a non-positive deposit.
    pub fn empty(total_deposit: Decimal, risk_tolerance: Decimal) -> Self {
        Self {
            total_deposit,
            risk_tolerance,
            allocations: Vec::new(),
            expected_portfolio_apy: Decimal::ZERO,
            total_daily_earnings: Decimal::ZERO,
            average_health_factor: Decimal::ZERO,
            high_risk_warning: false,
            out_of_bounds_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub fn total_allocated(&self) -> Decimal {
        self.allocations
            .iter()
            .map(|a| a.amount)
            .fold(Decimal::ZERO, saturating_add)
    }
}
