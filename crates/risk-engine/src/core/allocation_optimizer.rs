//! Allocation optimizer: risk-weighted capital split across yield strategies.
//!
//! Score per strategy is `risk_weight * apy / 100`; weights are the scores
//! normalized to sum to one, and each strategy receives
//! `total_deposit * weight`. Weights never depend on the deposit size, so
//! changing the deposit rescales every amount proportionally.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{AllocationConfig, ToleranceMode};
use crate::types::{AllocationReport, PortfolioAllocation, StrategyRisk, YieldStrategy};

use super::metrics::{format_health_factor, saturating_add, saturating_mul};

/// Optimize with the default allocation config.
pub fn optimize(
    total_deposit: Decimal,
    selected: &[YieldStrategy],
    risk_tolerance: Decimal,
) -> AllocationReport {
    AllocationOptimizer::default().optimize(total_deposit, selected, risk_tolerance)
}

#[derive(Debug, Clone, Default)]
pub struct AllocationOptimizer {
    config: AllocationConfig,
}

impl AllocationOptimizer {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Base weight for a risk rating, adjusted for tolerance when the
    /// configured mode folds it in.
    pub fn risk_weight(&self, risk: StrategyRisk, risk_tolerance: Decimal) -> Decimal {
        let base = match risk {
            StrategyRisk::Low => self.config.risk_weights.low,
            StrategyRisk::Medium => self.config.risk_weights.medium,
            StrategyRisk::High => self.config.risk_weights.high,
        };

        match self.config.tolerance_mode {
            ToleranceMode::Ignored => base,
            ToleranceMode::Interpolate => {
                let t = risk_tolerance.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
                    / Decimal::ONE_HUNDRED;
                base + t * (Decimal::ONE - base)
            }
        }
    }

    /// Unnormalized score: `risk_weight * apy_percent / 100`.
    pub fn raw_score(&self, strategy: &YieldStrategy, risk_tolerance: Decimal) -> Decimal {
        self.risk_weight(strategy.risk, risk_tolerance) * (strategy.apy_percent / Decimal::ONE_HUNDRED)
    }

    /// Split `total_deposit` across `selected` in selection order.
    ///
    /// Returns an empty report when nothing is selected or the deposit is not
    /// positive. If every score is zero (all APYs zero) the deposit is split
    /// evenly.
    pub fn optimize(
        &self,
        total_deposit: Decimal,
        selected: &[YieldStrategy],
        risk_tolerance: Decimal,
    ) -> AllocationReport {
        if selected.is_empty() || total_deposit <= Decimal::ZERO {
            debug!(
                strategies = selected.len(),
                %total_deposit,
                "nothing to allocate"
            );
            return AllocationReport::empty(total_deposit, risk_tolerance);
        }

        let scores: Vec<Decimal> = selected
            .iter()
            .map(|s| self.raw_score(s, risk_tolerance))
            .collect();
        let total_score = scores.iter().copied().fold(Decimal::ZERO, saturating_add);
        let count = Decimal::from(selected.len());

        let weights: Vec<Decimal> = if total_score > Decimal::ZERO {
            scores.iter().map(|score| *score / total_score).collect()
        } else {
            vec![Decimal::ONE / count; selected.len()]
        };

        let days = Decimal::from(self.config.days_per_year);
        let allocations: Vec<PortfolioAllocation> = selected
            .iter()
            .zip(&weights)
            .map(|(strategy, weight)| {
                let amount = saturating_mul(total_deposit, *weight);
                PortfolioAllocation {
                    strategy_id: strategy.id.clone(),
                    risk: strategy.risk,
                    apy_percent: strategy.apy_percent,
                    amount,
                    weight: *weight,
                    projected_daily_earnings: saturating_mul(amount, strategy.apy_percent)
                        / Decimal::ONE_HUNDRED
                        / days,
                    health_factor: strategy.health_factor,
                    lock_period_days: strategy.lock_period_days,
                    within_deposit_bounds: amount >= strategy.min_deposit
                        && amount <= strategy.max_deposit,
                }
            })
            .collect();

        let expected_portfolio_apy = allocations
            .iter()
            .map(|a| saturating_mul(a.apy_percent, a.weight))
            .fold(Decimal::ZERO, saturating_add);
        let total_daily_earnings = allocations
            .iter()
            .map(|a| a.projected_daily_earnings)
            .fold(Decimal::ZERO, saturating_add);
        let average_health_factor = mean_health_factor(selected, count);
        let high_risk_warning = average_health_factor < self.config.high_risk_avg_health_factor;
        let out_of_bounds_count = allocations
            .iter()
            .filter(|a| !a.within_deposit_bounds)
            .count();

        debug!(
            strategies = allocations.len(),
            %total_deposit,
            expected_apy = %expected_portfolio_apy.round_dp(4),
            avg_hf = %format_health_factor(average_health_factor),
            "allocation optimized"
        );

        if high_risk_warning {
            warn!(
                avg_hf = %format_health_factor(average_health_factor),
                cutoff = %self.config.high_risk_avg_health_factor,
                "allocation has high-risk average health factor"
            );
        }

        AllocationReport {
            total_deposit,
            risk_tolerance,
            allocations,
            expected_portfolio_apy,
            total_daily_earnings,
            average_health_factor,
            high_risk_warning,
            out_of_bounds_count,
        }
    }
}

/// Simple mean over the selection, not capital-weighted.
fn mean_health_factor(selected: &[YieldStrategy], count: Decimal) -> Decimal {
    let total = selected
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.health_factor));
    match total {
        Some(total) => total / count,
        // Pre-divide when the plain sum would overflow.
        None => selected
            .iter()
            .map(|s| s.health_factor / count)
            .fold(Decimal::ZERO, saturating_add),
    }
}
