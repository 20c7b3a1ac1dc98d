//! Shared numeric conventions and tier classification.
//!
//! Pure helper functions used by both the risk evaluator and the allocation
//! optimizer. An unbounded health factor (no debt) is `Decimal::MAX`, and
//! every division is checked so degenerate inputs resolve to a defined value
//! instead of panicking.

use rust_decimal::Decimal;

use crate::config::{AggregateTierCutoffs, LiquidationScoreSteps, PositionTierCutoffs};
use crate::types::RiskTier;

/// Health factor of a position carrying no debt.
pub const UNBOUNDED_HF: Decimal = Decimal::MAX;

pub fn is_unbounded(hf: Decimal) -> bool {
    hf == UNBOUNDED_HF
}

/// `numerator / denominator`, or `None` when the denominator is not positive
/// or the quotient overflows.
pub fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator <= Decimal::ZERO {
        return None;
    }
    numerator.checked_div(denominator)
}

/// `numerator / denominator`, `0` when the denominator is not positive and
/// `Decimal::MAX` when the quotient overflows.
pub fn saturating_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::MAX)
}

/// Sum of non-negative amounts, pinned at `Decimal::MAX` on overflow.
pub fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

/// Product of non-negative amounts, pinned at `Decimal::MAX` on overflow.
pub fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::MAX)
}

/// LTV = borrowed / collateral, defined as 0 when there is no collateral.
pub fn compute_ltv(collateral: Decimal, borrowed: Decimal) -> Decimal {
    saturating_ratio(borrowed, collateral)
}

/// HF = (collateral * liquidation_threshold) / borrowed.
///
/// Returns [`UNBOUNDED_HF`] if there is no debt and `0` for debt backed by
/// no collateral.
pub fn compute_health_factor(
    collateral: Decimal,
    borrowed: Decimal,
    liquidation_threshold: Decimal,
) -> Decimal {
    if borrowed <= Decimal::ZERO {
        return UNBOUNDED_HF;
    }
    if collateral <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    collateral
        .checked_mul(liquidation_threshold)
        .and_then(|risk_adjusted| risk_adjusted.checked_div(borrowed))
        .unwrap_or(UNBOUNDED_HF)
}

/// Aggregate HF = total_collateral / (total_borrowed * safety_buffer).
pub fn compute_aggregate_health_factor(
    total_collateral: Decimal,
    total_borrowed: Decimal,
    safety_buffer: Decimal,
) -> Decimal {
    if total_borrowed <= Decimal::ZERO {
        return UNBOUNDED_HF;
    }
    match total_borrowed.checked_mul(safety_buffer) {
        Some(buffered) => checked_ratio(total_collateral, buffered).unwrap_or(UNBOUNDED_HF),
        None => saturating_ratio(
            saturating_ratio(total_collateral, safety_buffer),
            total_borrowed,
        ),
    }
}

/// Classify a position health factor. Lower bounds are inclusive.
pub fn classify_position(hf: Decimal, cutoffs: &PositionTierCutoffs) -> RiskTier {
    if hf >= cutoffs.low_min_hf {
        RiskTier::Low
    } else if hf >= cutoffs.medium_min_hf {
        RiskTier::Medium
    } else if hf >= cutoffs.high_min_hf {
        RiskTier::High
    } else {
        RiskTier::Critical
    }
}

/// Classify the aggregate health factor. Upper bounds are exclusive.
pub fn classify_aggregate(hf: Decimal, cutoffs: &AggregateTierCutoffs) -> RiskTier {
    if hf < cutoffs.critical_below_hf {
        RiskTier::Critical
    } else if hf < cutoffs.high_below_hf {
        RiskTier::High
    } else if hf < cutoffs.medium_below_hf {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Step score for the liquidation-risk progress indicator.
pub fn liquidation_risk_score(hf: Decimal, steps: &LiquidationScoreSteps) -> u8 {
    if hf < steps.severe_below_hf {
        steps.severe_score
    } else if hf < steps.elevated_below_hf {
        steps.elevated_score
    } else {
        steps.baseline_score
    }
}

/// Two-decimal rendering used in alert messages; unbounded renders as `∞`.
pub fn format_health_factor(hf: Decimal) -> String {
    if is_unbounded(hf) {
        "∞".to_string()
    } else {
        format!("{:.2}", hf.round_dp(2))
    }
}

/// One-decimal percentage of a ratio; a ratio too large to scale renders as `∞`.
pub fn format_percent(ratio: Decimal) -> String {
    match ratio.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => format!("{:.1}", percent.round_dp(1)),
        None => "∞".to_string(),
    }
}
