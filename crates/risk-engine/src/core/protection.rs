//! Liquidation protection planning.
//!
//! For positions whose health factor has dropped below the trigger, compute
//! the two ways back to the target health factor:
//!
//!   add_collateral = target * D / LT - C
//!   repay_debt     = D - C * LT / target
//!
//! where C=collateral, D=debt, LT=liquidation threshold. Both are floored at
//! zero. Nothing is executed here; plans are inputs for the caller's UI or
//! automation.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::config::ProtectionConfig;
use crate::types::Position;

use super::metrics::{
    checked_ratio, compute_health_factor, format_health_factor, saturating_mul, saturating_ratio,
};

/// Proposed remedies for one at-risk position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectionPlan {
    pub position_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub health_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub target_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub additional_collateral: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub debt_to_repay: Decimal,
}

/// Collateral to add so the position reaches `target_hf`.
pub fn collateral_to_reach(position: &Position, target_hf: Decimal) -> Decimal {
    if position.borrowed_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let required = target_hf
        .checked_mul(position.borrowed_value)
        .and_then(|target_debt| checked_ratio(target_debt, position.liquidation_threshold))
        .unwrap_or(Decimal::MAX);
    (required - position.collateral_value).max(Decimal::ZERO)
}

/// Debt to repay so the position reaches `target_hf`.
pub fn repayment_to_reach(position: &Position, target_hf: Decimal) -> Decimal {
    if position.borrowed_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let supported_debt = saturating_ratio(
        saturating_mul(position.collateral_value, position.liquidation_threshold),
        target_hf,
    );
    (position.borrowed_value - supported_debt).max(Decimal::ZERO)
}

/// Plans for every position below `config.trigger_hf`, most endangered first
/// (ties broken by id).
pub fn plan_protection(positions: &[Position], config: &ProtectionConfig) -> Vec<ProtectionPlan> {
    if !config.enabled {
        return Vec::new();
    }

    let mut plans: Vec<ProtectionPlan> = positions
        .iter()
        .filter_map(|position| {
            let hf = compute_health_factor(
                position.collateral_value,
                position.borrowed_value,
                position.liquidation_threshold,
            );
            if hf >= config.trigger_hf {
                return None;
            }
            Some(ProtectionPlan {
                position_id: position.id.clone(),
                health_factor: hf,
                target_hf: config.target_hf,
                additional_collateral: collateral_to_reach(position, config.target_hf),
                debt_to_repay: repayment_to_reach(position, config.target_hf),
            })
        })
        .collect();

    plans.sort_by(|a, b| {
        a.health_factor
            .cmp(&b.health_factor)
            .then_with(|| a.position_id.cmp(&b.position_id))
    });

    for plan in &plans {
        debug!(
            position = %plan.position_id,
            hf = %format_health_factor(plan.health_factor),
            add_collateral = %plan.additional_collateral.round_dp(2),
            repay = %plan.debt_to_repay.round_dp(2),
            "protection plan"
        );
    }

    plans
}

/// What-if copy of `position` with its collateral scaled by `factor`.
pub fn simulate_add_collateral(position: &Position, factor: Decimal) -> Position {
    Position {
        collateral_value: saturating_mul(position.collateral_value, factor),
        ..position.clone()
    }
}
