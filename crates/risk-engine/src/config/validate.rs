use anyhow::{bail, Result};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use super::types::{AllocationConfig, EngineConfig, ProtectionConfig, RiskThresholds};

/// Validate invariants across the merged config that serde alone cannot
/// enforce. Collects every violation before failing. Called automatically
/// by [`super::load_config`].
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    validate_logging(config, &mut errors);
    validate_risk_thresholds(&config.risk, &mut errors);
    validate_allocation(&config.allocation, &mut errors);
    validate_protection(&config.protection, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let msg = format!(
            "Configuration validation failed ({} error{}):\n  - {}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" },
            errors.join("\n  - ")
        );
        bail!("{msg}");
    }
}

fn validate_logging(config: &EngineConfig, errors: &mut Vec<String>) {
    let logging = &config.app.logging;
    if logging.file_output && logging.log_dir.is_empty() {
        errors.push("app.logging: log_dir is empty".into());
    }
    if let Err(e) = EnvFilter::try_new(&logging.default_filter) {
        errors.push(format!(
            "app.logging: default_filter ({}) is not a valid filter: {e}",
            logging.default_filter
        ));
    }
}

// ---------------------------------------------------------------------------
// Risk thresholds
// ---------------------------------------------------------------------------

pub fn validate_risk_thresholds(risk: &RiskThresholds, errors: &mut Vec<String>) {
    let tiers = &risk.position_tiers;
    if tiers.high_min_hf <= Decimal::ZERO {
        errors.push(format!(
            "risk.position_tiers: high_min_hf ({}) must be > 0",
            tiers.high_min_hf
        ));
    }
    // high < medium < low
    if tiers.high_min_hf >= tiers.medium_min_hf || tiers.medium_min_hf >= tiers.low_min_hf {
        errors.push(format!(
            "risk.position_tiers: cutoffs must satisfy high_min_hf ({}) < medium_min_hf ({}) < low_min_hf ({})",
            tiers.high_min_hf, tiers.medium_min_hf, tiers.low_min_hf
        ));
    }

    let agg = &risk.aggregate_tiers;
    if agg.critical_below_hf <= Decimal::ZERO {
        errors.push(format!(
            "risk.aggregate_tiers: critical_below_hf ({}) must be > 0",
            agg.critical_below_hf
        ));
    }
    if agg.critical_below_hf >= agg.high_below_hf || agg.high_below_hf >= agg.medium_below_hf {
        errors.push(format!(
            "risk.aggregate_tiers: cutoffs must satisfy critical_below_hf ({}) < high_below_hf ({}) < medium_below_hf ({})",
            agg.critical_below_hf, agg.high_below_hf, agg.medium_below_hf
        ));
    }

    if risk.aggregate_safety_buffer < Decimal::ONE {
        errors.push(format!(
            "risk: aggregate_safety_buffer ({}) must be >= 1.0",
            risk.aggregate_safety_buffer
        ));
    }

    let score = &risk.liquidation_score;
    if score.severe_below_hf >= score.elevated_below_hf {
        errors.push(format!(
            "risk.liquidation_score: severe_below_hf ({}) must be < elevated_below_hf ({})",
            score.severe_below_hf, score.elevated_below_hf
        ));
    }
    if score.severe_score > 100 {
        errors.push(format!(
            "risk.liquidation_score: severe_score ({}) exceeds 100",
            score.severe_score
        ));
    }
    if score.severe_score < score.elevated_score || score.elevated_score < score.baseline_score {
        errors.push(format!(
            "risk.liquidation_score: scores must satisfy severe ({}) >= elevated ({}) >= baseline ({})",
            score.severe_score, score.elevated_score, score.baseline_score
        ));
    }

    let alerts = &risk.alerts;
    if alerts.low_health_below_hf <= Decimal::ZERO {
        errors.push(format!(
            "risk.alerts: low_health_below_hf ({}) must be > 0",
            alerts.low_health_below_hf
        ));
    }
    if alerts.high_ltv_warning_ratio <= Decimal::ZERO || alerts.high_ltv_warning_ratio > Decimal::ONE
    {
        errors.push(format!(
            "risk.alerts: high_ltv_warning_ratio ({}) must be in (0, 1]",
            alerts.high_ltv_warning_ratio
        ));
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

pub fn validate_allocation(allocation: &AllocationConfig, errors: &mut Vec<String>) {
    let weights = &allocation.risk_weights;
    for (name, weight) in [
        ("low", weights.low),
        ("medium", weights.medium),
        ("high", weights.high),
    ] {
        if weight <= Decimal::ZERO || weight > Decimal::ONE {
            errors.push(format!(
                "allocation.risk_weights.{name}: {weight} must be in (0, 1]"
            ));
        }
    }
    if weights.low < weights.medium || weights.medium < weights.high {
        errors.push(format!(
            "allocation.risk_weights: must be non-increasing low ({}) >= medium ({}) >= high ({})",
            weights.low, weights.medium, weights.high
        ));
    }

    if allocation.high_risk_avg_health_factor <= Decimal::ZERO {
        errors.push(format!(
            "allocation: high_risk_avg_health_factor ({}) must be > 0",
            allocation.high_risk_avg_health_factor
        ));
    }

    if allocation.days_per_year == 0 {
        errors.push("allocation: days_per_year must be > 0".into());
    }
}

// ---------------------------------------------------------------------------
// Protection
// ---------------------------------------------------------------------------

fn validate_protection(protection: &ProtectionConfig, errors: &mut Vec<String>) {
    if protection.trigger_hf <= Decimal::ONE {
        errors.push(format!(
            "protection: trigger_hf ({}) must be > 1.0",
            protection.trigger_hf
        ));
    }
    if protection.target_hf < protection.trigger_hf {
        errors.push(format!(
            "protection: target_hf ({}) should be >= trigger_hf ({})",
            protection.target_hf, protection.trigger_hf
        ));
    }
    if protection.add_collateral_factor <= Decimal::ONE {
        errors.push(format!(
            "protection: add_collateral_factor ({}) must be > 1.0",
            protection.add_collateral_factor
        ));
    }
}
