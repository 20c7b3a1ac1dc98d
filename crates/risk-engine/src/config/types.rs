use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::constants::*;
use crate::errors::EngineError;

// ---------------------------------------------------------------------------
// Top-level aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub app: AppConfig,
    pub risk: RiskThresholds,
    pub allocation: AllocationConfig,
    pub protection: ProtectionConfig,
}

// ---------------------------------------------------------------------------
// app.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_filter")]
    pub default_filter: String,
    /// Write the JSON log file; stderr output is always on.
    #[serde(default = "default_file_output")]
    pub file_output: bool,
}

fn default_file_prefix() -> String {
    "risk-engine.log".into()
}

fn default_filter() -> String {
    "risk_engine=info,warn".into()
}

fn default_file_output() -> bool {
    true
}

// ---------------------------------------------------------------------------
// risk.json
// ---------------------------------------------------------------------------

/// Cutoffs used by the risk evaluator. `Default` reproduces the dashboard's
/// fixed thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RiskThresholds {
    pub position_tiers: PositionTierCutoffs,
    pub aggregate_tiers: AggregateTierCutoffs,
    #[serde(with = "rust_decimal::serde::str")]
    pub aggregate_safety_buffer: Decimal,
    pub liquidation_score: LiquidationScoreSteps,
    pub alerts: AlertThresholds,
}

/// Lower bound (inclusive) of each position tier. Anything below
/// `high_min_hf` is critical.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PositionTierCutoffs {
    #[serde(with = "rust_decimal::serde::str")]
    pub low_min_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub medium_min_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high_min_hf: Decimal,
}

/// Upper bound (exclusive) of each aggregate tier. Anything at or above
/// `medium_below_hf` is low.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AggregateTierCutoffs {
    #[serde(with = "rust_decimal::serde::str")]
    pub critical_below_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high_below_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub medium_below_hf: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiquidationScoreSteps {
    #[serde(with = "rust_decimal::serde::str")]
    pub severe_below_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub elevated_below_hf: Decimal,
    pub severe_score: u8,
    pub elevated_score: u8,
    pub baseline_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlertThresholds {
    #[serde(with = "rust_decimal::serde::str")]
    pub low_health_below_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high_ltv_warning_ratio: Decimal,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            position_tiers: PositionTierCutoffs {
                low_min_hf: POSITION_LOW_RISK_MIN_HF,
                medium_min_hf: POSITION_MEDIUM_RISK_MIN_HF,
                high_min_hf: POSITION_HIGH_RISK_MIN_HF,
            },
            aggregate_tiers: AggregateTierCutoffs {
                critical_below_hf: AGGREGATE_CRITICAL_BELOW_HF,
                high_below_hf: AGGREGATE_HIGH_BELOW_HF,
                medium_below_hf: AGGREGATE_MEDIUM_BELOW_HF,
            },
            aggregate_safety_buffer: AGGREGATE_SAFETY_BUFFER,
            liquidation_score: LiquidationScoreSteps {
                severe_below_hf: LIQUIDATION_SCORE_SEVERE_BELOW_HF,
                elevated_below_hf: LIQUIDATION_SCORE_ELEVATED_BELOW_HF,
                severe_score: LIQUIDATION_SCORE_SEVERE,
                elevated_score: LIQUIDATION_SCORE_ELEVATED,
                baseline_score: LIQUIDATION_SCORE_BASELINE,
            },
            alerts: AlertThresholds {
                low_health_below_hf: LOW_HEALTH_ALERT_BELOW_HF,
                high_ltv_warning_ratio: HIGH_LTV_WARNING_RATIO,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// allocation.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AllocationConfig {
    pub risk_weights: RiskWeights,
    #[serde(with = "rust_decimal::serde::str")]
    pub high_risk_avg_health_factor: Decimal,
    pub days_per_year: u32,
    #[serde(default)]
    pub tolerance_mode: ToleranceMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RiskWeights {
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub medium: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
}

/// How the caller's risk tolerance feeds into the strategy weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceMode {
    /// Tolerance is recorded on the result but does not change weights.
    #[default]
    Ignored,
    /// `w + (tolerance / 100) * (1 - w)`: moves toward equal risk weighting
    /// as tolerance rises.
    Interpolate,
}

impl FromStr for ToleranceMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignored" => Ok(Self::Ignored),
            "interpolate" => Ok(Self::Interpolate),
            other => Err(EngineError::Config(format!(
                "unknown tolerance mode: {other}"
            ))),
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            risk_weights: RiskWeights {
                low: LOW_RISK_WEIGHT,
                medium: MEDIUM_RISK_WEIGHT,
                high: HIGH_RISK_WEIGHT,
            },
            high_risk_avg_health_factor: HIGH_RISK_AVG_HEALTH_FACTOR,
            days_per_year: DAYS_PER_YEAR,
            tolerance_mode: ToleranceMode::Ignored,
        }
    }
}

// ---------------------------------------------------------------------------
// protection.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtectionConfig {
    pub enabled: bool,
    /// Positions below this health factor get a protection plan.
    #[serde(with = "rust_decimal::serde::str")]
    pub trigger_hf: Decimal,
    /// Health factor a protection action restores.
    #[serde(with = "rust_decimal::serde::str")]
    pub target_hf: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub add_collateral_factor: Decimal,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_hf: PROTECTION_TRIGGER_HF,
            target_hf: PROTECTION_TARGET_HF,
            add_collateral_factor: ADD_COLLATERAL_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_mode_from_str() {
        assert_eq!("ignored".parse::<ToleranceMode>().unwrap(), ToleranceMode::Ignored);
        assert_eq!("INTERPOLATE".parse::<ToleranceMode>().unwrap(), ToleranceMode::Interpolate);
        let err = "scaled".parse::<ToleranceMode>().unwrap_err();
        assert!(err.to_string().contains("unknown tolerance mode"), "got: {err}");
    }

    #[test]
    fn test_tolerance_mode_defaults_when_absent() {
        let json = r#"{
            "risk_weights": { "low": "1.0", "medium": "0.7", "high": "0.4" },
            "high_risk_avg_health_factor": "1.5",
            "days_per_year": 365
        }"#;
        let config: AllocationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, AllocationConfig::default());
    }
}
