use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Position tiering (health factor cutoffs, lower bound of each tier)
// ---------------------------------------------------------------------------

pub const POSITION_LOW_RISK_MIN_HF: Decimal = dec!(1.8);
pub const POSITION_MEDIUM_RISK_MIN_HF: Decimal = dec!(1.5);
pub const POSITION_HIGH_RISK_MIN_HF: Decimal = dec!(1.2);

// ---------------------------------------------------------------------------
// Portfolio aggregate
// ---------------------------------------------------------------------------

/// Multiplier applied to total debt when computing the aggregate health factor.
pub const AGGREGATE_SAFETY_BUFFER: Decimal = dec!(1.1);

pub const AGGREGATE_CRITICAL_BELOW_HF: Decimal = dec!(1.1);
pub const AGGREGATE_HIGH_BELOW_HF: Decimal = dec!(1.3);
pub const AGGREGATE_MEDIUM_BELOW_HF: Decimal = dec!(1.8);

/// Liquidation risk score steps (0-100 progress indicator, not a probability).
pub const LIQUIDATION_SCORE_SEVERE_BELOW_HF: Decimal = dec!(1.2);
pub const LIQUIDATION_SCORE_ELEVATED_BELOW_HF: Decimal = dec!(1.5);
pub const LIQUIDATION_SCORE_SEVERE: u8 = 85;
pub const LIQUIDATION_SCORE_ELEVATED: u8 = 45;
pub const LIQUIDATION_SCORE_BASELINE: u8 = 15;

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

pub const LOW_HEALTH_ALERT_BELOW_HF: Decimal = dec!(1.2);

/// `current_ltv / max_ltv` at or above which `high_ltv` fires.
pub const HIGH_LTV_WARNING_RATIO: Decimal = dec!(0.9);

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

pub const LOW_RISK_WEIGHT: Decimal = dec!(1.0);
pub const MEDIUM_RISK_WEIGHT: Decimal = dec!(0.7);
pub const HIGH_RISK_WEIGHT: Decimal = dec!(0.4);

/// Average strategy health factor below which the allocation is flagged high-risk.
pub const HIGH_RISK_AVG_HEALTH_FACTOR: Decimal = dec!(1.5);

pub const DAYS_PER_YEAR: u32 = 365;

/// Strategies above this APY (percent) count as high-yield in catalog filters.
pub const HIGH_YIELD_APY_PERCENT: Decimal = dec!(50);

// ---------------------------------------------------------------------------
// Liquidation protection
// ---------------------------------------------------------------------------

pub const PROTECTION_TRIGGER_HF: Decimal = dec!(1.3);
pub const PROTECTION_TARGET_HF: Decimal = dec!(1.5);

/// Collateral multiplier for the one-click "add collateral" simulation.
pub const ADD_COLLATERAL_FACTOR: Decimal = dec!(1.1);
