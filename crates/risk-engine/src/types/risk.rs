use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::alert::RiskAlert;
use super::position::PositionKind;

/// Discrete risk classification derived from a health factor.
///
/// Ordered by severity: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Derived risk figures for a single position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRisk {
    pub position_id: String,
    pub kind: PositionKind,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_ltv: Decimal,
    /// `Decimal::MAX` when the position carries no debt.
    #[serde(with = "rust_decimal::serde::str")]
    pub health_factor: Decimal,
    /// `current_ltv / max_ltv`, the share of the borrowing ceiling in use.
    #[serde(with = "rust_decimal::serde::str")]
    pub ltv_utilization: Decimal,
    pub tier: RiskTier,
}

/// Portfolio-wide totals and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRisk {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_collateral: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_borrowed: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub aggregate_ltv: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub aggregate_health_factor: Decimal,
    pub tier: RiskTier,
    /// 0-100 step score for a progress indicator. Not a probability.
    pub liquidation_risk_score: u8,
}

/// Output of one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    pub positions: Vec<PositionRisk>,
    pub aggregate: AggregateRisk,
    pub alerts: Vec<RiskAlert>,
}
