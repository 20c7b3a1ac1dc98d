use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::position::is_unit_fraction;
use crate::errors::EngineError;

/// Catalog risk rating of a yield strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyRisk {
    Low,
    Medium,
    High,
}

impl StrategyRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Catalog availability of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyStatus {
    #[default]
    Available,
    Active,
    ComingSoon,
}

impl StrategyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Active => "active",
            Self::ComingSoon => "coming-soon",
        }
    }
}

/// Immutable catalog entry supplied by the strategy catalog collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldStrategy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub apy_percent: Decimal,
    pub risk: StrategyRisk,
    #[serde(default)]
    pub status: StrategyStatus,
    #[serde(with = "rust_decimal::serde::str")]
    pub min_deposit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_deposit: Decimal,
    pub lock_period_days: u32,
    #[serde(default)]
    pub auto_compound: bool,
    #[serde(with = "rust_decimal::serde::str", default)]
    pub fee_percent: Decimal,
    /// Nominal health factor used purely as a risk proxy.
    #[serde(with = "rust_decimal::serde::str")]
    pub health_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub liquidation_threshold: Decimal,
}

impl YieldStrategy {
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidStrategy {
            id: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(invalid("id is empty".into()));
        }
        if self.apy_percent < Decimal::ZERO {
            return Err(invalid(format!(
                "apy_percent ({}) is negative",
                self.apy_percent
            )));
        }
        if self.min_deposit < Decimal::ZERO {
            return Err(invalid(format!(
                "min_deposit ({}) is negative",
                self.min_deposit
            )));
        }
        if self.min_deposit > self.max_deposit {
            return Err(invalid(format!(
                "min_deposit ({}) exceeds max_deposit ({})",
                self.min_deposit, self.max_deposit
            )));
        }
        if self.fee_percent < Decimal::ZERO {
            return Err(invalid(format!(
                "fee_percent ({}) is negative",
                self.fee_percent
            )));
        }
        if self.health_factor < Decimal::ZERO {
            return Err(invalid(format!(
                "health_factor ({}) is negative",
                self.health_factor
            )));
        }
        if !is_unit_fraction(self.liquidation_threshold) {
            return Err(invalid(format!(
                "liquidation_threshold ({}) must be in (0, 1]",
                self.liquidation_threshold
            )));
        }
        Ok(())
    }
}
