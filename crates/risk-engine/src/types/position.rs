use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// What a position represents. Informational only; the risk math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    Lending,
    Borrowing,
    Liquidity,
    Yield,
}

impl PositionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lending => "lending",
            Self::Borrowing => "borrowing",
            Self::Liquidity => "liquidity",
            Self::Yield => "yield",
        }
    }
}

/// A single collateral/debt exposure at a snapshot instant.
///
/// Derived figures (LTV, health factor) are never stored here; the
/// evaluator recomputes them on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub kind: PositionKind,
    #[serde(with = "rust_decimal::serde::str")]
    pub collateral_value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub borrowed_value: Decimal,
    /// LTV at which the position becomes liquidatable, in (0, 1].
    #[serde(with = "rust_decimal::serde::str")]
    pub liquidation_threshold: Decimal,
    /// Protocol borrowing ceiling, in (0, 1] and `<= liquidation_threshold`.
    #[serde(with = "rust_decimal::serde::str")]
    pub max_ltv: Decimal,
}

impl Position {
    /// Check the input shape the engine assumes. The engine itself does not
    /// call this; callers building positions from untrusted data should.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidPosition {
            id: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(invalid("id is empty".into()));
        }
        if self.collateral_value < Decimal::ZERO {
            return Err(invalid(format!(
                "collateral_value ({}) is negative",
                self.collateral_value
            )));
        }
        if self.borrowed_value < Decimal::ZERO {
            return Err(invalid(format!(
                "borrowed_value ({}) is negative",
                self.borrowed_value
            )));
        }
        if !is_unit_fraction(self.liquidation_threshold) {
            return Err(invalid(format!(
                "liquidation_threshold ({}) must be in (0, 1]",
                self.liquidation_threshold
            )));
        }
        if !is_unit_fraction(self.max_ltv) {
            return Err(invalid(format!(
                "max_ltv ({}) must be in (0, 1]",
                self.max_ltv
            )));
        }
        if self.max_ltv > self.liquidation_threshold {
            return Err(invalid(format!(
                "max_ltv ({}) exceeds liquidation_threshold ({})",
                self.max_ltv, self.liquidation_threshold
            )));
        }
        Ok(())
    }
}

pub(crate) fn is_unit_fraction(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= Decimal::ONE
}
