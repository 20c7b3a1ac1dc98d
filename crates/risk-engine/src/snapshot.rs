//! Input snapshot loading for the command-line runner.
//!
//! The engine takes plain slices; this module is the boundary where JSON
//! from wallet readers and the strategy catalog is parsed and validated.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::catalog::select_strategies;
use crate::types::{Position, YieldStrategy};

#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub positions: Vec<Position>,
    pub strategies: Vec<YieldStrategy>,
    pub selection: Selection,
}

/// User inputs for the allocation optimizer.
#[derive(Debug, Clone, Deserialize)]
pub struct Selection {
    pub strategy_ids: Vec<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_deposit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub risk_tolerance: Decimal,
}

impl Snapshot {
    /// Validate every position and catalog entry.
    pub fn validate(&self) -> Result<()> {
        for position in &self.positions {
            position.validate()?;
        }
        for strategy in &self.strategies {
            strategy.validate()?;
        }
        Ok(())
    }

    /// Catalog entries for the selected ids, in selection order.
    pub fn selected_strategies(&self) -> Result<Vec<YieldStrategy>> {
        Ok(select_strategies(&self.strategies, self.selection.strategy_ids.as_slice())?)
    }
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    snapshot
        .validate()
        .with_context(|| format!("invalid snapshot {}", path.display()))?;
    Ok(snapshot)
}
