//! Strategy catalog filtering and selection resolution.

use std::collections::HashSet;

use crate::constants::HIGH_YIELD_APY_PERCENT;
use crate::errors::EngineError;
use crate::types::{StrategyRisk, StrategyStatus, YieldStrategy};

/// Catalog views offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyFilter {
    #[default]
    All,
    Active,
    HighYield,
    LowRisk,
}

impl StrategyFilter {
    pub fn matches(&self, strategy: &YieldStrategy) -> bool {
        match self {
            Self::All => true,
            Self::Active => strategy.status == StrategyStatus::Active,
            Self::HighYield => strategy.apy_percent > HIGH_YIELD_APY_PERCENT,
            Self::LowRisk => strategy.risk == StrategyRisk::Low,
        }
    }
}

/// Catalog entries matching `filter`, in catalog order.
pub fn filter_strategies(catalog: &[YieldStrategy], filter: StrategyFilter) -> Vec<&YieldStrategy> {
    catalog.iter().filter(|s| filter.matches(s)).collect()
}

/// Resolve selected ids against the catalog, keeping selection order.
///
/// Repeated ids are taken once. An id missing from the catalog is an error.
pub fn select_strategies<S: AsRef<str>>(
    catalog: &[YieldStrategy],
    ids: &[S],
) -> Result<Vec<YieldStrategy>, EngineError> {
    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(ids.len());

    for id in ids {
        let id = id.as_ref();
        if !seen.insert(id) {
            continue;
        }
        let strategy = catalog
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| EngineError::UnknownStrategy { id: id.to_string() })?;
        selected.push(strategy.clone());
    }

    Ok(selected)
}
