use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, warn};

use risk_engine::config;
use risk_engine::core::protection::{plan_protection, simulate_add_collateral};
use risk_engine::logging;
use risk_engine::snapshot::load_snapshot;
use risk_engine::{AllocationOptimizer, RiskEvaluator};

fn main() -> Result<()> {
    // Load .env file (ignore if missing).
    let _ = dotenvy::dotenv();

    let config_dir = std::env::var("RISK_ENGINE_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    let config = config::load_config(&config_dir)?;

    // Hold the guard for the process lifetime.
    let _guard = logging::init_tracing(&config.app.logging)?;

    let snapshot_path = std::env::var("RISK_ENGINE_SNAPSHOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("fixtures/snapshot.json"));
    let snapshot = load_snapshot(&snapshot_path)?;

    info!(
        snapshot = %snapshot_path.display(),
        positions = snapshot.positions.len(),
        strategies = snapshot.strategies.len(),
        selected = snapshot.selection.strategy_ids.len(),
        "snapshot loaded"
    );

    let evaluator = RiskEvaluator::new(config.risk.clone());
    let risk = evaluator.evaluate(&snapshot.positions);
    let protection = plan_protection(&snapshot.positions, &config.protection);

    // Position risk after the one-click collateral top-up, for each planned position.
    let top_up_preview: Vec<_> = snapshot
        .positions
        .iter()
        .filter(|p| protection.iter().any(|plan| plan.position_id == p.id))
        .map(|p| {
            evaluator.evaluate_position(&simulate_add_collateral(
                p,
                config.protection.add_collateral_factor,
            ))
        })
        .collect();

    let optimizer = AllocationOptimizer::new(config.allocation.clone());
    let selected = snapshot.selected_strategies()?;
    let allocation = optimizer.optimize(
        snapshot.selection.total_deposit,
        &selected,
        snapshot.selection.risk_tolerance,
    );

    if allocation.is_empty() {
        warn!("no allocation produced: empty selection or non-positive deposit");
    }

    info!(
        alerts = risk.alerts.len(),
        portfolio_tier = risk.aggregate.tier.as_str(),
        protection_plans = protection.len(),
        allocations = allocation.allocations.len(),
        "evaluation complete"
    );

    let output = json!({
        "risk": risk,
        "protection": protection,
        "top_up_preview": top_up_preview,
        "allocation": allocation,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("serializing report")?
    );

    Ok(())
}
