pub mod types;
pub mod validate;

pub use types::*;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Load all config JSON files into a single [`EngineConfig`], then apply
/// environment variable overrides and validate.
///
/// Expected directory layout:
/// ```text
/// config/
///   app.json
///   risk.json
///   allocation.json
///   protection.json   (optional, defaults apply)
/// ```
///
/// # Environment variable overrides
///
/// | Env Var                        | Config Field                              |
/// |--------------------------------|-------------------------------------------|
/// | `RISK_ENGINE_LOG_DIR`          | `app.logging.log_dir`                     |
/// | `RISK_ENGINE_LOG_FILE`         | `app.logging.file_output`                 |
/// | `AGGREGATE_SAFETY_BUFFER`      | `risk.aggregate_safety_buffer`            |
/// | `HIGH_LTV_WARNING_RATIO`       | `risk.alerts.high_ltv_warning_ratio`      |
/// | `HIGH_RISK_AVG_HEALTH_FACTOR`  | `allocation.high_risk_avg_health_factor`  |
/// | `RISK_TOLERANCE_MODE`          | `allocation.tolerance_mode`               |
pub fn load_config(config_dir: &Path) -> Result<EngineConfig> {
    let read = |name: &str| -> Result<String> {
        let path = config_dir.join(name);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))
    };

    let app: AppConfig = serde_json::from_str(&read("app.json")?).context("parsing app.json")?;

    let risk: RiskThresholds =
        serde_json::from_str(&read("risk.json")?).context("parsing risk.json")?;

    let allocation: AllocationConfig =
        serde_json::from_str(&read("allocation.json")?).context("parsing allocation.json")?;

    let protection: ProtectionConfig = match read("protection.json") {
        Ok(contents) => serde_json::from_str(&contents).context("parsing protection.json")?,
        Err(_) => ProtectionConfig::default(),
    };

    let mut config = EngineConfig {
        app,
        risk,
        allocation,
        protection,
    };

    apply_env_overrides(&mut config);
    validate::validate_config(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Only non-empty env vars take effect. Parse failures are logged and skipped.
fn apply_env_overrides(config: &mut EngineConfig) {
    if let Some(val) = env_string("RISK_ENGINE_LOG_DIR") {
        info!(%val, "env override: RISK_ENGINE_LOG_DIR");
        config.app.logging.log_dir = val;
    }

    if let Some(val) = env_parse::<bool>("RISK_ENGINE_LOG_FILE") {
        info!(val, "env override: RISK_ENGINE_LOG_FILE");
        config.app.logging.file_output = val;
    }

    if let Some(val) = env_decimal("AGGREGATE_SAFETY_BUFFER") {
        info!(%val, "env override: AGGREGATE_SAFETY_BUFFER");
        config.risk.aggregate_safety_buffer = val;
    }

    if let Some(val) = env_decimal("HIGH_LTV_WARNING_RATIO") {
        info!(%val, "env override: HIGH_LTV_WARNING_RATIO");
        config.risk.alerts.high_ltv_warning_ratio = val;
    }

    if let Some(val) = env_decimal("HIGH_RISK_AVG_HEALTH_FACTOR") {
        info!(%val, "env override: HIGH_RISK_AVG_HEALTH_FACTOR");
        config.allocation.high_risk_avg_health_factor = val;
    }

    if let Some(val) = env_parse::<ToleranceMode>("RISK_TOLERANCE_MODE") {
        info!(mode = ?val, "env override: RISK_TOLERANCE_MODE");
        config.allocation.tolerance_mode = val;
    }
}

/// Read a non-empty env var as a `String`.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read a non-empty env var and parse it as `T`.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable env override");
            None
        }
    }
}

/// Read a non-empty env var and parse it as `Decimal`.
fn env_decimal(key: &str) -> Option<Decimal> {
    env_parse::<Decimal>(key)
}
