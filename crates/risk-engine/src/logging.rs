use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialise the global tracing subscriber.
///
/// Engine events always go to stderr in compact form. With
/// `file_output` set, they are also written as JSON lines to a daily
/// rolling file under `log_dir`; the returned [`WorkerGuard`] then **must**
/// be held for the lifetime of the process, since dropping it flushes and
/// closes the file writer.
pub fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = if logging.file_output {
        std::fs::create_dir_all(&logging.log_dir)
            .with_context(|| format!("creating log directory {}", logging.log_dir))?;
        let appender = tracing_appender::rolling::daily(&logging.log_dir, &logging.file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .json();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter(logging)?)
        .with(file_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();

    Ok(guard)
}

/// `RUST_LOG` wins when set; otherwise the configured `default_filter`,
/// which must parse.
fn env_filter(logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&logging.default_filter)
        .with_context(|| format!("invalid log filter: {}", logging.default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::level_filters::LevelFilter;

    fn logging(filter: &str) -> LoggingConfig {
        LoggingConfig {
            log_dir: "logs".into(),
            file_prefix: "risk-engine.log".into(),
            default_filter: filter.into(),
            file_output: false,
        }
    }

    #[test]
    #[serial]
    fn test_configured_filter_used_without_rust_log() {
        std::env::remove_var("RUST_LOG");
        let filter = env_filter(&logging("risk_engine=debug,warn")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    #[serial]
    fn test_bad_configured_filter_is_an_error() {
        std::env::remove_var("RUST_LOG");
        let err = env_filter(&logging("risk_engine=loud")).unwrap_err();
        assert!(err.to_string().contains("invalid log filter"), "got: {err}");
    }

    #[test]
    #[serial]
    fn test_rust_log_overrides_config() {
        std::env::set_var("RUST_LOG", "risk_engine=trace");
        let filter = env_filter(&logging("risk_engine=loud"));
        std::env::remove_var("RUST_LOG");
        assert_eq!(filter.unwrap().max_level_hint(), Some(LevelFilter::TRACE));
    }
}
