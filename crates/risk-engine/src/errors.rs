use thiserror::Error;

/// Typed error hierarchy for the risk engine.
///
/// The evaluator and optimizer themselves never fail; these variants cover
/// input validation done by callers and the loaders around the engine.
/// Application code wraps with `anyhow::Context` for propagation.
#[derive(Error, Debug)]
pub enum EngineError {
    // -- Input shape --------------------------------------------------------
    #[error("invalid position {id}: {reason}")]
    InvalidPosition { id: String, reason: String },

    #[error("invalid strategy {id}: {reason}")]
    InvalidStrategy { id: String, reason: String },

    #[error("unknown strategy: {id}")]
    UnknownStrategy { id: String },

    // -- Configuration ------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
