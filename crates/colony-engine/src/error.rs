//! Error types for the colony engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and of the run so
//! that `main` can propagate with `?`.

/// Top-level error for the colony engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: colony_core::ConfigError,
    },

    /// Catalog construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: colony_world::WorldError,
    },

    /// The orchestrator could not be built.
    #[error("turn error: {source}")]
    Turn {
        /// The underlying turn error.
        #[from]
        source: colony_core::TurnError,
    },

    /// Pawn spawning failed.
    #[error("spawner error: {message}")]
    Spawner {
        /// Description of the spawner failure.
        message: String,
    },

    /// The final snapshot could not be serialized.
    #[error("snapshot serialization failed: {source}")]
    Snapshot {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
