//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, so `main` can propagate
/// every failure with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: swarm_core::ConfigError,
    },

    /// The simulation state could not be created.
    #[error("startup error: {source}")]
    Startup {
        /// The underlying tick error.
        #[from]
        source: swarm_core::TickError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: swarm_core::RunnerError,
    },

    /// Writing the trajectory export failed.
    #[error("export error: {source}")]
    Export {
        /// The underlying export error.
        #[from]
        source: swarm_core::ExportError,
    },

    /// The log filter directive was invalid.
    #[error("invalid log filter {directive:?}: {message}")]
    LogFilter {
        /// The rejected directive.
        directive: String,
        /// Description of the parse failure.
        message: String,
    },
}
