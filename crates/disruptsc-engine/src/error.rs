//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and simulation execution.

use crate::scenario::ScenarioError;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: disruptsc_core::config::ConfigError,
    },

    /// Scenario loading failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: ScenarioError,
    },

    /// Transport network construction failed.
    #[error("network error: {source}")]
    Network {
        /// The underlying network error.
        #[from]
        source: disruptsc_network::NetworkError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: disruptsc_core::runner::RunnerError,
    },

    /// Writing the run result failed.
    #[error("output error: {message}")]
    Output {
        /// Description of the output failure.
        message: String,
    },
}
