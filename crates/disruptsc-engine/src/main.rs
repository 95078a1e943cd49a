//! Simulation binary for `DisruptSC`.
//!
//! Usage: `disruptsc-engine [config.yaml] [scenario.json] [result.json]`
//!
//! # Startup Sequence
//!
//! 1. Load configuration (defaults when the file is absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load the scenario and build the transport network
//! 4. Define routing weights and choose the initial route of every link
//! 5. Run the disruption, or the initial step only when no event is set
//! 6. Log the result and optionally write it as JSON

mod error;
mod scenario;
mod step_logger;

use std::path::{Path, PathBuf};

use disruptsc_core::config::{LogFormat, SimulationConfig};
use disruptsc_core::runner::{self, SimulationResult};
use disruptsc_core::shippers::LinkShippers;
use disruptsc_core::step::SimulationState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::scenario::Scenario;
use crate::step_logger::StepLogger;

/// Default configuration path, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "disruptsc-config.yaml";

/// Default scenario path, relative to the working directory.
const DEFAULT_SCENARIO_PATH: &str = "scenario.json";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned()));
    let scenario_path =
        PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_SCENARIO_PATH.to_owned()));
    let output_path = args.next().map(PathBuf::from);

    // 1. Load configuration.
    let (config, found) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!("disruptsc-engine starting");
    if !found {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        criterion = %config.simulation.route_optimization_weight,
        capacity_constraint = config.simulation.capacity_constraint,
        congestion = config.simulation.congestion,
        firm_data_type = ?config.simulation.firm_data_type,
        events = config.events.len(),
        "Configuration loaded"
    );

    // 3. Load the scenario and build the network.
    let scenario = Scenario::from_file(&scenario_path)?;
    let (mut graph, links) = scenario.into_parts()?;
    config.validate_links(&links)?;

    // 4. Weights and initial routes.
    graph.define_weights(
        config.simulation.route_optimization_weight,
        &config.logistics_modes,
    );
    let mut state = SimulationState::new(graph, config);
    let mut shippers = LinkShippers::new(links);
    let settings = state.transport_settings();
    shippers.initialize_routes(&mut state.graph, &settings);

    // 5. Run.
    let mut observer = StepLogger::new();
    let result = if state.disruptions.is_empty() {
        info!("No disruption configured, running the initial time step only");
        runner::run_static(&mut state, &mut shippers, &mut observer)?
    } else {
        runner::run_disruption(&mut state, &mut shippers, &mut observer)?
    };

    // 6. Log and write results.
    runner::log_simulation_end(&result);
    if let Some(path) = output_path {
        write_result(&path, &result)?;
    }

    info!(
        end_reason = ?result.end_reason,
        steps = result.steps,
        worst_undeliverable = observer.worst_undeliverable(),
        "disruptsc-engine shutdown complete"
    );

    Ok(())
}

/// Initialize the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    match config.logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Load the simulation configuration. Returns the defaults and `false`
/// when the file does not exist.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Write the run result as pretty-printed JSON.
fn write_result(path: &Path, result: &SimulationResult) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(result).map_err(|e| EngineError::Output {
        message: format!("failed to serialize result: {e}"),
    })?;
    std::fs::write(path, json).map_err(|e| EngineError::Output {
        message: format!("failed to write {}: {e}", path.display()),
    })?;
    info!(path = %path.display(), "Result written");
    Ok(())
}
