//! Engine binary for the swarm architecture simulation.
//!
//! Loads configuration, spawns the swarm, and runs the paced tick loop until
//! the tick limit is reached or the process receives Ctrl-C. On shutdown the
//! agents' trajectories are exported for offline inspection.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (first CLI argument, else `swarm-config.yaml`)
//! 2. Initialize structured logging (`RUST_LOG` wins over `logging.level`)
//! 3. Create the simulation state and spawn the swarm
//! 4. Create run control and install the Ctrl-C handler
//! 5. Run the simulation loop
//! 6. Log the result and export trajectories

mod error;
mod run_log;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use swarm_core::{
    RunControl, SimulationConfig, SimulationState, TrajectoryExport, log_simulation_end,
    run_simulation,
};
use tracing::{Instrument as _, info, info_span, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::error::EngineError;
use crate::run_log::RunLogCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "swarm-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, startup, the run, or the shutdown
/// export fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, found) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging.level)?;

    let run_id = Uuid::now_v7();
    info!(%run_id, "swarm-engine starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        agents = config.population.agent_count,
        anchor_threshold = config.population.anchor_threshold,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.world.max_ticks,
        "Run parameters"
    );

    // 3. Create the simulation state.
    let control = Arc::new(RunControl::new(&config.world));
    let mut state = SimulationState::new(config)?;

    // 4. Stop cleanly on Ctrl-C.
    let signal_control = Arc::clone(&control);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                signal_control.request_stop();
            }
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
        }
    });

    // 5. Run the simulation.
    let mut callback = RunLogCallback::new(run_id);
    let result = run_simulation(&mut state, &control, &mut callback)
        .instrument(info_span!("run", %run_id))
        .await?;

    // 6. Log results and export.
    log_simulation_end(&result);
    let stats = callback.stats();
    info!(
        %run_id,
        rooms_at_commit = stats.rooms_at_commit,
        peak_rooms = stats.peak_rooms,
        rooms_left = state.layout.room_count(),
        promoted = stats.promoted,
        demoted = stats.demoted,
        removed = stats.removed,
        door_refreshes = stats.door_refreshes,
        "Layout history"
    );

    if state.config.export.on_shutdown {
        TrajectoryExport::capture(&state.agents, state.config.canvas)
            .write_to(&state.config.export.path)?;
    }

    info!(
        %run_id,
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "swarm-engine shutdown complete"
    );
    Ok(())
}

/// Load the configuration at `path`, falling back to defaults when the file
/// does not exist. The flag reports whether the file was found.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured level.
fn init_logging(level: &str) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| EngineError::LogFilter {
            directive: level.to_owned(),
            message: e.to_string(),
        })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}
