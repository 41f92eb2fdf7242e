//! Colony engine binary.
//!
//! Wires the starter catalog, the founding population, and the turn
//! orchestrator together, runs the configured number of turns, and prints
//! the final colony snapshot as JSON on stdout.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `colony-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the starter catalog
//! 4. Create the turn orchestrator
//! 5. Spawn the founding pawns
//! 6. Run the simulation loop
//! 7. Log the result and print the final snapshot

mod error;
mod observer;
mod spawner;

use std::path::Path;

use colony_core::{ColonyConfig, NoEvents, TurnOrchestrator, runner};
use colony_world::create_starting_catalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer::LoggingObserver;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "colony-config.yaml";

/// Application entry point for the colony engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the final
/// snapshot cannot be serialized.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember whether
    //    the file was found and report it afterwards.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        colony = %config.world.name,
        from_file,
        max_turns = config.simulation.max_turns,
        "colony-engine starting"
    );

    // 3. Build the starter catalog.
    let catalog = create_starting_catalog().map_err(EngineError::from)?;
    info!(
        activities = catalog.activities().count(),
        items = catalog.items().count(),
        locations = catalog.locations().len(),
        "catalog loaded"
    );

    // 4. Create the orchestrator.
    let mut orchestrator = TurnOrchestrator::new(catalog, config.clone(), Box::new(NoEvents::new()))
        .map_err(EngineError::from)?;

    // 5. Spawn founders.
    let founders = spawner::spawn_pawns(&config.world, orchestrator.catalog())?;
    let state = orchestrator.state_mut();
    for pawn in founders {
        state.add_pawn(pawn);
    }

    // 6. Run the simulation.
    let mut observer = LoggingObserver::new();
    let result = runner::run_simulation(
        &mut orchestrator,
        config.simulation.max_turns,
        &mut observer,
    );

    // 7. Log results and publish the final snapshot.
    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_turns = result.total_turns,
        issues = observer.issues_seen(),
        "colony-engine shutdown complete"
    );

    let snapshot = serde_json::to_string_pretty(orchestrator.state()).map_err(EngineError::from)?;
    println!("{snapshot}");

    Ok(())
}

/// Load the configuration from [`CONFIG_PATH`], falling back to defaults
/// when the file does not exist.
fn load_config() -> Result<(ColonyConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((ColonyConfig::from_file(config_path)?, true))
    } else {
        Ok((ColonyConfig::default(), false))
    }
}
