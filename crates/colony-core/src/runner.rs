//! Multi-turn simulation loop.
//!
//! [`run_simulation`] drives a [`TurnOrchestrator`] until the turn limit is
//! reached or a turn fails, notifying a [`TurnObserver`] after every
//! committed turn.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::state::GameState;
use crate::turn::{TurnOrchestrator, TurnProcessingResult, TurnSummary};

/// Why the run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RunEndReason {
    /// The configured number of turns completed.
    MaxTurnsReached,
    /// A turn was aborted and rolled back.
    TurnFailed {
        /// The turn that failed.
        turn: u64,
        /// The fatal error message.
        message: String,
    },
}

/// Result of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// The summary of the last committed turn, if any.
    pub final_summary: Option<TurnSummary>,
    /// Number of turns committed during this run.
    pub total_turns: u64,
}

/// Callback invoked after each committed turn.
///
/// Receives the processing result and the freshly published snapshot.
pub trait TurnObserver {
    /// Called after a turn is committed.
    fn on_turn(&mut self, result: &TurnProcessingResult, state: &GameState);
}

/// An observer that ignores every turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl TurnObserver for NoOpObserver {
    fn on_turn(&mut self, _result: &TurnProcessingResult, _state: &GameState) {}
}

/// Run turns until `max_turns` have been committed (0 runs until a turn
/// fails).
pub fn run_simulation(
    orchestrator: &mut TurnOrchestrator,
    max_turns: u64,
    observer: &mut dyn TurnObserver,
) -> SimulationResult {
    let mut final_summary: Option<TurnSummary> = None;
    let mut total_turns: u64 = 0;

    info!(
        max_turns,
        start_turn = orchestrator.state().turn(),
        pawns = orchestrator.state().pawns.len(),
        "simulation starting"
    );

    loop {
        if max_turns > 0 && total_turns >= max_turns {
            info!(total_turns, max_turns, "turn limit reached");
            return SimulationResult {
                end_reason: RunEndReason::MaxTurnsReached,
                final_summary,
                total_turns,
            };
        }

        let mut result = orchestrator.process_turn();
        if !result.success {
            let message = result
                .errors
                .iter()
                .rev()
                .find(|issue| issue.is_fatal())
                .map_or_else(|| String::from("unknown failure"), |issue| issue.message.clone());
            return SimulationResult {
                end_reason: RunEndReason::TurnFailed {
                    turn: result.turn,
                    message,
                },
                final_summary,
                total_turns,
            };
        }

        total_turns = total_turns.saturating_add(1);
        observer.on_turn(&result, orchestrator.state());
        final_summary = result.summary.take();
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_turns = result.total_turns,
        final_turn = result.final_summary.as_ref().map(|s| s.turn),
        "simulation ended"
    );

    if let Some(summary) = &result.final_summary {
        info!(
            turn = summary.turn,
            season = ?summary.season,
            working = summary.working,
            sleeping = summary.sleeping,
            stockpile_units = summary.stockpile_units,
            "final turn summary"
        );
    } else {
        warn!("simulation ended with no turns committed");
    }
}
