//! Turn observer that reports each committed turn through `tracing`.

use colony_core::{GameState, TurnObserver, TurnProcessingResult};
use tracing::{info, warn};

/// Logs a one-line digest per turn and every recovered issue.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    issues_seen: usize,
}

impl LoggingObserver {
    /// A fresh observer.
    pub const fn new() -> Self {
        Self { issues_seen: 0 }
    }

    /// Total recovered issues reported so far.
    pub const fn issues_seen(&self) -> usize {
        self.issues_seen
    }
}

impl TurnObserver for LoggingObserver {
    fn on_turn(&mut self, result: &TurnProcessingResult, state: &GameState) {
        for issue in &result.errors {
            warn!(turn = result.turn, kind = ?issue.kind, message = %issue.message, "turn issue");
        }
        self.issues_seen = self.issues_seen.saturating_add(result.errors.len());

        if let Some(summary) = &result.summary {
            info!(
                turn = summary.turn,
                season = ?summary.season,
                pawns = state.pawns.len(),
                working = summary.working,
                sleeping = summary.sleeping,
                eating = summary.eating,
                meals = summary.meals,
                stockpile_units = summary.stockpile_units,
                event = summary.event.as_deref().unwrap_or("none"),
                "turn digest"
            );
        }
    }
}
