//! Random events: the source trait and how consequences are applied.
//!
//! Once per turn, after the countdown queues, the orchestrator asks its
//! [`EventSource`] for at most one [`GameEvent`]. How events are chosen is
//! the source's business; the engine only knows the output contract, a list
//! of [`Consequence`] values it applies to the working snapshot.
//!
//! [`NoEvents`] never fires. [`ScriptedEvents`] replays a fixed schedule,
//! which makes turns reproducible in tests.

use std::collections::BTreeMap;

use colony_agents::needs::clamp_unit;
use colony_agents::{inventory, AgentError};
use colony_types::{ItemId, PawnId};
use colony_world::Catalog;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::issue::TurnIssue;
use crate::state::GameState;

/// Errors raised by an event source.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The source could not produce an answer.
    #[error("event source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// One effect of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Consequence {
    /// Add (positive) or remove (negative) stock.
    Stockpile {
        /// Affected item.
        item: ItemId,
        /// Signed change in units.
        delta: i64,
    },
    /// Change one pawn's mood.
    PawnMood {
        /// Affected pawn.
        pawn: PawnId,
        /// Signed change.
        delta: Decimal,
    },
    /// Change one pawn's health.
    PawnHealth {
        /// Affected pawn.
        pawn: PawnId,
        /// Signed change.
        delta: Decimal,
    },
    /// Change every pawn's mood.
    ColonyMood {
        /// Signed change.
        delta: Decimal,
    },
}

/// Something that happened to the colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Short description, for logs and observers.
    pub name: String,
    /// Effects, applied in order.
    pub consequences: Vec<Consequence>,
}

/// A source of random events.
///
/// The orchestrator calls [`next_event`] once per turn with the working
/// snapshot, after the countdown queues have advanced, and calls
/// [`turn_committed`] once that turn is published. A rolled-back turn is
/// never committed, so a source that only forgets events on commit offers
/// the same event again when the turn is retried.
///
/// [`next_event`]: EventSource::next_event
/// [`turn_committed`]: EventSource::turn_committed
pub trait EventSource {
    /// Produce this turn's event, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if the source fails; the turn is rolled back.
    fn next_event(&mut self, state: &GameState) -> Result<Option<GameEvent>, EventError>;

    /// The given turn was committed.
    fn turn_committed(&mut self, _turn: u64) {}
}

/// An event source that never fires.
#[derive(Debug, Clone, Default)]
pub struct NoEvents;

impl NoEvents {
    /// Create a new silent source.
    pub const fn new() -> Self {
        Self
    }
}

impl EventSource for NoEvents {
    fn next_event(&mut self, _state: &GameState) -> Result<Option<GameEvent>, EventError> {
        Ok(None)
    }
}

/// Fires pre-arranged events on specific turns.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    schedule: BTreeMap<u64, GameEvent>,
}

impl ScriptedEvents {
    /// An empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event for a turn, replacing any already there.
    #[must_use]
    pub fn at(mut self, turn: u64, event: GameEvent) -> Self {
        self.schedule.insert(turn, event);
        self
    }

    /// Events whose turn has not been committed yet.
    pub fn pending(&self) -> usize {
        self.schedule.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self, state: &GameState) -> Result<Option<GameEvent>, EventError> {
        Ok(self.schedule.get(&state.turn()).cloned())
    }

    fn turn_committed(&mut self, turn: u64) {
        self.schedule = self.schedule.split_off(&turn.saturating_add(1));
    }
}

/// Add `delta` to a `[0, 100]` value, recording an issue if the result had
/// to be clamped.
fn shift(value: &mut Decimal, delta: Decimal, what: &str, issues: &mut Vec<TurnIssue>) {
    let raw = value.saturating_add(delta);
    let clamped = clamp_unit(raw);
    if clamped != raw {
        issues.push(TurnIssue::corrected(format!(
            "{what} {raw} clamped to {clamped}"
        )));
    }
    *value = clamped;
}

/// Apply an event's consequences to the snapshot.
///
/// Unknown pawns and items are skipped with a recorded issue. Removals
/// larger than the stock empty it.
///
/// # Errors
///
/// Returns [`AgentError`] if a stockpile addition overflows.
pub fn apply_event(
    state: &mut GameState,
    catalog: &Catalog,
    event: &GameEvent,
) -> Result<Vec<TurnIssue>, AgentError> {
    let mut issues = Vec::new();
    info!(event = %event.name, consequences = event.consequences.len(), "event fired");

    for consequence in &event.consequences {
        match consequence {
            Consequence::Stockpile { item, delta } => {
                match inventory::apply_delta(&mut state.stockpile, catalog, item, *delta) {
                    Ok(true) => issues.push(TurnIssue::corrected(format!(
                        "event removed more {item} than stocked; stock emptied"
                    ))),
                    Ok(false) => {}
                    Err(AgentError::UnknownItem(id)) => {
                        issues.push(TurnIssue::missing(format!("event references unknown item {id}")));
                    }
                    Err(e) => return Err(e),
                }
            }
            Consequence::PawnMood { pawn, delta } => match state.pawns.get_mut(pawn) {
                Some(p) => shift(&mut p.state.mood, *delta, "mood", &mut issues),
                None => issues.push(TurnIssue::missing(format!("event references unknown pawn {pawn}"))),
            },
            Consequence::PawnHealth { pawn, delta } => match state.pawns.get_mut(pawn) {
                Some(p) => shift(&mut p.state.health, *delta, "health", &mut issues),
                None => issues.push(TurnIssue::missing(format!("event references unknown pawn {pawn}"))),
            },
            Consequence::ColonyMood { delta } => {
                for p in state.pawns.values_mut() {
                    shift(&mut p.state.mood, *delta, "mood", &mut issues);
                }
            }
        }
    }

    Ok(issues)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{Pawn, Stats};
    use colony_world::create_starting_catalog;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::clock::TurnClock;
    use crate::config::TimeConfig;
    use crate::issue::IssueKind;

    fn setup() -> (Catalog, GameState, PawnId) {
        let catalog = create_starting_catalog().unwrap();
        let clock = TurnClock::new(&TimeConfig::default()).unwrap();
        let mut state = GameState::new(&catalog, clock);
        let id = state.add_pawn(Pawn::new("Witness", Stats::default()));
        (catalog, state, id)
    }

    #[test]
    fn consequences_apply_in_order() {
        let (catalog, mut state, id) = setup();
        let event = GameEvent {
            name: String::from("Traders arrive"),
            consequences: vec![
                Consequence::Stockpile {
                    item: ItemId::from("bread"),
                    delta: 6,
                },
                Consequence::Stockpile {
                    item: ItemId::from("bread"),
                    delta: -2,
                },
                Consequence::PawnHealth {
                    pawn: id,
                    delta: dec!(-15),
                },
                Consequence::ColonyMood { delta: dec!(5) },
            ],
        };
        let issues = apply_event(&mut state, &catalog, &event).unwrap();
        assert!(issues.is_empty());
        assert_eq!(inventory::quantity_of(&state.stockpile, &ItemId::from("bread")), 4);
        let pawn = state.pawn(&id).unwrap();
        assert_eq!(pawn.state.health, dec!(85));
        assert_eq!(pawn.state.mood, dec!(55));
    }

    #[test]
    fn out_of_range_values_are_clamped_and_recorded() {
        let (catalog, mut state, id) = setup();
        let event = GameEvent {
            name: String::from("Festival"),
            consequences: vec![
                Consequence::PawnMood {
                    pawn: id,
                    delta: dec!(80),
                },
                Consequence::Stockpile {
                    item: ItemId::from("wood"),
                    delta: -10,
                },
            ],
        };
        let issues = apply_event(&mut state, &catalog, &event).unwrap();
        assert_eq!(state.pawn(&id).unwrap().state.mood, dec!(100));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::InvariantCorrected));
    }

    #[test]
    fn unknown_references_skipped() {
        let (catalog, mut state, _) = setup();
        let event = GameEvent {
            name: String::from("Strange omen"),
            consequences: vec![
                Consequence::PawnMood {
                    pawn: PawnId::new(),
                    delta: dec!(-5),
                },
                Consequence::Stockpile {
                    item: ItemId::from("unobtainium"),
                    delta: 1,
                },
            ],
        };
        let issues = apply_event(&mut state, &catalog, &event).unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::MissingReference));
        assert!(state.stockpile.is_empty());
    }

    #[test]
    fn scripted_events_fire_on_their_turn_until_committed() {
        let (_, mut state, _) = setup();
        let rain = GameEvent {
            name: String::from("Rain"),
            consequences: Vec::new(),
        };
        let mut source = ScriptedEvents::new().at(1, rain.clone()).at(3, rain);
        assert!(source.next_event(&state).unwrap().is_none());
        state.clock.advance().unwrap();
        assert!(source.next_event(&state).unwrap().is_some());
        // not committed yet: a retry of turn 1 sees it again
        assert!(source.next_event(&state).unwrap().is_some());
        source.turn_committed(1);
        assert!(source.next_event(&state).unwrap().is_none());
        assert_eq!(source.pending(), 1);
    }

    #[test]
    fn consequences_deserialize_from_tagged_json() {
        let json = r#"{"kind":"colony_mood","delta":"-3"}"#;
        let parsed: Consequence = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, Consequence::ColonyMood { delta: dec!(-3) });
    }
}
