//! Turn orchestration: the fixed sequence that advances the colony one turn.
//!
//! Each turn runs through these phases on a private clone of the snapshot:
//!
//! 1. **Clock** -- advance the turn counter and derive the season.
//! 2. **Assignments** -- give every pawn without one a default assignment,
//!    then set `working` for every awake, non-eating pawn with active work.
//! 3. **Harvest** -- renew resource nodes, then plan and apply the harvest.
//! 4. **Transient flags** -- finish last turn's meals; wake sleepers whose
//!    continuation condition failed.
//! 5. **Re-sync** -- align `working` with assignments again.
//! 6. **Automatic needs** -- eat if hungry, otherwise fall asleep if tired.
//! 7. **Needs update** -- hunger, fatigue, health, and mood.
//! 8. **Queues and events** -- count down build, craft, and research queues,
//!    then consult the event source and apply its consequences.
//! 9. **Invalidate** -- clear the modifier cache.
//! 10. **Publish** -- swap the clone in as the authoritative snapshot.
//!
//! Any error in phases 1-8 aborts the turn: the clone is dropped, the
//! previous snapshot stays authoritative, and the result reports
//! `success: false`. Problems that can be handled locally (missing
//! references, clamped values) are recorded as issues and the turn goes on.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use colony_agents::{activity, inventory, needs, work, AgentError};
use colony_types::{ActivityId, ActivityState, ItemId, LocationId, ModifierResult, PawnId, Season};
use colony_world::{Catalog, WorldError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{ClockError, TurnClock};
use crate::config::ColonyConfig;
use crate::events::{self, EventError, EventSource};
use crate::harvest::{self, HarvestError};
use crate::issue::TurnIssue;
use crate::modifiers::ModifierEngine;
use crate::state::{GameState, QueueCompletions, StateError};

/// Errors that abort a turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Harvesting failed.
    #[error("harvest error: {source}")]
    Harvest {
        /// The underlying harvest error.
        #[from]
        source: HarvestError,
    },

    /// A per-pawn needs or activity update failed.
    #[error("agent error for {pawn}: {source}")]
    Agent {
        /// The pawn being processed.
        pawn: PawnId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// Countdown queue completion failed.
    #[error("queue error: {source}")]
    Queue {
        /// The underlying state error.
        #[from]
        source: StateError,
    },

    /// The event source failed.
    #[error("event error: {source}")]
    Event {
        /// The underlying event error.
        #[from]
        source: EventError,
    },

    /// Applying event consequences failed.
    #[error("event consequence error: {source}")]
    Consequence {
        /// The underlying stockpile error.
        source: AgentError,
    },
}

/// What happened during a committed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// The turn that ran.
    pub turn: u64,
    /// Season during the turn.
    pub season: Season,
    /// Pawns working at end of turn.
    pub working: u32,
    /// Pawns asleep at end of turn.
    pub sleeping: u32,
    /// Pawns eating at end of turn.
    pub eating: u32,
    /// Pawns idle at end of turn.
    pub idle: u32,
    /// Units regrown per location.
    pub renewal: BTreeMap<LocationId, BTreeMap<ItemId, u32>>,
    /// Units harvested per resource.
    pub harvested: BTreeMap<ItemId, u32>,
    /// Meals eaten.
    pub meals: u32,
    /// Queue entries that completed.
    pub completions: QueueCompletions,
    /// Name of the event that fired, if any.
    pub event: Option<String>,
    /// Total units in the stockpile at end of turn.
    pub stockpile_units: u32,
}

/// Outcome of [`TurnOrchestrator::process_turn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnProcessingResult {
    /// The turn attempted.
    pub turn: u64,
    /// Whether the turn was committed.
    pub success: bool,
    /// Issues recorded, fatal and non-fatal.
    pub errors: Vec<TurnIssue>,
    /// Summary of a committed turn.
    pub summary: Option<TurnSummary>,
    /// When processing finished.
    pub processed_at: DateTime<Utc>,
}

/// Owns the snapshot and drives it forward one turn at a time.
pub struct TurnOrchestrator {
    catalog: Catalog,
    config: ColonyConfig,
    state: GameState,
    engine: ModifierEngine,
    events: Box<dyn EventSource>,
}

impl core::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("turn", &self.state.turn())
            .field("pawns", &self.state.pawns.len())
            .field("cache_generation", &self.engine.generation())
            .finish_non_exhaustive()
    }
}

impl TurnOrchestrator {
    /// Create an orchestrator for a fresh colony.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Clock`] if the time configuration is invalid.
    pub fn new(
        catalog: Catalog,
        config: ColonyConfig,
        events: Box<dyn EventSource>,
    ) -> Result<Self, TurnError> {
        let clock = TurnClock::new(&config.time)?;
        let state = GameState::new(&catalog, clock);
        Ok(Self::with_state(catalog, config, state, events))
    }

    /// Create an orchestrator around an existing snapshot.
    pub fn with_state(
        catalog: Catalog,
        config: ColonyConfig,
        state: GameState,
        events: Box<dyn EventSource>,
    ) -> Self {
        Self {
            catalog,
            config,
            state,
            engine: ModifierEngine::new(),
            events,
        }
    }

    /// The authoritative snapshot.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the snapshot between turns (player commands,
    /// setup). Clears the modifier cache since inputs may change.
    pub fn state_mut(&mut self) -> &mut GameState {
        self.engine.invalidate();
        &mut self.state
    }

    /// The content catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration.
    pub const fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// The modifier engine.
    pub const fn engine(&self) -> &ModifierEngine {
        &self.engine
    }

    /// Efficiency of a pawn at an activity against the current snapshot.
    pub fn efficiency(
        &mut self,
        pawn: &PawnId,
        activity: &ActivityId,
        location: Option<&LocationId>,
    ) -> ModifierResult {
        self.engine
            .resolve(pawn, activity, &self.state, &self.catalog, location)
    }

    /// Run one turn.
    ///
    /// The returned result always carries the turn attempted. On failure
    /// the snapshot is unchanged and `errors` ends with the fatal issue.
    pub fn process_turn(&mut self) -> TurnProcessingResult {
        let attempted = self.state.turn().saturating_add(1);
        let mut working = self.state.clone();
        let mut issues = Vec::new();

        let outcome = self.run_phases(&mut working, &mut issues);

        // Phase 9: invalidate
        self.engine.invalidate();

        match outcome {
            Ok(summary) => {
                // Phase 10: publish
                self.state = working;
                self.events.turn_committed(summary.turn);
                info!(
                    turn = summary.turn,
                    season = ?summary.season,
                    working = summary.working,
                    sleeping = summary.sleeping,
                    eating = summary.eating,
                    idle = summary.idle,
                    meals = summary.meals,
                    issues = issues.len(),
                    "turn committed"
                );
                TurnProcessingResult {
                    turn: summary.turn,
                    success: true,
                    errors: issues,
                    summary: Some(summary),
                    processed_at: Utc::now(),
                }
            }
            Err(err) => {
                warn!(turn = attempted, %err, "turn aborted; snapshot rolled back");
                issues.push(TurnIssue::subsystem(err.to_string()));
                TurnProcessingResult {
                    turn: attempted,
                    success: false,
                    errors: issues,
                    summary: None,
                    processed_at: Utc::now(),
                }
            }
        }
    }

    fn run_phases(
        &mut self,
        working: &mut GameState,
        issues: &mut Vec<TurnIssue>,
    ) -> Result<TurnSummary, TurnError> {
        // Phase 1: clock
        let turn = working.clock.advance()?;
        let season = working.clock.season()?;
        debug!(turn, season = ?season, "turn started");

        // Phase 2: assignments
        phase_assignments(working, &self.catalog, &self.config);
        sync_all_working(working, &self.catalog);

        // Phase 3: harvest
        let renewal = phase_renewal(working, season, issues)?;
        let plan = harvest::plan_harvest(
            working,
            &self.catalog,
            &mut self.engine,
            self.config.work.base_harvest_rate,
        );
        let harvest = harvest::apply_harvest(working, &self.catalog, &plan)?;
        issues.extend(harvest.issues);

        // Phase 4: transient flags
        for pawn in working.pawns.values_mut() {
            activity::clear_transient(pawn, &self.config.needs);
        }

        // Phase 5: re-sync
        sync_all_working(working, &self.catalog);

        // Phase 6: automatic needs
        let meals = phase_automatic_needs(working, &self.catalog, &self.config, turn)?;

        // Phase 7: needs update
        phase_needs(working, &self.catalog, &self.config, turn, issues)?;

        // Phase 8: queues and events
        let completions = working.advance_queues(&self.catalog)?;
        let event = match self.events.next_event(working)? {
            Some(event) => {
                let recorded = events::apply_event(working, &self.catalog, &event)
                    .map_err(|source| TurnError::Consequence { source })?;
                issues.extend(recorded);
                Some(event.name)
            }
            None => None,
        };

        for issue in issues.iter() {
            debug!(turn, kind = ?issue.kind, message = %issue.message, "issue recorded");
        }

        Ok(summarize(working, turn, season, renewal, harvest.yields, meals, completions, event))
    }
}

/// Give every pawn without an assignment the default one.
fn phase_assignments(working: &mut GameState, catalog: &Catalog, config: &ColonyConfig) {
    let missing: Vec<PawnId> = working
        .pawns
        .keys()
        .filter(|id| !working.assignments.contains_key(*id))
        .copied()
        .collect();
    for pawn in missing {
        let assignment = work::default_assignment(
            catalog,
            &working.locations,
            &working.completed_research,
            config.work.default_priority,
        );
        debug!(
            pawn = %pawn,
            location = ?assignment.current_location,
            activities = assignment.priorities.len(),
            "default assignment created"
        );
        working.assignments.insert(pawn, assignment);
    }
}

/// Flag every awake, fed pawn as working iff its current job is unblocked.
fn sync_all_working(working: &mut GameState, catalog: &Catalog) {
    for (id, pawn) in &mut working.pawns {
        let active = working.assignments.get(id).is_some_and(|assignment| {
            work::is_unblocked(
                assignment,
                catalog,
                &working.locations,
                &working.completed_research,
            )
        });
        activity::sync_working(&mut pawn.state, active);
    }
}

/// Regrow every node, then clamp anything out of bounds.
fn phase_renewal(
    working: &mut GameState,
    season: Season,
    issues: &mut Vec<TurnIssue>,
) -> Result<BTreeMap<LocationId, BTreeMap<ItemId, u32>>, TurnError> {
    let mut renewal = BTreeMap::new();
    for (id, location) in &mut working.locations {
        let regrown = location.renew_all(season)?;
        for resource in location.clamp_all() {
            issues.push(TurnIssue::corrected(format!(
                "node {resource} at {id} was out of bounds"
            )));
        }
        if !regrown.is_empty() {
            renewal.insert(id.clone(), regrown);
        }
    }
    Ok(renewal)
}

fn phase_automatic_needs(
    working: &mut GameState,
    catalog: &Catalog,
    config: &ColonyConfig,
    turn: u64,
) -> Result<u32, TurnError> {
    let mut meals: u32 = 0;
    for (id, pawn) in &mut working.pawns {
        let outcome = activity::run_automatic_needs(
            pawn,
            &mut working.stockpile,
            catalog,
            &config.needs,
            turn,
        )
        .map_err(|source| TurnError::Agent { pawn: *id, source })?;
        if outcome.meal.is_some() {
            meals = meals.saturating_add(1);
        }
        if outcome.went_hungry {
            debug!(pawn = %id, hunger = %pawn.needs.hunger, "pawn went hungry: no food");
        }
    }
    Ok(meals)
}

fn phase_needs(
    working: &mut GameState,
    catalog: &Catalog,
    config: &ColonyConfig,
    turn: u64,
    issues: &mut Vec<TurnIssue>,
) -> Result<(), TurnError> {
    for (id, pawn) in &mut working.pawns {
        let result = needs::apply_needs_tick(pawn, catalog, &config.needs, turn)
            .map_err(|source| TurnError::Agent { pawn: *id, source })?;
        for missing in result.missing_traits {
            issues.push(TurnIssue::missing(format!(
                "pawn {id} has unknown trait {missing}"
            )));
        }
        if needs::clamp_needs(pawn) {
            issues.push(TurnIssue::corrected(format!("pawn {id} needs clamped")));
        }
        if pawn.state.normalize() {
            issues.push(TurnIssue::corrected(format!(
                "pawn {id} had conflicting activity flags"
            )));
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn summarize(
    working: &GameState,
    turn: u64,
    season: Season,
    renewal: BTreeMap<LocationId, BTreeMap<ItemId, u32>>,
    harvested: BTreeMap<ItemId, u32>,
    meals: u32,
    completions: QueueCompletions,
    event: Option<String>,
) -> TurnSummary {
    let mut counts = [0_u32; 4];
    for pawn in working.pawns.values() {
        let slot = match pawn.state.activity() {
            ActivityState::Working => 0,
            ActivityState::Sleeping => 1,
            ActivityState::Eating => 2,
            ActivityState::Idle => 3,
        };
        if let Some(count) = counts.get_mut(slot) {
            *count = count.saturating_add(1);
        }
    }
    let [working_count, sleeping, eating, idle] = counts;

    TurnSummary {
        turn,
        season,
        working: working_count,
        sleeping,
        eating,
        idle,
        renewal,
        harvested,
        meals,
        completions,
        event,
        stockpile_units: inventory::total_units(&working.stockpile).unwrap_or(u32::MAX),
    }
}
