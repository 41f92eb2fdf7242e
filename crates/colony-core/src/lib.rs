//! Turn engine for the colony simulation.
//!
//! This crate ties the catalog, the pawn logic, and the world state into a
//! deterministic turn loop. It owns the snapshot type, the clock, the
//! configuration, the modifier resolution engine, harvesting, and the
//! orchestrator that sequences them.
//!
//! # Modules
//!
//! - [`clock`] -- Turn counter and season derivation ([`TurnClock`]).
//! - [`config`] -- YAML configuration ([`ColonyConfig`]).
//! - [`events`] -- Random event contract ([`EventSource`], [`GameEvent`]).
//! - [`harvest`] -- Plan/apply harvesting against resource nodes.
//! - [`issue`] -- Non-fatal problems recorded during a turn.
//! - [`modifiers`] -- Efficiency resolution with provenance and a
//!   turn-scoped cache ([`ModifierEngine`]).
//! - [`queue`] -- Build, craft, and research countdowns.
//! - [`runner`] -- Multi-turn loop with an observer callback.
//! - [`state`] -- The copy-on-write colony snapshot ([`GameState`]).
//! - [`turn`] -- The ten-phase turn orchestrator ([`TurnOrchestrator`]).

pub mod clock;
pub mod config;
pub mod events;
pub mod harvest;
pub mod issue;
pub mod modifiers;
pub mod queue;
pub mod runner;
pub mod state;
pub mod turn;

// Re-export primary types at crate root for convenience.
pub use clock::{ClockError, TurnClock};
pub use config::{ColonyConfig, ConfigError};
pub use events::{Consequence, EventError, EventSource, GameEvent, NoEvents, ScriptedEvents};
pub use harvest::{HarvestError, HarvestOutcome, HarvestPlan, HarvestTask};
pub use issue::{IssueKind, TurnIssue};
pub use modifiers::ModifierEngine;
pub use queue::{CountdownQueue, CraftOrder};
pub use runner::{NoOpObserver, RunEndReason, SimulationResult, TurnObserver};
pub use state::{GameState, QueueCompletions, StateError};
pub use turn::{TurnError, TurnOrchestrator, TurnProcessingResult, TurnSummary};
