//! Pawn needs, activity state machine, meals, and work assignments.
//!
//! This crate holds the per-pawn logic of the colony simulation. It works on
//! the plain data from `colony-types`, reads content from the
//! `colony-world` catalog, and never touches the turn sequencing itself;
//! that belongs to `colony-core`.
//!
//! # Modules
//!
//! - [`activity`] -- Working / sleeping / eating / idle transitions with
//!   sleep hysteresis.
//! - [`config`] -- Tunable needs parameters ([`NeedsConfig`]).
//! - [`eating`] -- Meal sessions against the shared stockpile.
//! - [`error`] -- Error types for agent operations ([`AgentError`]).
//! - [`inventory`] -- Shared stockpile operations.
//! - [`needs`] -- Per-turn hunger, fatigue, health, and mood updates.
//! - [`work`] -- Work assignments and the round-robin activity rotation.

pub mod activity;
pub mod config;
pub mod eating;
pub mod error;
pub mod inventory;
pub mod needs;
pub mod work;

// Re-export primary types at crate root for convenience.
pub use activity::{AutomaticOutcome, TransientCleared};
pub use config::{NeedsConfig, SleepBand};
pub use eating::MealReport;
pub use error::AgentError;
pub use inventory::Stockpile;
pub use needs::NeedsTickResult;
