//! Shared type definitions for the colony turn simulation.
//!
//! This crate is the single source of truth for the data that flows between
//! the world, agent, and core crates. It holds plain data only; behaviour
//! lives downstream.
//!
//! # Modules
//!
//! - [`ids`] -- UUID identities for pawns and string keys for catalog entries
//! - [`enums`] -- Attributes, seasons, renewal types, slots, activity states
//! - [`structs`] -- Pawns, needs, work assignments, resource nodes, stacks
//! - [`modifier`] -- Resolved efficiency values with their provenance

pub mod enums;
pub mod ids;
pub mod modifier;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ActivityCategory, ActivityState, Attribute, EquipmentSlot, ItemCategory, ModifierOrigin,
    RenewalType, Season,
};
pub use ids::{ActivityId, BuildingId, ItemId, LocationId, PawnId, ResearchId, TraitId};
pub use modifier::{ModifierResult, ModifierSource};
pub use structs::{
    InventoryStack, MAX_PRIORITY, Needs, Pawn, PawnState, ResourceNode, Stats, WorkAssignment,
};
