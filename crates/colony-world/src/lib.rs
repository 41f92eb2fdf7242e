//! Content catalog, locations, and resource nodes for the colony simulation.
//!
//! This crate models the static content (what activities, items, buildings,
//! traits, and places exist) and the mutable state of the physical world
//! (resource nodes that deplete and regrow).
//!
//! # Modules
//!
//! - [`catalog`] -- Definitions and the read-only [`Catalog`] registry.
//! - [`discovery`] -- Keyword matching of named effects to activities.
//! - [`error`] -- Error types for catalog and location operations.
//! - [`location`] -- [`LocationState`] with discovery and resource nodes.
//! - [`resource`] -- Renewal and depletion-aware extraction for nodes.
//! - [`structure`] -- Linear stacking of building bonuses.
//! - [`starting_catalog`] -- Default content for a new colony.

pub mod catalog;
pub mod discovery;
pub mod error;
pub mod location;
pub mod resource;
pub mod starting_catalog;
pub mod structure;

// Re-export primary types at crate root.
pub use catalog::{
    ActivityDef, BuildingDef, Catalog, Effect, ItemDef, LocationDef, ResearchDef, TraitDef,
    TraitEffect,
};
pub use discovery::EffectTarget;
pub use error::WorldError;
pub use location::LocationState;
pub use starting_catalog::create_starting_catalog;
pub use structure::{building_bonus, stacked_factor, structure_factors};
