//! Error types for the `colony-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use colony_types::{ActivityId, BuildingId, ItemId, LocationId, ResearchId, TraitId};

/// Errors that can occur during catalog and location operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A location was not found.
    #[error("location not found: {0}")]
    LocationNotFound(LocationId),

    /// The requested resource does not exist at the location.
    #[error("resource {resource} not available at location {location}")]
    ResourceNotAvailable {
        /// The requested resource.
        resource: ItemId,
        /// The location.
        location: LocationId,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,

    /// An activity id was registered twice.
    #[error("duplicate activity id: {0}")]
    DuplicateActivity(ActivityId),

    /// An item id was registered twice.
    #[error("duplicate item id: {0}")]
    DuplicateItem(ItemId),

    /// A building id was registered twice.
    #[error("duplicate building id: {0}")]
    DuplicateBuilding(BuildingId),

    /// A trait id was registered twice.
    #[error("duplicate trait id: {0}")]
    DuplicateTrait(TraitId),

    /// A location id was registered twice.
    #[error("duplicate location id: {0}")]
    DuplicateLocation(LocationId),

    /// A research id was registered twice.
    #[error("duplicate research id: {0}")]
    DuplicateResearch(ResearchId),
}
