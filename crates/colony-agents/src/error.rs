//! Error types for the colony-agents crate.
//!
//! Operations that can fail return typed errors rather than panicking.
//! Missing catalog references during a turn are not errors here; they are
//! reported back to the caller as data so the turn can continue.

use colony_types::{ItemId, LocationId};

/// Errors that can occur during pawn and stockpile operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The item id is not in the catalog, so no stack can be created for it.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// Attempted to remove more of an item than the stockpile holds.
    #[error("insufficient item: wanted {requested} of {item} but only have {available}")]
    InsufficientItem {
        /// The item being removed.
        item: ItemId,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity actually held.
        available: u32,
    },

    /// A pawn was pointed at a location it is not authorized for.
    #[error("location not authorized: {0}")]
    LocationNotAuthorized(LocationId),

    /// An arithmetic overflow occurred during a needs or stockpile computation.
    #[error("arithmetic overflow in agent computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
