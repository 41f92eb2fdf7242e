//! Output types of the modifier resolution engine.
//!
//! A [`ModifierResult`] carries the final efficiency of a pawn at an
//! activity together with every factor that went into it, in the order the
//! factors were applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::ModifierOrigin;

/// One factor contributing to a resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierSource {
    /// Identifier of the contributor (attribute name, trait id, item id, ...).
    pub id: String,
    /// What kind of contributor this is.
    pub origin: ModifierOrigin,
    /// The value contributed. For [`ModifierOrigin::Base`] this is the base
    /// value; for every other origin it is a multiplicative factor.
    pub value: Decimal,
    /// Human-readable explanation.
    pub rationale: String,
}

/// Effective efficiency of a pawn at an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierResult {
    /// The activity's declared base efficiency.
    pub base_value: Decimal,
    /// `base_value * multiplier`.
    pub total_value: Decimal,
    /// Product of every non-base factor.
    pub multiplier: Decimal,
    /// Every contributing factor, in application order.
    pub sources: Vec<ModifierSource>,
}

impl ModifierResult {
    /// The neutral result used when a reference cannot be resolved:
    /// efficiency 1.0 with no sources.
    pub const fn neutral() -> Self {
        Self {
            base_value: Decimal::ONE,
            total_value: Decimal::ONE,
            multiplier: Decimal::ONE,
            sources: Vec::new(),
        }
    }

    /// Whether any source of the given origin contributed.
    pub fn has_origin(&self, origin: ModifierOrigin) -> bool {
        self.sources.iter().any(|s| s.origin == origin)
    }
}
