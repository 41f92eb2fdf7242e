//! Enumeration types for the colony simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pawn attributes
// ---------------------------------------------------------------------------

/// One of the six core attributes every pawn carries.
///
/// Attribute values are whole numbers where 10 is the colony average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Raw physical power (woodcutting, mining, construction).
    Strength,
    /// Fine motor control (crafting, fishing).
    Dexterity,
    /// Stamina and resistance to strain.
    Endurance,
    /// Reasoning and learning (research, medicine).
    Intelligence,
    /// Awareness of surroundings (hunting, foraging).
    Perception,
    /// Social presence (trading, teaching).
    Charisma,
}

impl Attribute {
    /// Every attribute, in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Endurance,
        Self::Intelligence,
        Self::Perception,
        Self::Charisma,
    ];
}

impl core::fmt::Display for Attribute {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Endurance => "endurance",
            Self::Intelligence => "intelligence",
            Self::Perception => "perception",
            Self::Charisma => "charisma",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Season of the year, derived from the turn counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// Growth season: seasonal renewal +25%.
    Spring,
    /// Baseline season.
    Summer,
    /// Harvest season: seasonal renewal -25%.
    Autumn,
    /// Dormant season: seasonal renewal -75%.
    Winter,
}

/// How a resource node replenishes itself between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalType {
    /// Finite deposit; never regrows.
    None,
    /// Regrows by its renewal rate each turn (small rates).
    Slow,
    /// Regrows by its renewal rate each turn (large rates).
    Fast,
    /// Regrows by its renewal rate, scaled by the current season.
    Seasonal,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Broad category of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Edible; carries a nutrition value.
    Food,
    /// Raw or processed building material.
    Material,
    /// Equippable tool that improves work.
    Tool,
    /// Equippable clothing or armor.
    Apparel,
    /// Consumable medical supply.
    Medicine,
}

/// Equipment slot on a pawn. Each slot holds at most one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    /// Primary hand (tools, weapons).
    MainHand,
    /// Secondary hand.
    OffHand,
    /// Headwear.
    Head,
    /// Body clothing.
    Body,
    /// Footwear.
    Feet,
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// Broad category of an activity in the work catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    /// Extracting raw resources from nodes (foraging, mining, fishing).
    Gathering,
    /// Turning materials into goods.
    Crafting,
    /// General colony upkeep and construction.
    Labor,
    /// Knowledge work.
    Research,
}

/// Mutually exclusive activity state of a pawn within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    /// Performing the assigned work.
    Working,
    /// Asleep and recovering fatigue.
    Sleeping,
    /// Eating a meal this turn.
    Eating,
    /// None of the above.
    Idle,
}

// ---------------------------------------------------------------------------
// Modifier provenance
// ---------------------------------------------------------------------------

/// Where a factor in a resolved efficiency value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOrigin {
    /// The activity's declared base efficiency.
    Base,
    /// Scaling from the activity's primary attribute.
    PrimaryAttribute,
    /// Scaling from the activity's secondary attribute.
    SecondaryAttribute,
    /// An innate trait of the pawn.
    Trait,
    /// An equipped item.
    Item,
    /// A constructed building type (all copies combined).
    Structure,
    /// The location the work happens at.
    Location,
    /// A transient condition (health, mood, fatigue).
    Condition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_display_is_lowercase() {
        assert_eq!(Attribute::Strength.to_string(), "strength");
        assert_eq!(Attribute::Charisma.to_string(), "charisma");
    }

    #[test]
    fn enums_serialize_snake_case() {
        let json = serde_json::to_string(&RenewalType::Seasonal).ok();
        assert_eq!(json.as_deref(), Some("\"seasonal\""));
        let json = serde_json::to_string(&EquipmentSlot::MainHand).ok();
        assert_eq!(json.as_deref(), Some("\"main_hand\""));
    }
}
