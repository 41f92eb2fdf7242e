//! Core entity structs: pawns, needs, work assignments, resource nodes, and
//! stockpile stacks.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{ActivityState, Attribute, EquipmentSlot, ItemCategory, RenewalType};
use crate::ids::{ActivityId, ItemId, LocationId, PawnId, TraitId};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// The six-attribute vector of a pawn. 10 is average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Physical power.
    pub strength: u32,
    /// Fine motor control.
    pub dexterity: u32,
    /// Stamina.
    pub endurance: u32,
    /// Reasoning.
    pub intelligence: u32,
    /// Awareness.
    pub perception: u32,
    /// Social presence.
    pub charisma: u32,
}

impl Stats {
    /// A pawn with every attribute at the given value.
    pub const fn uniform(value: u32) -> Self {
        Self {
            strength: value,
            dexterity: value,
            endurance: value,
            intelligence: value,
            perception: value,
            charisma: value,
        }
    }

    /// Read a single attribute.
    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Endurance => self.endurance,
            Attribute::Intelligence => self.intelligence,
            Attribute::Perception => self.perception,
            Attribute::Charisma => self.charisma,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::uniform(10)
    }
}

// ---------------------------------------------------------------------------
// Needs and state
// ---------------------------------------------------------------------------

/// Physiological needs. Hunger, fatigue, and sleep debt live in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Needs {
    /// 0 is sated, 100 is starving.
    pub hunger: Decimal,
    /// 0 is rested, 100 is exhausted.
    pub fatigue: Decimal,
    /// Accumulated fatigue beyond the comfortable range while awake.
    pub sleep_debt: Decimal,
    /// Turn of the most recent meal.
    pub last_meal: u64,
    /// Turn the pawn last slept.
    pub last_sleep: u64,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            hunger: Decimal::ZERO,
            fatigue: Decimal::ZERO,
            sleep_debt: Decimal::ZERO,
            last_meal: 0,
            last_sleep: 0,
        }
    }
}

/// Mood, health, and the mutually exclusive activity flags of a pawn.
///
/// The three activity flags are private: they can only be changed through
/// [`PawnState::set_activity`], which always leaves at most one set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnState {
    /// 0 is miserable, 50 is neutral, 100 is elated.
    pub mood: Decimal,
    /// 0 is incapacitated, 100 is perfectly healthy.
    pub health: Decimal,
    is_working: bool,
    is_sleeping: bool,
    is_eating: bool,
}

impl PawnState {
    /// A new idle state with the given mood and health.
    pub const fn new(mood: Decimal, health: Decimal) -> Self {
        Self {
            mood,
            health,
            is_working: false,
            is_sleeping: false,
            is_eating: false,
        }
    }

    /// Whether the pawn is working this turn.
    pub const fn is_working(&self) -> bool {
        self.is_working
    }

    /// Whether the pawn is asleep.
    pub const fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    /// Whether the pawn is eating this turn.
    pub const fn is_eating(&self) -> bool {
        self.is_eating
    }

    /// The current activity. Eating outranks sleeping, which outranks working.
    pub const fn activity(&self) -> ActivityState {
        if self.is_eating {
            ActivityState::Eating
        } else if self.is_sleeping {
            ActivityState::Sleeping
        } else if self.is_working {
            ActivityState::Working
        } else {
            ActivityState::Idle
        }
    }

    /// Switch to a new activity, clearing the other two flags.
    pub const fn set_activity(&mut self, activity: ActivityState) {
        self.is_working = matches!(activity, ActivityState::Working);
        self.is_sleeping = matches!(activity, ActivityState::Sleeping);
        self.is_eating = matches!(activity, ActivityState::Eating);
    }

    /// Number of activity flags currently set.
    pub fn active_flag_count(&self) -> usize {
        [self.is_working, self.is_sleeping, self.is_eating]
            .iter()
            .filter(|flag| **flag)
            .count()
    }

    /// Collapse conflicting flags to the highest-precedence activity.
    ///
    /// Returns `true` if a correction was made.
    pub fn normalize(&mut self) -> bool {
        if self.active_flag_count() <= 1 {
            return false;
        }
        let keep = self.activity();
        self.set_activity(keep);
        true
    }
}

impl Default for PawnState {
    fn default() -> Self {
        Self::new(Decimal::from(50), Decimal::ONE_HUNDRED)
    }
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

/// A colonist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    /// Unique identity.
    pub id: PawnId,
    /// Display name.
    pub name: String,
    /// Attribute vector.
    pub stats: Stats,
    /// Physiological needs.
    pub needs: Needs,
    /// Mood, health, and activity flags.
    pub state: PawnState,
    /// Equipped items, at most one per slot.
    pub equipment: BTreeMap<EquipmentSlot, ItemId>,
    /// Personal carried items.
    pub inventory: BTreeMap<ItemId, u32>,
    /// References to shared trait definitions.
    pub traits: Vec<TraitId>,
    /// Experience per activity, one point per turn worked.
    pub skills: BTreeMap<ActivityId, u32>,
}

impl Pawn {
    /// Create a rested, sated, idle pawn with neutral mood and full health.
    pub fn new(name: impl Into<String>, stats: Stats) -> Self {
        Self {
            id: PawnId::new(),
            name: name.into(),
            stats,
            needs: Needs::default(),
            state: PawnState::default(),
            equipment: BTreeMap::new(),
            inventory: BTreeMap::new(),
            traits: Vec::new(),
            skills: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Work assignment
// ---------------------------------------------------------------------------

/// Highest priority an activity can be assigned.
pub const MAX_PRIORITY: u8 = 10;

/// What a pawn should work on and where.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkAssignment {
    /// Activity to priority (1..=10). Activities at 0 are not stored.
    pub priorities: BTreeMap<ActivityId, u8>,
    /// Locations the pawn may work at.
    pub authorized_locations: BTreeSet<LocationId>,
    /// The activity performed on the most recent worked turn.
    pub current_activity: Option<ActivityId>,
    /// Where the pawn works.
    pub current_location: Option<LocationId>,
    /// Round-robin cursor into the priority-sorted activity list.
    pub job_index: u32,
}

// ---------------------------------------------------------------------------
// Resources and stockpile
// ---------------------------------------------------------------------------

/// A location-bound, possibly renewable pool of one harvestable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// The item this node yields.
    pub resource: ItemId,
    /// Units currently available (`<= max_amount`).
    pub current_amount: u32,
    /// Capacity ceiling.
    pub max_amount: u32,
    /// Units regrown per turn before seasonal scaling.
    pub renewal_rate: u32,
    /// How the node regrows.
    pub renewal_type: RenewalType,
    /// Units removed from the node per unit harvested.
    pub depletion: Decimal,
}

/// One stockpile entry, built from the item's catalog template on first
/// acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStack {
    /// Which item.
    pub item: ItemId,
    /// Display name copied from the catalog.
    pub name: String,
    /// Category copied from the catalog.
    pub category: ItemCategory,
    /// Units held.
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn set_activity_keeps_one_flag() {
        let mut state = PawnState::default();
        state.set_activity(ActivityState::Working);
        assert!(state.is_working());
        state.set_activity(ActivityState::Sleeping);
        assert!(state.is_sleeping());
        assert!(!state.is_working());
        assert_eq!(state.active_flag_count(), 1);
        state.set_activity(ActivityState::Idle);
        assert_eq!(state.active_flag_count(), 0);
    }

    #[test]
    fn normalize_repairs_corrupted_flags() {
        let json = r#"{"mood":"50","health":"100","is_working":true,"is_sleeping":true,"is_eating":false}"#;
        let parsed: Result<PawnState, _> = serde_json::from_str(json);
        assert!(parsed.is_ok());
        let mut state = parsed.unwrap_or_default();
        assert_eq!(state.active_flag_count(), 2);
        assert!(state.normalize());
        assert_eq!(state.activity(), ActivityState::Sleeping);
        assert_eq!(state.active_flag_count(), 1);
        assert!(!state.normalize());
    }

    #[test]
    fn new_pawn_is_rested_and_neutral() {
        let pawn = Pawn::new("Ada", Stats::default());
        assert_eq!(pawn.needs.hunger, Decimal::ZERO);
        assert_eq!(pawn.state.mood, dec!(50));
        assert_eq!(pawn.state.health, dec!(100));
        assert_eq!(pawn.state.activity(), ActivityState::Idle);
    }

    #[test]
    fn stats_lookup_by_attribute() {
        let stats = Stats {
            strength: 14,
            ..Stats::default()
        };
        assert_eq!(stats.get(Attribute::Strength), 14);
        assert_eq!(stats.get(Attribute::Charisma), 10);
    }
}
