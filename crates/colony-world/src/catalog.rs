//! Static content definitions: activities, items, buildings, traits,
//! locations, and research projects.
//!
//! A [`Catalog`] is built once at startup and shared read-only by every
//! turn. Pawns and locations refer to catalog entries by key; nothing in the
//! catalog changes while the simulation runs.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{
    ActivityCategory, ActivityId, Attribute, BuildingId, EquipmentSlot, ItemCategory, ItemId,
    LocationId, ResearchId, ResourceNode, TraitId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A named numeric effect carried by an item or building.
///
/// The name decides which activities the effect applies to (see
/// [`crate::discovery`]); the value is a multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Effect name, e.g. `woodcutting_speed` or `productivity`.
    pub name: String,
    /// Multiplicative value, 1.0 is neutral.
    pub value: Decimal,
}

impl Effect {
    /// Construct an effect.
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A form of labor a pawn can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDef {
    /// Catalog key.
    pub id: ActivityId,
    /// Display name.
    pub name: String,
    /// Broad category.
    pub category: ActivityCategory,
    /// Efficiency before any modifier.
    pub base_efficiency: Decimal,
    /// Attribute scaling efficiency by `value / 10`.
    pub primary_attribute: Attribute,
    /// Optional attribute scaling efficiency by `1 + (value - 10) / 50`.
    pub secondary_attribute: Option<Attribute>,
    /// Difficulty tier. Lower tiers are preferred for default assignments.
    pub requirement: u32,
    /// Research project that must be completed before the activity unlocks.
    pub required_research: Option<ResearchId>,
}

/// An item template. Stockpile stacks are created from these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Catalog key.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Broad category.
    pub category: ItemCategory,
    /// Technology tier.
    pub tier: u32,
    /// Hunger removed per unit is `nutrition * 4`. Zero for inedible items.
    pub nutrition: u32,
    /// Slot the item occupies when equipped.
    pub slot: Option<EquipmentSlot>,
    /// Tool quality; each tier adds 0.1 to the item's work factor.
    pub tool_tier: u32,
    /// Activities the item helps with when equipped.
    pub compatible_activities: BTreeSet<ActivityId>,
    /// Activities that yield this item from resource nodes.
    pub harvest_activities: BTreeSet<ActivityId>,
    /// Named effects applied through keyword discovery.
    pub effects: Vec<Effect>,
}

impl ItemDef {
    /// Whether eating the item reduces hunger.
    pub const fn is_food(&self) -> bool {
        self.nutrition > 0
    }
}

/// A building type. Copies of the same building stack linearly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingDef {
    /// Catalog key.
    pub id: BuildingId,
    /// Display name.
    pub name: String,
    /// Technology tier.
    pub tier: u32,
    /// Turns of construction before the building counts.
    pub build_turns: u32,
    /// Named effects applied through keyword discovery.
    pub effects: Vec<Effect>,
}

/// One effect of an innate trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraitEffect {
    /// Scales efficiency at one activity.
    ActivityMultiplier {
        /// The affected activity.
        activity: ActivityId,
        /// Multiplier.
        multiplier: Decimal,
    },
    /// Scales efficiency at every activity the trait has no specific
    /// multiplier for.
    AllActivities {
        /// Multiplier.
        multiplier: Decimal,
    },
    /// Scales hunger accumulation.
    HungerRate {
        /// Multiplier.
        multiplier: Decimal,
    },
    /// Scales fatigue accumulation.
    FatigueRate {
        /// Multiplier.
        multiplier: Decimal,
    },
}

/// A shared trait definition referenced by pawns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDef {
    /// Catalog key.
    pub id: TraitId,
    /// Display name.
    pub name: String,
    /// Effects of the trait.
    pub effects: Vec<TraitEffect>,
}

impl TraitDef {
    /// The efficiency multiplier this trait applies to `activity`.
    ///
    /// An activity-specific multiplier wins over an all-activities one, so
    /// each trait contributes at most once.
    pub fn activity_multiplier(&self, activity: &ActivityId) -> Option<Decimal> {
        let specific = self.effects.iter().find_map(|e| match e {
            TraitEffect::ActivityMultiplier {
                activity: a,
                multiplier,
            } if a == activity => Some(*multiplier),
            _ => None,
        });
        specific.or_else(|| {
            self.effects.iter().find_map(|e| match e {
                TraitEffect::AllActivities { multiplier } => Some(*multiplier),
                _ => None,
            })
        })
    }

    /// Product of every hunger-rate effect (1.0 if none).
    pub fn hunger_rate(&self) -> Decimal {
        self.effects
            .iter()
            .filter_map(|e| match e {
                TraitEffect::HungerRate { multiplier } => Some(*multiplier),
                _ => None,
            })
            .fold(Decimal::ONE, |acc, m| acc.saturating_mul(m))
    }

    /// Product of every fatigue-rate effect (1.0 if none).
    pub fn fatigue_rate(&self) -> Decimal {
        self.effects
            .iter()
            .filter_map(|e| match e {
                TraitEffect::FatigueRate { multiplier } => Some(*multiplier),
                _ => None,
            })
            .fold(Decimal::ONE, |acc, m| acc.saturating_mul(m))
    }
}

/// A place pawns can work at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDef {
    /// Catalog key.
    pub id: LocationId,
    /// Display name.
    pub name: String,
    /// Whether the colony knows about the location from turn zero.
    pub discovered: bool,
    /// Per-activity efficiency multipliers. Missing entries are 1.0.
    pub activity_modifiers: BTreeMap<ActivityId, Decimal>,
    /// Initial resource nodes.
    pub resources: Vec<ResourceNode>,
}

impl LocationDef {
    /// Multiplier for `activity` at this location, 1.0 if not listed.
    pub fn modifier_for(&self, activity: &ActivityId) -> Decimal {
        self.activity_modifiers
            .get(activity)
            .copied()
            .unwrap_or(Decimal::ONE)
    }
}

/// A research project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchDef {
    /// Catalog key.
    pub id: ResearchId,
    /// Display name.
    pub name: String,
    /// Technology tier.
    pub tier: u32,
    /// Turns of study before completion.
    pub turns: u32,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The read-only content registry.
///
/// Locations keep their insertion order because default work assignments
/// pick the first discovered location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    activities: BTreeMap<ActivityId, ActivityDef>,
    items: BTreeMap<ItemId, ItemDef>,
    buildings: BTreeMap<BuildingId, BuildingDef>,
    traits: BTreeMap<TraitId, TraitDef>,
    locations: Vec<LocationDef>,
    research: BTreeMap<ResearchId, ResearchDef>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an activity.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateActivity`] if the id is taken.
    pub fn add_activity(&mut self, def: ActivityDef) -> Result<(), WorldError> {
        if self.activities.contains_key(&def.id) {
            return Err(WorldError::DuplicateActivity(def.id));
        }
        self.activities.insert(def.id.clone(), def);
        Ok(())
    }

    /// Register an item.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateItem`] if the id is taken.
    pub fn add_item(&mut self, def: ItemDef) -> Result<(), WorldError> {
        if self.items.contains_key(&def.id) {
            return Err(WorldError::DuplicateItem(def.id));
        }
        self.items.insert(def.id.clone(), def);
        Ok(())
    }

    /// Register a building.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateBuilding`] if the id is taken.
    pub fn add_building(&mut self, def: BuildingDef) -> Result<(), WorldError> {
        if self.buildings.contains_key(&def.id) {
            return Err(WorldError::DuplicateBuilding(def.id));
        }
        self.buildings.insert(def.id.clone(), def);
        Ok(())
    }

    /// Register a trait.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateTrait`] if the id is taken.
    pub fn add_trait(&mut self, def: TraitDef) -> Result<(), WorldError> {
        if self.traits.contains_key(&def.id) {
            return Err(WorldError::DuplicateTrait(def.id));
        }
        self.traits.insert(def.id.clone(), def);
        Ok(())
    }

    /// Register a location. Registration order is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateLocation`] if the id is taken.
    pub fn add_location(&mut self, def: LocationDef) -> Result<(), WorldError> {
        if self.location(&def.id).is_some() {
            return Err(WorldError::DuplicateLocation(def.id));
        }
        self.locations.push(def);
        Ok(())
    }

    /// Register a research project.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateResearch`] if the id is taken.
    pub fn add_research(&mut self, def: ResearchDef) -> Result<(), WorldError> {
        if self.research.contains_key(&def.id) {
            return Err(WorldError::DuplicateResearch(def.id));
        }
        self.research.insert(def.id.clone(), def);
        Ok(())
    }

    /// Look up an activity.
    pub fn activity(&self, id: &ActivityId) -> Option<&ActivityDef> {
        self.activities.get(id)
    }

    /// Look up an item.
    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    /// Look up a building.
    pub fn building(&self, id: &BuildingId) -> Option<&BuildingDef> {
        self.buildings.get(id)
    }

    /// Look up a trait.
    pub fn trait_def(&self, id: &TraitId) -> Option<&TraitDef> {
        self.traits.get(id)
    }

    /// Look up a location.
    pub fn location(&self, id: &LocationId) -> Option<&LocationDef> {
        self.locations.iter().find(|l| &l.id == id)
    }

    /// Look up a research project.
    pub fn research(&self, id: &ResearchId) -> Option<&ResearchDef> {
        self.research.get(id)
    }

    /// All activities, ordered by id.
    pub fn activities(&self) -> impl Iterator<Item = &ActivityDef> {
        self.activities.values()
    }

    /// All items, ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    /// All buildings, ordered by id.
    pub fn buildings(&self) -> impl Iterator<Item = &BuildingDef> {
        self.buildings.values()
    }

    /// All traits, ordered by id.
    pub fn traits(&self) -> impl Iterator<Item = &TraitDef> {
        self.traits.values()
    }

    /// All locations, in registration order.
    pub fn locations(&self) -> &[LocationDef] {
        &self.locations
    }

    /// All research projects, ordered by id.
    pub fn research_projects(&self) -> impl Iterator<Item = &ResearchDef> {
        self.research.values()
    }

    /// Items of one category.
    pub fn items_in_category(&self, category: ItemCategory) -> Vec<&ItemDef> {
        self.items
            .values()
            .filter(|i| i.category == category)
            .collect()
    }

    /// Items at or below a technology tier.
    pub fn items_up_to_tier(&self, tier: u32) -> Vec<&ItemDef> {
        self.items.values().filter(|i| i.tier <= tier).collect()
    }

    /// Buildings at or below a technology tier.
    pub fn buildings_up_to_tier(&self, tier: u32) -> Vec<&BuildingDef> {
        self.buildings.values().filter(|b| b.tier <= tier).collect()
    }

    /// Activities of one category.
    pub fn activities_in_category(&self, category: ActivityCategory) -> Vec<&ActivityDef> {
        self.activities
            .values()
            .filter(|a| a.category == category)
            .collect()
    }

    /// Whether an activity exists and its research gate (if any) is met.
    pub fn is_unlocked(&self, id: &ActivityId, completed: &BTreeSet<ResearchId>) -> bool {
        self.activity(id).is_some_and(|a| {
            a.required_research
                .as_ref()
                .is_none_or(|r| completed.contains(r))
        })
    }

    /// Unlocked activities ordered by requirement, then id.
    pub fn unlocked_by_requirement(&self, completed: &BTreeSet<ResearchId>) -> Vec<&ActivityDef> {
        let mut list: Vec<&ActivityDef> = self
            .activities
            .values()
            .filter(|a| {
                a.required_research
                    .as_ref()
                    .is_none_or(|r| completed.contains(r))
            })
            .collect();
        list.sort_by(|a, b| a.requirement.cmp(&b.requirement).then_with(|| a.id.cmp(&b.id)));
        list
    }
}
