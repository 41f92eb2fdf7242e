//! Default content for a new colony.
//!
//! Seven activities, a handful of foods, materials, and tools, five
//! buildings, six traits, four locations (one undiscovered), and three
//! research projects.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{
    ActivityCategory, ActivityId, Attribute, BuildingId, EquipmentSlot, ItemCategory, ItemId,
    LocationId, RenewalType, ResearchId, ResourceNode, TraitId,
};
use rust_decimal::Decimal;

use crate::catalog::{
    ActivityDef, BuildingDef, Catalog, Effect, ItemDef, LocationDef, ResearchDef, TraitDef,
    TraitEffect,
};
use crate::error::WorldError;

/// Helper to build an [`ActivityDef`].
fn activity(
    id: &str,
    name: &str,
    category: ActivityCategory,
    primary: Attribute,
    secondary: Option<Attribute>,
    requirement: u32,
    research: Option<&str>,
) -> ActivityDef {
    ActivityDef {
        id: ActivityId::from(id),
        name: name.to_owned(),
        category,
        base_efficiency: Decimal::ONE,
        primary_attribute: primary,
        secondary_attribute: secondary,
        requirement,
        required_research: research.map(ResearchId::from),
    }
}

/// Helper to build a food or raw material harvested by the given activities.
fn raw(id: &str, name: &str, category: ItemCategory, nutrition: u32, harvest: &[&str]) -> ItemDef {
    ItemDef {
        id: ItemId::from(id),
        name: name.to_owned(),
        category,
        tier: 0,
        nutrition,
        slot: None,
        tool_tier: 0,
        compatible_activities: BTreeSet::new(),
        harvest_activities: harvest.iter().map(|a| ActivityId::from(*a)).collect(),
        effects: Vec::new(),
    }
}

/// Helper to build an equippable item.
fn gear(
    id: &str,
    name: &str,
    category: ItemCategory,
    slot: EquipmentSlot,
    tool_tier: u32,
    compatible: &[&str],
    effects: Vec<Effect>,
) -> ItemDef {
    ItemDef {
        id: ItemId::from(id),
        name: name.to_owned(),
        category,
        tier: 1,
        nutrition: 0,
        slot: Some(slot),
        tool_tier,
        compatible_activities: compatible.iter().map(|a| ActivityId::from(*a)).collect(),
        harvest_activities: BTreeSet::new(),
        effects,
    }
}

/// Helper to build a [`ResourceNode`].
fn node(
    resource: &str,
    current: u32,
    max: u32,
    rate: u32,
    renewal_type: RenewalType,
) -> ResourceNode {
    ResourceNode {
        resource: ItemId::from(resource),
        current_amount: current,
        max_amount: max,
        renewal_rate: rate,
        renewal_type,
        depletion: Decimal::ONE,
    }
}

/// Helper to build a [`LocationDef`].
fn loc(
    id: &str,
    name: &str,
    discovered: bool,
    modifiers: &[(&str, Decimal)],
    resources: Vec<ResourceNode>,
) -> LocationDef {
    LocationDef {
        id: LocationId::from(id),
        name: name.to_owned(),
        discovered,
        activity_modifiers: modifiers
            .iter()
            .map(|(a, m)| (ActivityId::from(*a), *m))
            .collect::<BTreeMap<_, _>>(),
        resources,
    }
}

/// Create the default catalog.
///
/// # Errors
///
/// Returns [`WorldError`] if a duplicate id is registered (should not happen
/// with valid hard-coded data).
#[allow(clippy::too_many_lines)]
pub fn create_starting_catalog() -> Result<Catalog, WorldError> {
    use ActivityCategory::{Crafting, Gathering, Research};
    use Attribute::{Dexterity, Endurance, Intelligence, Perception, Strength};

    let mut catalog = Catalog::new();

    // ---------------------------------------------------------------
    // Activities
    // ---------------------------------------------------------------

    for def in [
        activity("foraging", "Foraging", Gathering, Perception, Some(Dexterity), 0, None),
        activity("fishing", "Fishing", Gathering, Dexterity, Some(Perception), 1, None),
        activity("woodcutting", "Woodcutting", Gathering, Strength, Some(Endurance), 1, None),
        activity("hunting", "Hunting", Gathering, Perception, Some(Dexterity), 2, None),
        activity("mining", "Mining", Gathering, Strength, Some(Endurance), 2, Some("masonry")),
        activity("crafting", "Crafting", Crafting, Dexterity, Some(Intelligence), 2, None),
        activity("research", "Research", Research, Intelligence, None, 3, None),
    ] {
        catalog.add_activity(def)?;
    }

    // ---------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------

    for def in [
        raw("berries", "Berries", ItemCategory::Food, 2, &["foraging"]),
        raw("roots", "Roots", ItemCategory::Food, 3, &["foraging"]),
        raw("fish", "Fish", ItemCategory::Food, 4, &["fishing"]),
        raw("meat", "Meat", ItemCategory::Food, 5, &["hunting"]),
        raw("bread", "Bread", ItemCategory::Food, 6, &[]),
        raw("wood", "Wood", ItemCategory::Material, 0, &["woodcutting"]),
        raw("stone", "Stone", ItemCategory::Material, 0, &["mining"]),
        raw("iron_ore", "Iron Ore", ItemCategory::Material, 0, &["mining"]),
        raw("herbs", "Herbs", ItemCategory::Medicine, 0, &["foraging"]),
    ] {
        catalog.add_item(def)?;
    }

    for def in [
        gear(
            "stone_axe",
            "Stone Axe",
            ItemCategory::Tool,
            EquipmentSlot::MainHand,
            1,
            &["woodcutting"],
            vec![Effect::new("woodcutting_speed", Decimal::new(12, 1))],
        ),
        gear(
            "pickaxe",
            "Pickaxe",
            ItemCategory::Tool,
            EquipmentSlot::MainHand,
            2,
            &["mining"],
            vec![Effect::new("mining_speed", Decimal::new(125, 2))],
        ),
        gear(
            "fishing_rod",
            "Fishing Rod",
            ItemCategory::Tool,
            EquipmentSlot::MainHand,
            1,
            &["fishing"],
            vec![Effect::new("fishing_yield", Decimal::new(115, 2))],
        ),
        gear(
            "work_gloves",
            "Work Gloves",
            ItemCategory::Apparel,
            EquipmentSlot::OffHand,
            0,
            &["crafting", "woodcutting", "mining"],
            vec![Effect::new("grip_efficiency", Decimal::new(11, 1))],
        ),
        gear(
            "foragers_basket",
            "Forager's Basket",
            ItemCategory::Tool,
            EquipmentSlot::OffHand,
            0,
            &["foraging"],
            vec![Effect::new("foraging_capacity", Decimal::new(13, 1))],
        ),
    ] {
        catalog.add_item(def)?;
    }

    // ---------------------------------------------------------------
    // Buildings
    // ---------------------------------------------------------------

    for (id, name, tier, turns, effects) in [
        (
            "workshop",
            "Workshop",
            1,
            4,
            vec![Effect::new("crafting_speed", Decimal::new(12, 1))],
        ),
        (
            "sawmill",
            "Sawmill",
            2,
            6,
            vec![Effect::new("woodcutting_yield", Decimal::new(115, 2))],
        ),
        (
            "smokehouse",
            "Smokehouse",
            1,
            3,
            vec![
                Effect::new("hunting_yield", Decimal::new(11, 1)),
                Effect::new("fishing_yield", Decimal::new(11, 1)),
            ],
        ),
        ("granary", "Granary", 0, 2, vec![Effect::new("storage", Decimal::ONE)]),
        (
            "town_hall",
            "Town Hall",
            2,
            8,
            vec![Effect::new("productivity", Decimal::new(105, 2))],
        ),
    ] {
        catalog.add_building(BuildingDef {
            id: BuildingId::from(id),
            name: name.to_owned(),
            tier,
            build_turns: turns,
            effects,
        })?;
    }

    // ---------------------------------------------------------------
    // Traits
    // ---------------------------------------------------------------

    for (id, name, effects) in [
        (
            "industrious",
            "Industrious",
            vec![TraitEffect::AllActivities {
                multiplier: Decimal::new(11, 1),
            }],
        ),
        (
            "lazy",
            "Lazy",
            vec![TraitEffect::AllActivities {
                multiplier: Decimal::new(85, 2),
            }],
        ),
        (
            "green_thumb",
            "Green Thumb",
            vec![TraitEffect::ActivityMultiplier {
                activity: ActivityId::from("foraging"),
                multiplier: Decimal::new(125, 2),
            }],
        ),
        (
            "strong_back",
            "Strong Back",
            vec![
                TraitEffect::ActivityMultiplier {
                    activity: ActivityId::from("woodcutting"),
                    multiplier: Decimal::new(12, 1),
                },
                TraitEffect::ActivityMultiplier {
                    activity: ActivityId::from("mining"),
                    multiplier: Decimal::new(12, 1),
                },
            ],
        ),
        (
            "glutton",
            "Glutton",
            vec![TraitEffect::HungerRate {
                multiplier: Decimal::new(15, 1),
            }],
        ),
        (
            "tireless",
            "Tireless",
            vec![TraitEffect::FatigueRate {
                multiplier: Decimal::new(75, 2),
            }],
        ),
    ] {
        catalog.add_trait(TraitDef {
            id: TraitId::from(id),
            name: name.to_owned(),
            effects,
        })?;
    }

    // ---------------------------------------------------------------
    // Locations
    // ---------------------------------------------------------------

    catalog.add_location(loc(
        "meadow",
        "Meadow",
        true,
        &[("foraging", Decimal::new(11, 1))],
        vec![
            node("berries", 30, 60, 4, RenewalType::Seasonal),
            node("roots", 10, 20, 1, RenewalType::Slow),
            node("herbs", 5, 10, 1, RenewalType::Seasonal),
        ],
    ))?;

    catalog.add_location(loc(
        "forest",
        "Forest",
        true,
        &[
            ("woodcutting", Decimal::new(12, 1)),
            ("hunting", Decimal::new(11, 1)),
        ],
        vec![
            node("wood", 80, 150, 6, RenewalType::Slow),
            node("berries", 10, 30, 2, RenewalType::Seasonal),
            node("meat", 12, 25, 1, RenewalType::Slow),
        ],
    ))?;

    catalog.add_location(loc(
        "river",
        "River",
        true,
        &[("fishing", Decimal::new(125, 2))],
        vec![node("fish", 25, 40, 5, RenewalType::Fast)],
    ))?;

    catalog.add_location(loc(
        "quarry",
        "Quarry",
        false,
        &[("mining", Decimal::new(11, 1))],
        vec![
            node("stone", 60, 60, 0, RenewalType::None),
            node("iron_ore", 20, 20, 0, RenewalType::None),
        ],
    ))?;

    // ---------------------------------------------------------------
    // Research
    // ---------------------------------------------------------------

    for (id, name, tier, turns) in [
        ("masonry", "Masonry", 1, 5),
        ("agriculture", "Agriculture", 1, 8),
        ("metallurgy", "Metallurgy", 2, 12),
    ] {
        catalog.add_research(ResearchDef {
            id: ResearchId::from(id),
            name: name.to_owned(),
            tier,
            turns,
        })?;
    }

    Ok(catalog)
}
