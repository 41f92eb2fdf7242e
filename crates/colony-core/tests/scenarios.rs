//! Scenario tests pinning exact numbers through the orchestrator.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};

use colony_agents::{inventory, work};
use colony_core::{ColonyConfig, NoEvents, TurnOrchestrator};
use colony_types::{
    ActivityCategory, ActivityId, ActivityState, Attribute, BuildingId, ItemCategory, ItemId,
    LocationId, ModifierOrigin, Pawn, PawnId, RenewalType, ResourceNode, Stats, WorkAssignment,
};
use colony_world::{
    create_starting_catalog, ActivityDef, Catalog, ItemDef, LocationDef, LocationState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn starting_colony(config: ColonyConfig) -> (TurnOrchestrator, PawnId) {
    let catalog = create_starting_catalog().unwrap();
    let mut orch = TurnOrchestrator::new(catalog, config, Box::new(NoEvents::new())).unwrap();
    let id = orch.state_mut().add_pawn(Pawn::new("Subject", Stats::default()));
    (orch, id)
}

#[test]
fn hungry_pawn_eats_best_food_within_a_turn() {
    let (mut orch, id) = starting_colony(ColonyConfig::default());
    let catalog = orch.catalog().clone();
    let state = orch.state_mut();
    state.stock(&catalog, &ItemId::from("meat"), 10).unwrap();
    state.stock(&catalog, &ItemId::from("berries"), 10).unwrap();
    state.pawns.get_mut(&id).unwrap().needs.hunger = dec!(85);

    let result = orch.process_turn();
    assert!(result.success);
    assert_eq!(result.summary.unwrap().meals, 1);

    let state = orch.state();
    let pawn = state.pawn(&id).unwrap();
    // 85 -> 65 -> 45 -> 25, target 25.5; eating suppresses this turn's hunger gain
    assert_eq!(pawn.needs.hunger, dec!(25));
    assert_eq!(pawn.needs.last_meal, 1);
    assert_eq!(pawn.state.activity(), ActivityState::Eating);
    assert_eq!(inventory::quantity_of(&state.stockpile, &ItemId::from("meat")), 7);
    // ten stocked plus five foraged; none eaten
    assert_eq!(inventory::quantity_of(&state.stockpile, &ItemId::from("berries")), 15);
    assert!(pawn.state.mood >= dec!(56));
}

#[test]
fn meal_lasts_one_turn() {
    let (mut orch, id) = starting_colony(ColonyConfig::default());
    let catalog = orch.catalog().clone();
    let state = orch.state_mut();
    state.stock(&catalog, &ItemId::from("fish"), 10).unwrap();
    state.pawns.get_mut(&id).unwrap().needs.hunger = dec!(90);

    orch.process_turn();
    assert!(orch.state().pawn(&id).unwrap().state.is_eating());
    orch.process_turn();
    assert!(orch.state().pawn(&id).unwrap().state.is_working());
}

#[test]
fn two_buildings_stack_linearly() {
    let (mut orch, id) = starting_colony(ColonyConfig::default());
    orch.state_mut()
        .structures
        .insert(BuildingId::from("workshop"), 2);

    let result = orch.efficiency(&id, &ActivityId::from("crafting"), None);
    assert_eq!(result.total_value, dec!(1.4));
    let structure = result
        .sources
        .iter()
        .find(|s| s.origin == ModifierOrigin::Structure)
        .unwrap();
    assert_eq!(structure.value, dec!(1.4));
    assert_ne!(structure.value, dec!(1.44));
}

#[test]
fn completed_construction_feeds_modifiers() {
    let (mut orch, id) = starting_colony(ColonyConfig::default());
    let catalog = orch.catalog().clone();
    let workshop = BuildingId::from("workshop");
    let turns = catalog.building(&workshop).unwrap().build_turns;
    orch.state_mut().enqueue_building(&catalog, &workshop).unwrap();

    let crafting = ActivityId::from("crafting");
    let mut completed_on = None;
    for _ in 0..turns {
        let summary = orch.process_turn().summary.unwrap();
        if summary.completions.buildings.contains(&workshop) {
            completed_on = Some(summary.turn);
        }
    }
    assert_eq!(completed_on, Some(u64::from(turns)));
    let result = orch.efficiency(&id, &crafting, None);
    assert!(result.has_origin(ModifierOrigin::Structure));
}

#[test]
fn efficiency_is_cached_within_a_turn() {
    let (mut orch, id) = starting_colony(ColonyConfig::default());
    orch.process_turn();
    let meadow = LocationId::from("meadow");
    let foraging = ActivityId::from("foraging");
    let first = orch.efficiency(&id, &foraging, Some(&meadow));
    let second = orch.efficiency(&id, &foraging, Some(&meadow));
    assert_eq!(first, second);
    assert_eq!(first.total_value.to_string(), second.total_value.to_string());
    assert_eq!(orch.engine().cached(), 1);
}

fn clearing_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .add_activity(ActivityDef {
            id: ActivityId::from("woodcutting"),
            name: String::from("Woodcutting"),
            category: ActivityCategory::Gathering,
            base_efficiency: Decimal::ONE,
            primary_attribute: Attribute::Strength,
            secondary_attribute: None,
            requirement: 0,
            required_research: None,
        })
        .unwrap();
    catalog
        .add_item(ItemDef {
            id: ItemId::from("wood"),
            name: String::from("Wood"),
            category: ItemCategory::Material,
            tier: 0,
            nutrition: 0,
            slot: None,
            tool_tier: 0,
            compatible_activities: BTreeSet::new(),
            harvest_activities: BTreeSet::from([ActivityId::from("woodcutting")]),
            effects: Vec::new(),
        })
        .unwrap();
    catalog
        .add_location(LocationDef {
            id: LocationId::from("clearing"),
            name: String::from("Clearing"),
            discovered: true,
            activity_modifiers: BTreeMap::new(),
            resources: vec![ResourceNode {
                resource: ItemId::from("wood"),
                current_amount: 50,
                max_amount: 100,
                renewal_rate: 10,
                renewal_type: RenewalType::Slow,
                depletion: Decimal::ONE,
            }],
        })
        .unwrap();
    catalog
}

#[test]
fn node_renews_then_caps_extraction() {
    let catalog = clearing_catalog();

    // renewal alone: 50 -> 60
    let mut standalone = LocationState::from_def(catalog.locations().first().unwrap());
    standalone.renew_all(colony_types::Season::Summer).unwrap();
    let wood = ItemId::from("wood");
    assert_eq!(standalone.get_resource(&wood).unwrap().current_amount, 60);

    // through a turn: renew to 60, then a request of 70 takes all 60
    let mut config = ColonyConfig::default();
    config.work.base_harvest_rate = dec!(7);
    let mut orch = TurnOrchestrator::new(catalog, config, Box::new(NoEvents::new())).unwrap();
    let id = orch.state_mut().add_pawn(Pawn::new("Feller", Stats::default()));

    let mut assignment = WorkAssignment::default();
    work::set_priority(&mut assignment, &ActivityId::from("woodcutting"), 10);
    let clearing = LocationId::from("clearing");
    work::authorize_location(&mut assignment, &clearing);
    work::set_active_location(&mut assignment, &clearing).unwrap();
    orch.state_mut().set_assignment(id, assignment).unwrap();

    let result = orch.process_turn();
    assert!(result.success, "{:?}", result.errors);
    let summary = result.summary.unwrap();
    assert_eq!(summary.renewal.get("clearing").and_then(|r| r.get("wood")).copied(), Some(10));
    assert_eq!(summary.harvested.get("wood").copied(), Some(60));

    let node = orch
        .state()
        .locations
        .get("clearing")
        .unwrap()
        .get_resource(&wood)
        .unwrap()
        .clone();
    assert_eq!(node.current_amount, 0);
    assert_eq!(inventory::quantity_of(&orch.state().stockpile, &wood), 60);
}

#[test]
fn sleeper_at_fatigue_20_hunger_50_keeps_sleeping() {
    let (mut orch, id) = starting_colony(ColonyConfig::default());
    {
        let pawn = orch.state_mut().pawns.get_mut(&id).unwrap();
        pawn.needs.fatigue = dec!(20);
        pawn.needs.hunger = dec!(50);
        pawn.state.set_activity(ActivityState::Sleeping);
    }

    assert!(orch.process_turn().success);
    let pawn = orch.state().pawn(&id).unwrap();
    // 20 > 15 and 50 < 80: continues; recovery 10 * max(0.5, 20/60) = 5
    assert!(pawn.state.is_sleeping());
    assert_eq!(pawn.needs.fatigue, dec!(15));
    assert_eq!(pawn.needs.hunger, dec!(52));

    // fatigue 15 is no longer above 15: wakes and goes to work
    assert!(orch.process_turn().success);
    let pawn = orch.state().pawn(&id).unwrap();
    assert!(!pawn.state.is_sleeping());
    assert!(pawn.state.is_working());
}

#[test]
fn starving_sleeper_wakes_to_eat() {
    let (mut orch, id) = starting_colony(ColonyConfig::default());
    let catalog = orch.catalog().clone();
    orch.state_mut()
        .stock(&catalog, &ItemId::from("roots"), 10)
        .unwrap();
    {
        let pawn = orch.state_mut().pawns.get_mut(&id).unwrap();
        pawn.needs.fatigue = dec!(70);
        pawn.needs.hunger = dec!(82);
        pawn.state.set_activity(ActivityState::Sleeping);
    }

    assert!(orch.process_turn().success);
    let pawn = orch.state().pawn(&id).unwrap();
    assert!(pawn.state.is_eating());
    assert_eq!(pawn.state.active_flag_count(), 1);
}
