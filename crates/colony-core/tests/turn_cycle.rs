//! Integration tests for the full turn cycle.
//!
//! These run the orchestrator over many turns with the starting catalog and
//! check the invariants that must hold after every committed turn: activity
//! flags are exclusive, needs and resource nodes stay in bounds, the
//! rotation is fair, failed turns leave no trace, and snapshots survive a
//! JSON round trip.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use colony_agents::work;
use colony_core::{
    ColonyConfig, Consequence, EventError, EventSource, GameEvent, GameState, IssueKind,
    NoEvents, ScriptedEvents, TurnOrchestrator,
};
use colony_types::{ActivityId, EquipmentSlot, ItemId, LocationId, Pawn, PawnId, Stats, TraitId};
use colony_world::create_starting_catalog;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn colony(events: Box<dyn EventSource>) -> (TurnOrchestrator, Vec<PawnId>) {
    let catalog = create_starting_catalog().unwrap();
    let mut orch = TurnOrchestrator::new(catalog, ColonyConfig::default(), events).unwrap();

    let mut strong = Pawn::new("Bram", Stats::uniform(10));
    strong.stats.strength = 16;
    strong.traits = vec![TraitId::from("strong_back"), TraitId::from("glutton")];
    strong
        .equipment
        .insert(EquipmentSlot::MainHand, ItemId::from("stone_axe"));

    let mut sharp = Pawn::new("Ilse", Stats::uniform(12));
    sharp.traits = vec![TraitId::from("tireless")];

    let mut lazy = Pawn::new("Otto", Stats::uniform(8));
    lazy.traits = vec![TraitId::from("lazy"), TraitId::from("no_such_trait")];

    let plain = Pawn::new("Wren", Stats::default());

    let mut ids = Vec::new();
    let state = orch.state_mut();
    for pawn in [strong, sharp, lazy, plain] {
        ids.push(state.add_pawn(pawn));
    }
    let catalog = create_starting_catalog().unwrap();
    state.stock(&catalog, &ItemId::from("bread"), 10).unwrap();
    (orch, ids)
}

fn assert_in_unit(value: Decimal, what: &str) {
    assert!(
        (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&value),
        "{what} out of bounds: {value}"
    );
}

fn assert_invariants(state: &GameState) {
    for pawn in state.pawns.values() {
        assert!(pawn.state.active_flag_count() <= 1, "{} has conflicting flags", pawn.name);
        assert_in_unit(pawn.needs.hunger, "hunger");
        assert_in_unit(pawn.needs.fatigue, "fatigue");
        assert_in_unit(pawn.needs.sleep_debt, "sleep debt");
        assert_in_unit(pawn.state.mood, "mood");
        assert_in_unit(pawn.state.health, "health");
    }
    for location in state.locations.values() {
        for node in location.resources.values() {
            assert!(
                node.current_amount <= node.max_amount,
                "{} at {} exceeds max",
                node.resource,
                location.id
            );
        }
    }
}

#[test]
fn invariants_hold_every_turn() {
    let (mut orch, _) = colony(Box::new(NoEvents::new()));
    for _ in 0..150 {
        let result = orch.process_turn();
        assert!(result.success, "turn {} failed: {:?}", result.turn, result.errors);
        assert_invariants(orch.state());
    }
    assert_eq!(orch.state().turn(), 150);
}

#[test]
fn extreme_events_are_clamped() {
    let (orch, ids) = colony(Box::new(NoEvents::new()));
    let target = *ids.first().unwrap();
    let events = ScriptedEvents::new()
        .at(
            2,
            GameEvent {
                name: String::from("Plague"),
                consequences: vec![
                    Consequence::PawnHealth {
                        pawn: target,
                        delta: dec!(-500),
                    },
                    Consequence::ColonyMood { delta: dec!(-500) },
                ],
            },
        )
        .at(
            4,
            GameEvent {
                name: String::from("Harvest festival"),
                consequences: vec![Consequence::ColonyMood { delta: dec!(900) }],
            },
        );
    let state = orch.state().clone();
    let catalog = orch.catalog().clone();
    let mut orch =
        TurnOrchestrator::with_state(catalog, ColonyConfig::default(), state, Box::new(events));

    let mut corrected = 0_usize;
    for _ in 0..6 {
        let result = orch.process_turn();
        assert!(result.success);
        corrected = corrected.saturating_add(
            result
                .errors
                .iter()
                .filter(|i| i.kind == IssueKind::InvariantCorrected)
                .count(),
        );
        assert_invariants(orch.state());
    }
    // plague: one health and four mood corrections; festival: four more
    assert!(corrected >= 9);
    assert!(orch.state().pawn(&target).unwrap().state.health < dec!(5));
}

#[test]
fn missing_trait_is_recorded_not_fatal() {
    let (mut orch, _) = colony(Box::new(NoEvents::new()));
    let result = orch.process_turn();
    assert!(result.success);
    assert!(result
        .errors
        .iter()
        .any(|i| i.kind == IssueKind::MissingReference && i.message.contains("no_such_trait")));
}

#[test]
fn rotation_is_fair_over_many_turns() {
    let (mut orch, ids) = colony(Box::new(NoEvents::new()));
    let worker = *ids.get(1).unwrap();

    let mut assignment = colony_types::WorkAssignment::default();
    for (activity, priority) in [("hunting", 9), ("woodcutting", 5), ("foraging", 1)] {
        work::set_priority(&mut assignment, &ActivityId::from(activity), priority);
    }
    let forest = LocationId::from("forest");
    work::authorize_location(&mut assignment, &forest);
    work::set_active_location(&mut assignment, &forest).unwrap();
    orch.state_mut().set_assignment(worker, assignment).unwrap();

    for _ in 0..90 {
        assert!(orch.process_turn().success);
    }

    let pawn = orch.state().pawn(&worker).unwrap();
    let counts: Vec<u32> = ["hunting", "woodcutting", "foraging"]
        .iter()
        .map(|a| pawn.skills.get(*a).copied().unwrap_or(0))
        .collect();
    let max = counts.iter().copied().max().unwrap();
    let min = counts.iter().copied().min().unwrap();
    assert!(min > 0);
    assert!(max.saturating_sub(min) <= 1, "unfair rotation: {counts:?}");

    let worked: u32 = counts.iter().sum();
    assert_eq!(orch.state().assignments.get(&worker).unwrap().job_index, worked);
}

struct FailOnce {
    turn: u64,
    fired: bool,
}

impl EventSource for FailOnce {
    fn next_event(&mut self, state: &GameState) -> Result<Option<GameEvent>, EventError> {
        if state.turn() == self.turn && !self.fired {
            self.fired = true;
            return Err(EventError::Internal {
                message: String::from("event table corrupted"),
            });
        }
        Ok(None)
    }
}

#[test]
fn failed_turn_rolls_back_snapshot() {
    let (orch, _) = colony(Box::new(NoEvents::new()));
    let catalog = orch.catalog().clone();
    let mut orch = TurnOrchestrator::with_state(
        catalog,
        ColonyConfig::default(),
        orch.state().clone(),
        Box::new(FailOnce {
            turn: 2,
            fired: false,
        }),
    );

    assert!(orch.process_turn().success);
    let committed = orch.state().clone();
    let generation = orch.engine().generation();

    let failed = orch.process_turn();
    assert!(!failed.success);
    assert_eq!(failed.turn, 2);
    assert!(failed.summary.is_none());
    assert_eq!(failed.errors.last().map(|i| i.kind), Some(IssueKind::Subsystem));
    assert_eq!(orch.state(), &committed);
    assert_eq!(orch.engine().generation(), generation.saturating_add(1));

    let retried = orch.process_turn();
    assert!(retried.success);
    assert_eq!(retried.turn, 2);
}

#[test]
fn identical_snapshots_evolve_identically() {
    let (orch, _) = colony(Box::new(NoEvents::new()));
    let start = orch.state().clone();
    let catalog = orch.catalog().clone();

    let mut a = TurnOrchestrator::with_state(
        catalog.clone(),
        ColonyConfig::default(),
        start.clone(),
        Box::new(NoEvents::new()),
    );
    let mut b =
        TurnOrchestrator::with_state(catalog, ColonyConfig::default(), start, Box::new(NoEvents::new()));
    for _ in 0..40 {
        let ra = a.process_turn();
        let rb = b.process_turn();
        assert_eq!(ra.summary, rb.summary);
    }
    assert_eq!(a.state(), b.state());
}

#[test]
fn snapshot_survives_json_round_trip() {
    let (mut orch, _) = colony(Box::new(NoEvents::new()));
    let catalog = orch.catalog().clone();
    orch.state_mut()
        .enqueue_building(&catalog, &colony_types::BuildingId::from("workshop"))
        .unwrap();
    for _ in 0..12 {
        orch.process_turn();
    }
    let json = serde_json::to_string(orch.state()).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, orch.state());
    assert_eq!(restored.clock.season().unwrap(), orch.state().clock.season().unwrap());
}

#[test]
fn stockpile_grows_from_work() {
    let (mut orch, _) = colony(Box::new(NoEvents::new()));
    let mut harvested: BTreeMap<ItemId, u32> = BTreeMap::new();
    for _ in 0..5 {
        let summary = orch.process_turn().summary.unwrap();
        for (item, amount) in summary.harvested {
            let total = harvested.entry(item).or_insert(0);
            *total = total.saturating_add(amount);
        }
    }
    assert!(harvested.get("berries").copied().unwrap_or(0) > 0);
    assert!(orch.state().stockpile.contains_key("berries"));
}

fn lone_miner(hunger: Decimal) -> (TurnOrchestrator, PawnId) {
    let catalog = create_starting_catalog().unwrap();
    let mut orch =
        TurnOrchestrator::new(catalog, ColonyConfig::default(), Box::new(NoEvents::new())).unwrap();
    let mut pawn = Pawn::new("Tamsin", Stats::default());
    pawn.needs.hunger = hunger;
    let id = orch.state_mut().add_pawn(pawn);

    // mining needs masonry, which the colony has not researched
    let mut assignment = colony_types::WorkAssignment::default();
    work::set_priority(&mut assignment, &ActivityId::from("mining"), 5);
    let forest = LocationId::from("forest");
    work::authorize_location(&mut assignment, &forest);
    work::set_active_location(&mut assignment, &forest).unwrap();
    orch.state_mut().set_assignment(id, assignment).unwrap();
    (orch, id)
}

#[test]
fn blocked_assignment_leaves_pawn_idle() {
    let (mut orch, id) = lone_miner(dec!(35));
    let result = orch.process_turn();
    assert!(result.success);
    assert!(result.errors.iter().any(|i| i.kind == IssueKind::Blocked));
    let summary = result.summary.unwrap();
    assert_eq!(summary.working, 0);
    assert_eq!(summary.idle, 1);

    let pawn = orch.state().pawn(&id).unwrap();
    assert!(!pawn.state.is_working());
    // idle fatigue rate, not the working multiplier
    assert_eq!(pawn.needs.fatigue, dec!(2));
    assert_eq!(pawn.needs.hunger, dec!(37));
    assert!(pawn.skills.is_empty());
    assert_eq!(orch.state().assignments.get(&id).unwrap().job_index, 1);
}

#[test]
fn blocked_pawn_eats_at_idle_threshold() {
    let (mut orch, id) = lone_miner(dec!(35));
    let catalog = orch.catalog().clone();
    orch.state_mut()
        .stock(&catalog, &ItemId::from("bread"), 5)
        .unwrap();

    let result = orch.process_turn();
    assert!(result.success);
    assert_eq!(result.summary.unwrap().meals, 1);
    assert!(orch.state().pawn(&id).unwrap().state.is_eating());
}

#[test]
fn unlocking_research_puts_blocked_pawn_to_work() {
    let (mut orch, id) = lone_miner(dec!(0));
    assert!(orch.process_turn().success);
    assert!(!orch.state().pawn(&id).unwrap().state.is_working());

    orch.state_mut()
        .completed_research
        .insert(colony_types::ResearchId::from("masonry"));
    let result = orch.process_turn();
    assert!(result.success);
    assert!(result.errors.iter().all(|i| i.kind != IssueKind::Blocked));
    let pawn = orch.state().pawn(&id).unwrap();
    assert!(pawn.state.is_working());
    assert_eq!(pawn.skills.get("mining").copied(), Some(1));
}

struct FailAfterDraw {
    inner: ScriptedEvents,
    fail_turn: u64,
    failed: bool,
}

impl EventSource for FailAfterDraw {
    fn next_event(&mut self, state: &GameState) -> Result<Option<GameEvent>, EventError> {
        let event = self.inner.next_event(state)?;
        if state.turn() == self.fail_turn && !self.failed {
            self.failed = true;
            return Err(EventError::Internal {
                message: String::from("connection lost after draw"),
            });
        }
        Ok(event)
    }

    fn turn_committed(&mut self, turn: u64) {
        self.inner.turn_committed(turn);
    }
}

#[test]
fn scheduled_event_survives_rolled_back_turn() {
    let (orch, _) = colony(Box::new(NoEvents::new()));
    let catalog = orch.catalog().clone();
    let script = ScriptedEvents::new().at(
        1,
        GameEvent {
            name: String::from("Windfall"),
            consequences: vec![Consequence::ColonyMood { delta: dec!(1) }],
        },
    );
    let mut orch = TurnOrchestrator::with_state(
        catalog,
        ColonyConfig::default(),
        orch.state().clone(),
        Box::new(FailAfterDraw {
            inner: script,
            fail_turn: 1,
            failed: false,
        }),
    );

    assert!(!orch.process_turn().success);
    assert_eq!(orch.state().turn(), 0);

    let retried = orch.process_turn();
    assert!(retried.success);
    assert_eq!(retried.summary.unwrap().event.as_deref(), Some("Windfall"));
    assert_eq!(orch.process_turn().summary.unwrap().event, None);
}
