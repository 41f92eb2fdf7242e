//! Modifier resolution: the effective efficiency of a pawn at an activity.
//!
//! Factors are applied multiplicatively in a fixed order:
//!
//! 1. primary attribute, `value / 10`
//! 2. secondary attribute (if declared), `1 + (value - 10) / 50`
//! 3. traits, the activity-specific multiplier if declared, otherwise the
//!    all-activities multiplier; each trait at most once
//! 4. equipped items compatible with the activity, the product of their
//!    relevant effects plus `tool_tier * 0.1`
//! 5. structures, `1 + (bonus - 1) * count` per building type
//! 6. location modifier, when a location is supplied
//! 7. conditions: health, mood, and fatigue
//!
//! Every factor is recorded as a [`ModifierSource`] so callers can explain
//! the final number. Results are memoized per `(pawn, activity, location,
//! turn)` until [`ModifierEngine::invalidate`] is called.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{
    ActivityId, Attribute, LocationId, ModifierOrigin, ModifierResult, ModifierSource, Pawn,
    PawnId,
};
use colony_world::{discovery, structure_factors, ActivityDef, Catalog};
use rust_decimal::Decimal;
use tracing::debug;

use crate::state::GameState;

type CacheKey = (PawnId, ActivityId, Option<LocationId>, u64);

/// Fatigue above which efficiency starts to drop.
const FATIGUE_PENALTY_START: i64 = 50;

/// Memoizing resolver for pawn efficiency.
#[derive(Debug, Default)]
pub struct ModifierEngine {
    cache: BTreeMap<CacheKey, ModifierResult>,
    generation: u64,
}

impl ModifierEngine {
    /// An engine with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a pawn's efficiency at an activity, optionally at a location.
    ///
    /// Unknown pawns or activities resolve to [`ModifierResult::neutral`],
    /// which is not cached.
    pub fn resolve(
        &mut self,
        pawn_id: &PawnId,
        activity_id: &ActivityId,
        state: &GameState,
        catalog: &Catalog,
        location: Option<&LocationId>,
    ) -> ModifierResult {
        let (Some(pawn), Some(activity)) = (state.pawn(pawn_id), catalog.activity(activity_id))
        else {
            return ModifierResult::neutral();
        };

        let key: CacheKey = (
            *pawn_id,
            activity_id.clone(),
            location.cloned(),
            state.turn(),
        );
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let result = compute(pawn, activity, state, catalog, location);
        self.cache.insert(key, result.clone());
        result
    }

    /// Drop every cached result and start a new generation.
    pub fn invalidate(&mut self) {
        let dropped = self.cache.len();
        self.cache.clear();
        self.generation = self.generation.saturating_add(1);
        debug!(generation = self.generation, dropped, "modifier cache invalidated");
    }

    /// Number of invalidations so far.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of cached results.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Accumulates factors in application order.
struct Composition {
    multiplier: Decimal,
    sources: Vec<ModifierSource>,
}

impl Composition {
    fn apply(&mut self, id: String, origin: ModifierOrigin, value: Decimal, rationale: String) {
        self.multiplier = self.multiplier.saturating_mul(value);
        self.sources.push(ModifierSource {
            id,
            origin,
            value,
            rationale,
        });
    }
}

fn compute(
    pawn: &Pawn,
    activity: &ActivityDef,
    state: &GameState,
    catalog: &Catalog,
    location: Option<&LocationId>,
) -> ModifierResult {
    let base_value = activity.base_efficiency.max(Decimal::ZERO);
    let mut sources = vec![ModifierSource {
        id: activity.id.to_string(),
        origin: ModifierOrigin::Base,
        value: base_value,
        rationale: format!("base efficiency of {}", activity.name),
    }];
    let mut comp = Composition {
        multiplier: Decimal::ONE,
        sources: Vec::new(),
    };

    apply_attributes(&mut comp, pawn, activity);
    apply_traits(&mut comp, pawn, activity, catalog);
    apply_equipment(&mut comp, pawn, activity, catalog);

    for (building, count, factor) in structure_factors(catalog, &state.structures, &activity.id) {
        comp.apply(
            building.to_string(),
            ModifierOrigin::Structure,
            factor,
            format!("{count} x {building}"),
        );
    }

    if let Some(def) = location.and_then(|id| catalog.location(id)) {
        comp.apply(
            def.id.to_string(),
            ModifierOrigin::Location,
            def.modifier_for(&activity.id),
            format!("working at {}", def.name),
        );
    }

    apply_conditions(&mut comp, pawn);

    sources.append(&mut comp.sources);
    ModifierResult {
        base_value,
        total_value: base_value.saturating_mul(comp.multiplier),
        multiplier: comp.multiplier,
        sources,
    }
}

fn attribute_value(pawn: &Pawn, attribute: Attribute) -> Decimal {
    Decimal::from(pawn.stats.get(attribute))
}

fn apply_attributes(comp: &mut Composition, pawn: &Pawn, activity: &ActivityDef) {
    let primary = activity.primary_attribute;
    let value = pawn.stats.get(primary);
    comp.apply(
        primary.to_string(),
        ModifierOrigin::PrimaryAttribute,
        Decimal::new(i64::from(value), 1),
        format!("{primary} {value} / 10"),
    );

    if let Some(secondary) = activity.secondary_attribute {
        let factor = attribute_value(pawn, secondary)
            .saturating_sub(Decimal::TEN)
            .saturating_mul(Decimal::new(2, 2))
            .saturating_add(Decimal::ONE);
        comp.apply(
            secondary.to_string(),
            ModifierOrigin::SecondaryAttribute,
            factor,
            format!("{secondary} {} vs average 10", pawn.stats.get(secondary)),
        );
    }
}

fn apply_traits(comp: &mut Composition, pawn: &Pawn, activity: &ActivityDef, catalog: &Catalog) {
    let mut seen = BTreeSet::new();
    for trait_id in &pawn.traits {
        if !seen.insert(trait_id) {
            continue;
        }
        let Some(def) = catalog.trait_def(trait_id) else {
            continue;
        };
        if let Some(multiplier) = def.activity_multiplier(&activity.id) {
            comp.apply(
                trait_id.to_string(),
                ModifierOrigin::Trait,
                multiplier,
                format!("trait {}", def.name),
            );
        }
    }
}

fn apply_equipment(comp: &mut Composition, pawn: &Pawn, activity: &ActivityDef, catalog: &Catalog) {
    for item_id in pawn.equipment.values() {
        let Some(def) = catalog.item(item_id) else {
            continue;
        };
        if !def.compatible_activities.contains(&activity.id) {
            continue;
        }
        let effects = def
            .effects
            .iter()
            .filter(|e| discovery::applies_to(&e.name, activity.id.as_str()))
            .fold(Decimal::ONE, |acc, e| acc.saturating_mul(e.value));
        let tier_bonus = Decimal::from(def.tool_tier).saturating_mul(Decimal::new(1, 1));
        comp.apply(
            item_id.to_string(),
            ModifierOrigin::Item,
            effects.saturating_add(tier_bonus),
            format!("equipped {} (tier {})", def.name, def.tool_tier),
        );
    }
}

fn apply_conditions(comp: &mut Composition, pawn: &Pawn) {
    let health = pawn.state.health;
    if health < Decimal::ONE_HUNDRED {
        comp.apply(
            String::from("health"),
            ModifierOrigin::Condition,
            health.saturating_mul(Decimal::new(1, 2)),
            format!("health {health}"),
        );
    }

    let mood = pawn.state.mood;
    let neutral_mood = Decimal::from(50);
    if mood != neutral_mood {
        comp.apply(
            String::from("mood"),
            ModifierOrigin::Condition,
            mood.saturating_sub(neutral_mood)
                .saturating_mul(Decimal::new(1, 2))
                .saturating_add(Decimal::ONE),
            format!("mood {mood}"),
        );
    }

    let fatigue = pawn.needs.fatigue;
    let threshold = Decimal::from(FATIGUE_PENALTY_START);
    if fatigue > threshold {
        let factor = Decimal::ONE
            .saturating_sub(fatigue.saturating_sub(threshold).saturating_mul(Decimal::new(2, 2)))
            .max(Decimal::new(1, 1));
        comp.apply(
            String::from("fatigue"),
            ModifierOrigin::Condition,
            factor,
            format!("fatigue {fatigue}"),
        );
    }
}
