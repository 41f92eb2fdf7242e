//! Meal sessions.
//!
//! A hungry pawn eats from the shared stockpile, best food first. Foods are
//! ranked by nutrition (highest first, ties by item id). The pawn works
//! through at most `max_food_types` of them, eating up to
//! `max_units_per_type` units of each, and stops as soon as hunger reaches
//! the meal target `max(meal_target_floor, meal_target_fraction * hunger)`.
//! Each unit is removed from the stockpile the moment it is eaten.

use std::collections::BTreeMap;

use colony_types::{ItemId, Pawn};
use colony_world::Catalog;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::NeedsConfig;
use crate::error::AgentError;
use crate::inventory::{self, Stockpile};
use crate::needs::clamp_unit;

/// Outcome of a meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealReport {
    /// Units eaten per food.
    pub consumed: BTreeMap<ItemId, u32>,
    /// Hunger when the meal began.
    pub hunger_before: Decimal,
    /// Hunger when the meal ended.
    pub hunger_after: Decimal,
    /// Mood gained from the meal.
    pub mood_gained: Decimal,
}

/// Food in the stockpile, best first: `(item, nutrition)`.
pub fn ranked_foods(stockpile: &Stockpile, catalog: &Catalog) -> Vec<(ItemId, u32)> {
    let mut foods: Vec<(ItemId, u32)> = stockpile
        .values()
        .filter(|stack| stack.quantity > 0)
        .filter_map(|stack| {
            let def = catalog.item(&stack.item)?;
            def.is_food().then(|| (stack.item.clone(), def.nutrition))
        })
        .collect();
    foods.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    foods
}

/// Hunger level a meal starting at `hunger` aims for.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn meal_target(hunger: Decimal, config: &NeedsConfig) -> Result<Decimal, AgentError> {
    let scaled = hunger
        .checked_mul(config.meal_target_fraction)
        .ok_or_else(|| AgentError::ArithmeticOverflow {
            context: String::from("meal target scaling"),
        })?;
    Ok(scaled.max(config.meal_target_floor))
}

/// Run one meal for a pawn.
///
/// Returns `None` (and leaves pawn and stockpile untouched) when nothing was
/// eaten, either because there is no food or because hunger is already at
/// or below the target. The caller decides whether to set the eating flag.
///
/// # Errors
///
/// Returns [`AgentError`] if the stockpile cannot be debited or arithmetic
/// overflows.
pub fn eat_meal(
    pawn: &mut Pawn,
    stockpile: &mut Stockpile,
    catalog: &Catalog,
    config: &NeedsConfig,
    turn: u64,
) -> Result<Option<MealReport>, AgentError> {
    let hunger_before = pawn.needs.hunger;
    let target = meal_target(hunger_before, config)?;
    let type_limit = usize::try_from(config.max_food_types).unwrap_or(usize::MAX);

    let mut consumed: BTreeMap<ItemId, u32> = BTreeMap::new();
    let mut hunger = hunger_before;

    'foods: for (item, nutrition) in ranked_foods(stockpile, catalog).into_iter().take(type_limit) {
        let per_unit = Decimal::from(nutrition)
            .checked_mul(config.hunger_per_nutrition)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: String::from("nutrition scaling"),
            })?;
        let mut eaten: u32 = 0;
        while eaten < config.max_units_per_type {
            if hunger <= target {
                break 'foods;
            }
            if !inventory::has_item(stockpile, &item, 1) {
                break;
            }
            inventory::remove_item(stockpile, &item, 1)?;
            hunger = hunger.saturating_sub(per_unit).max(Decimal::ZERO);
            eaten = eaten.saturating_add(1);
            let entry = consumed.entry(item.clone()).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        if hunger <= target {
            break;
        }
    }

    if consumed.is_empty() {
        return Ok(None);
    }

    let reduction = hunger_before.saturating_sub(hunger);
    let mood_gained = reduction
        .checked_mul(config.meal_mood_factor)
        .ok_or_else(|| AgentError::ArithmeticOverflow {
            context: String::from("meal mood gain"),
        })?;

    pawn.needs.hunger = clamp_unit(hunger);
    pawn.state.mood = clamp_unit(pawn.state.mood.saturating_add(mood_gained));
    pawn.needs.last_meal = turn;

    debug!(
        pawn = %pawn.id,
        hunger_before = %hunger_before,
        hunger_after = %pawn.needs.hunger,
        foods = consumed.len(),
        "pawn ate"
    );

    Ok(Some(MealReport {
        consumed,
        hunger_before,
        hunger_after: pawn.needs.hunger,
        mood_gained,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::Stats;
    use colony_world::create_starting_catalog;
    use rust_decimal_macros::dec;

    use super::*;

    fn setup(stock: &[(&str, u32)]) -> (Catalog, Stockpile) {
        let catalog = create_starting_catalog().unwrap_or_default();
        let mut stockpile = Stockpile::new();
        for (item, qty) in stock {
            let _ = inventory::add_item(&mut stockpile, &catalog, &ItemId::from(*item), *qty);
        }
        (catalog, stockpile)
    }

    #[test]
    fn hungry_pawn_eats_best_food_first() {
        // meat = nutrition 5, berries = nutrition 2
        let (catalog, mut stockpile) = setup(&[("meat", 10), ("berries", 10)]);
        let mut pawn = Pawn::new("Hungry", Stats::default());
        pawn.needs.hunger = dec!(85);
        let report = eat_meal(&mut pawn, &mut stockpile, &catalog, &NeedsConfig::default(), 7)
            .unwrap()
            .unwrap();
        // target = max(10, 25.5); 85 -> 65 -> 45 -> 25
        assert_eq!(report.consumed.get("meat").copied(), Some(3));
        assert!(!report.consumed.contains_key("berries"));
        assert_eq!(pawn.needs.hunger, dec!(25));
        assert!(pawn.needs.hunger <= dec!(25.5));
        assert_eq!(inventory::quantity_of(&stockpile, &ItemId::from("meat")), 7);
        assert_eq!(inventory::quantity_of(&stockpile, &ItemId::from("berries")), 10);
        assert_eq!(pawn.state.mood, dec!(56));
        assert_eq!(pawn.needs.last_meal, 7);
    }

    #[test]
    fn per_type_cap_moves_to_next_food() {
        // roots = nutrition 3 (12 hunger each), berries = nutrition 2
        let (catalog, mut stockpile) = setup(&[("roots", 10), ("berries", 10)]);
        let mut pawn = Pawn::new("Starving", Stats::default());
        pawn.needs.hunger = dec!(100);
        let report = eat_meal(&mut pawn, &mut stockpile, &catalog, &NeedsConfig::default(), 1)
            .unwrap()
            .unwrap();
        // target 30: five roots -> 40, then two berries -> 24
        assert_eq!(report.consumed.get("roots").copied(), Some(5));
        assert_eq!(report.consumed.get("berries").copied(), Some(2));
        assert_eq!(pawn.needs.hunger, dec!(24));
    }

    #[test]
    fn hunger_never_negative() {
        let (catalog, mut stockpile) = setup(&[("bread", 3)]);
        let mut pawn = Pawn::new("Peckish", Stats::default());
        pawn.needs.hunger = dec!(12);
        let _ = eat_meal(&mut pawn, &mut stockpile, &catalog, &NeedsConfig::default(), 1);
        assert_eq!(pawn.needs.hunger, Decimal::ZERO);
        assert_eq!(inventory::quantity_of(&stockpile, &ItemId::from("bread")), 2);
    }

    #[test]
    fn no_food_leaves_pawn_unchanged() {
        let (catalog, mut stockpile) = setup(&[("wood", 20)]);
        let mut pawn = Pawn::new("Unlucky", Stats::default());
        pawn.needs.hunger = dec!(90);
        let before = pawn.clone();
        let report = eat_meal(&mut pawn, &mut stockpile, &catalog, &NeedsConfig::default(), 3);
        assert!(matches!(report, Ok(None)));
        assert_eq!(pawn, before);
    }

    #[test]
    fn ranking_breaks_ties_by_id() {
        let (catalog, stockpile) = setup(&[("berries", 1), ("fish", 1), ("meat", 1)]);
        let ranked: Vec<String> = ranked_foods(&stockpile, &catalog)
            .into_iter()
            .map(|(id, _)| id.0)
            .collect();
        assert_eq!(ranked, vec!["meat", "fish", "berries"]);
    }
}
