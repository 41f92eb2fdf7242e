//! Tunable parameters for pawn needs, sleep, meals, and recovery.
//!
//! [`NeedsConfig`] bundles every knob the needs machine reads so that the
//! turn orchestrator and tests can override defaults. It deserializes from
//! the `needs` section of `colony-config.yaml`; any omitted field keeps its
//! default.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of the hunger-dependent sleep threshold.
///
/// An awake pawn whose hunger is below `hunger_below` starts sleeping once
/// fatigue reaches `fatigue_at_least`. Bands are checked in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepBand {
    /// Upper (exclusive) hunger bound of the band.
    pub hunger_below: Decimal,
    /// Fatigue at which sleep begins within the band.
    pub fatigue_at_least: Decimal,
}

/// Configuration for per-turn needs mechanics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    /// Hunger added per turn before trait scaling (default: 2).
    pub hunger_rate: Decimal,
    /// Fatigue added per turn before trait scaling (default: 2).
    pub fatigue_rate: Decimal,
    /// Extra fatigue factor while working (default: 1.5).
    pub work_fatigue_multiplier: Decimal,
    /// Fatigue above which sleep debt accrues while awake (default: 50).
    pub sleep_debt_threshold: Decimal,

    /// A sleeping pawn keeps sleeping while fatigue is above this (default: 15).
    pub sleep_continue_fatigue: Decimal,
    /// At or above this hunger a pawn never sleeps (default: 80).
    pub starving_hunger: Decimal,
    /// Hunger-dependent fall-asleep thresholds.
    pub sleep_bands: Vec<SleepBand>,

    /// Fatigue removed per turn of sleep before scaling (default: 10).
    pub recovery_rate: Decimal,
    /// Maximum fatigue removed in one turn (default: 15).
    pub recovery_cap: Decimal,
    /// Below this fatigue, recovery scales by `fatigue / reference` (default: 60).
    pub recovery_reference_fatigue: Decimal,
    /// Lower bound of the recovery scaling factor (default: 0.5).
    pub recovery_floor: Decimal,

    /// Hunger that forces eating even while asleep (default: 80).
    pub eat_forced_hunger: Decimal,
    /// Hunger that triggers eating while awake (default: 50).
    pub eat_awake_hunger: Decimal,
    /// Hunger that triggers eating while idle (default: 30).
    pub eat_idle_hunger: Decimal,
    /// Hunger removed per point of nutrition (default: 4).
    pub hunger_per_nutrition: Decimal,
    /// Distinct food types consumed per meal (default: 3).
    pub max_food_types: u32,
    /// Units of a single food consumed per meal (default: 5).
    pub max_units_per_type: u32,
    /// A meal aims for this fraction of the starting hunger (default: 0.3).
    pub meal_target_fraction: Decimal,
    /// A meal never aims below this hunger (default: 10).
    pub meal_target_floor: Decimal,
    /// Mood gained per point of hunger removed (default: 0.1).
    pub meal_mood_factor: Decimal,

    /// Health regained per turn (default: 0.5).
    pub health_regen: Decimal,
    /// Below this, hunger and fatigue count as comfortable (default: 30).
    pub comfortable_below: Decimal,
    /// Above this, hunger or fatigue count as distressing (default: 70).
    pub distressed_above: Decimal,
    /// Mood lost per distressing need (default: 1).
    pub mood_penalty: Decimal,
    /// Mood gained when both needs are comfortable (default: 0.5).
    pub mood_bonus: Decimal,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            hunger_rate: Decimal::TWO,
            fatigue_rate: Decimal::TWO,
            work_fatigue_multiplier: Decimal::new(15, 1),
            sleep_debt_threshold: Decimal::from(50),
            sleep_continue_fatigue: Decimal::from(15),
            starving_hunger: Decimal::from(80),
            sleep_bands: vec![
                SleepBand {
                    hunger_below: Decimal::from(30),
                    fatigue_at_least: Decimal::from(40),
                },
                SleepBand {
                    hunger_below: Decimal::from(60),
                    fatigue_at_least: Decimal::from(60),
                },
                SleepBand {
                    hunger_below: Decimal::from(80),
                    fatigue_at_least: Decimal::from(80),
                },
            ],
            recovery_rate: Decimal::TEN,
            recovery_cap: Decimal::from(15),
            recovery_reference_fatigue: Decimal::from(60),
            recovery_floor: Decimal::new(5, 1),
            eat_forced_hunger: Decimal::from(80),
            eat_awake_hunger: Decimal::from(50),
            eat_idle_hunger: Decimal::from(30),
            hunger_per_nutrition: Decimal::from(4),
            max_food_types: 3,
            max_units_per_type: 5,
            meal_target_fraction: Decimal::new(3, 1),
            meal_target_floor: Decimal::TEN,
            meal_mood_factor: Decimal::new(1, 1),
            health_regen: Decimal::new(5, 1),
            comfortable_below: Decimal::from(30),
            distressed_above: Decimal::from(70),
            mood_penalty: Decimal::ONE,
            mood_bonus: Decimal::new(5, 1),
        }
    }
}

impl NeedsConfig {
    /// Fatigue at which an awake pawn with the given hunger falls asleep.
    ///
    /// Returns `None` when the pawn is too hungry to sleep at all.
    pub fn sleep_threshold(&self, hunger: Decimal) -> Option<Decimal> {
        if hunger >= self.starving_hunger {
            return None;
        }
        self.sleep_bands
            .iter()
            .find(|band| hunger < band.hunger_below)
            .map(|band| band.fatigue_at_least)
    }
}
