//! Per-turn needs mechanics applied to every pawn.
//!
//! One call to [`apply_needs_tick`] runs the general needs update:
//!
//! 1. Hunger rises by `hunger_rate` times the pawn's trait hunger factors,
//!    unless the pawn is eating this turn
//! 2. A sleeping pawn recovers fatigue and pays down sleep debt; an awake
//!    pawn gains fatigue (faster while working) and accrues sleep debt above
//!    the debt threshold
//! 3. Health regenerates, doubled when comfortable and halved when distressed
//! 4. Mood drifts with hunger and fatigue
//!
//! Every value is clamped to `[0, 100]` afterwards. All arithmetic is checked.

use colony_types::{Pawn, TraitId};
use colony_world::Catalog;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::NeedsConfig;
use crate::error::AgentError;

/// Upper bound of every need and state value.
const MAX_VALUE: Decimal = Decimal::ONE_HUNDRED;

fn overflow(context: &str) -> AgentError {
    AgentError::ArithmeticOverflow {
        context: context.to_owned(),
    }
}

/// Clamp a value into `[0, 100]`.
pub fn clamp_unit(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, MAX_VALUE)
}

/// Hunger and fatigue scaling from a pawn's traits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitRates {
    /// Product of every hunger-rate effect.
    pub hunger: Decimal,
    /// Product of every fatigue-rate effect.
    pub fatigue: Decimal,
    /// Trait references the catalog does not know.
    pub missing: Vec<TraitId>,
}

/// Collect the need-rate multipliers of a pawn's traits.
///
/// Unknown trait ids are skipped and reported in [`TraitRates::missing`].
pub fn trait_rates(pawn: &Pawn, catalog: &Catalog) -> TraitRates {
    let mut rates = TraitRates {
        hunger: Decimal::ONE,
        fatigue: Decimal::ONE,
        missing: Vec::new(),
    };
    for id in &pawn.traits {
        match catalog.trait_def(id) {
            Some(def) => {
                rates.hunger = rates.hunger.saturating_mul(def.hunger_rate());
                rates.fatigue = rates.fatigue.saturating_mul(def.fatigue_rate());
            }
            None => rates.missing.push(id.clone()),
        }
    }
    rates
}

/// Fatigue removed by one turn of sleep.
///
/// The base rate is scaled by `max(floor, fatigue / reference)` while
/// fatigue is below the reference, capped at `recovery_cap`, and never
/// exceeds the current fatigue.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn sleep_recovery(fatigue: Decimal, config: &NeedsConfig) -> Result<Decimal, AgentError> {
    let mut recovery = config.recovery_rate;
    if fatigue < config.recovery_reference_fatigue {
        let ratio = fatigue
            .checked_div(config.recovery_reference_fatigue)
            .ok_or_else(|| overflow("recovery ratio"))?;
        recovery = recovery
            .checked_mul(ratio.max(config.recovery_floor))
            .ok_or_else(|| overflow("recovery scaling"))?;
    }
    Ok(recovery.min(config.recovery_cap).min(fatigue.max(Decimal::ZERO)))
}

/// Health regained this turn given current needs.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn health_regen(
    hunger: Decimal,
    fatigue: Decimal,
    config: &NeedsConfig,
) -> Result<Decimal, AgentError> {
    let comfortable = hunger < config.comfortable_below && fatigue < config.comfortable_below;
    let distressed = hunger > config.distressed_above || fatigue > config.distressed_above;
    if comfortable {
        config
            .health_regen
            .checked_mul(Decimal::TWO)
            .ok_or_else(|| overflow("health regen bonus"))
    } else if distressed {
        config
            .health_regen
            .checked_div(Decimal::TWO)
            .ok_or_else(|| overflow("health regen penalty"))
    } else {
        Ok(config.health_regen)
    }
}

/// Mood change this turn given current needs.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn mood_drift(
    hunger: Decimal,
    fatigue: Decimal,
    config: &NeedsConfig,
) -> Result<Decimal, AgentError> {
    let mut drift = Decimal::ZERO;
    if hunger > config.distressed_above {
        drift = drift
            .checked_sub(config.mood_penalty)
            .ok_or_else(|| overflow("hunger mood penalty"))?;
    }
    if fatigue > config.distressed_above {
        drift = drift
            .checked_sub(config.mood_penalty)
            .ok_or_else(|| overflow("fatigue mood penalty"))?;
    }
    if hunger < config.comfortable_below && fatigue < config.comfortable_below {
        drift = drift
            .checked_add(config.mood_bonus)
            .ok_or_else(|| overflow("comfort mood bonus"))?;
    }
    Ok(drift)
}

/// What one needs tick did to a pawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedsTickResult {
    /// Hunger added.
    pub hunger_gained: Decimal,
    /// Signed fatigue change (negative while sleeping).
    pub fatigue_change: Decimal,
    /// Health added.
    pub health_gained: Decimal,
    /// Signed mood change.
    pub mood_change: Decimal,
    /// Trait references the catalog does not know.
    pub missing_traits: Vec<TraitId>,
}

/// Apply one turn of the general needs update to a pawn.
///
/// Runs after the eating and sleeping decisions, so the activity flags
/// already reflect what the pawn does this turn.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn apply_needs_tick(
    pawn: &mut Pawn,
    catalog: &Catalog,
    config: &NeedsConfig,
    turn: u64,
) -> Result<NeedsTickResult, AgentError> {
    let rates = trait_rates(pawn, catalog);
    let before_hunger = pawn.needs.hunger;
    let before_fatigue = pawn.needs.fatigue;
    let before_health = pawn.state.health;
    let before_mood = pawn.state.mood;

    // 1. Hunger
    if !pawn.state.is_eating() {
        let gain = config
            .hunger_rate
            .checked_mul(rates.hunger)
            .ok_or_else(|| overflow("hunger rate scaling"))?;
        pawn.needs.hunger = clamp_unit(
            pawn.needs
                .hunger
                .checked_add(gain)
                .ok_or_else(|| overflow("hunger increase"))?,
        );
    }

    // 2. Fatigue and sleep debt
    if pawn.state.is_sleeping() {
        let recovery = sleep_recovery(pawn.needs.fatigue, config)?;
        pawn.needs.fatigue = clamp_unit(
            pawn.needs
                .fatigue
                .checked_sub(recovery)
                .ok_or_else(|| overflow("fatigue recovery"))?,
        );
        pawn.needs.sleep_debt = clamp_unit(
            pawn.needs
                .sleep_debt
                .checked_sub(recovery)
                .ok_or_else(|| overflow("sleep debt repayment"))?,
        );
        pawn.needs.last_sleep = turn;
    } else {
        let mut gain = config
            .fatigue_rate
            .checked_mul(rates.fatigue)
            .ok_or_else(|| overflow("fatigue rate scaling"))?;
        if pawn.state.is_working() {
            gain = gain
                .checked_mul(config.work_fatigue_multiplier)
                .ok_or_else(|| overflow("work fatigue scaling"))?;
        }
        pawn.needs.fatigue = clamp_unit(
            pawn.needs
                .fatigue
                .checked_add(gain)
                .ok_or_else(|| overflow("fatigue increase"))?,
        );
        let excess = pawn
            .needs
            .fatigue
            .checked_sub(config.sleep_debt_threshold)
            .ok_or_else(|| overflow("sleep debt excess"))?;
        if excess > Decimal::ZERO {
            pawn.needs.sleep_debt = clamp_unit(
                pawn.needs
                    .sleep_debt
                    .checked_add(excess)
                    .ok_or_else(|| overflow("sleep debt accrual"))?,
            );
        }
    }

    // 3. Health
    let regen = health_regen(pawn.needs.hunger, pawn.needs.fatigue, config)?;
    pawn.state.health = clamp_unit(
        pawn.state
            .health
            .checked_add(regen)
            .ok_or_else(|| overflow("health regeneration"))?,
    );

    // 4. Mood
    let drift = mood_drift(pawn.needs.hunger, pawn.needs.fatigue, config)?;
    pawn.state.mood = clamp_unit(
        pawn.state
            .mood
            .checked_add(drift)
            .ok_or_else(|| overflow("mood drift"))?,
    );

    let result = NeedsTickResult {
        hunger_gained: pawn.needs.hunger.saturating_sub(before_hunger),
        fatigue_change: pawn.needs.fatigue.saturating_sub(before_fatigue),
        health_gained: pawn.state.health.saturating_sub(before_health),
        mood_change: pawn.state.mood.saturating_sub(before_mood),
        missing_traits: rates.missing,
    };
    debug!(
        pawn = %pawn.id,
        hunger = %pawn.needs.hunger,
        fatigue = %pawn.needs.fatigue,
        mood = %pawn.state.mood,
        "needs updated"
    );
    Ok(result)
}

/// Clamp every need and state value of a pawn into `[0, 100]`.
///
/// Returns `true` if anything had to be corrected.
pub fn clamp_needs(pawn: &mut Pawn) -> bool {
    let mut corrected = false;
    for value in [
        &mut pawn.needs.hunger,
        &mut pawn.needs.fatigue,
        &mut pawn.needs.sleep_debt,
        &mut pawn.state.mood,
        &mut pawn.state.health,
    ] {
        let clamped = clamp_unit(*value);
        if clamped != *value {
            *value = clamped;
            corrected = true;
        }
    }
    corrected
}

#[cfg(test)]
mod tests {
    use colony_types::{ActivityState, Stats};
    use colony_world::create_starting_catalog;
    use rust_decimal_macros::dec;

    use super::*;

    fn pawn() -> Pawn {
        Pawn::new("Tester", Stats::default())
    }

    fn catalog() -> Catalog {
        create_starting_catalog().unwrap_or_default()
    }

    #[test]
    fn idle_pawn_gains_base_rates() {
        let mut p = pawn();
        let result = apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), 1);
        assert!(result.is_ok());
        assert_eq!(p.needs.hunger, dec!(2));
        assert_eq!(p.needs.fatigue, dec!(2));
    }

    #[test]
    fn working_pawn_tires_faster() {
        let mut p = pawn();
        p.state.set_activity(ActivityState::Working);
        let _ = apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), 1);
        assert_eq!(p.needs.fatigue, dec!(3));
    }

    #[test]
    fn eating_suppresses_hunger_gain() {
        let mut p = pawn();
        p.needs.hunger = dec!(40);
        p.state.set_activity(ActivityState::Eating);
        let _ = apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), 1);
        assert_eq!(p.needs.hunger, dec!(40));
    }

    #[test]
    fn trait_rates_scale_accumulation() {
        let mut p = pawn();
        p.traits = vec![TraitId::from("glutton"), TraitId::from("tireless")];
        let result = apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), 1);
        assert_eq!(p.needs.hunger, dec!(3));
        assert_eq!(p.needs.fatigue, dec!(1.5));
        assert!(result.is_ok_and(|r| r.missing_traits.is_empty()));
    }

    #[test]
    fn unknown_trait_reported() {
        let mut p = pawn();
        p.traits = vec![TraitId::from("mystery")];
        let result = apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), 1);
        assert!(result.is_ok_and(|r| r.missing_traits == vec![TraitId::from("mystery")]));
        assert_eq!(p.needs.hunger, dec!(2));
    }

    #[test]
    fn recovery_scaling_and_cap() {
        let cfg = NeedsConfig::default();
        // high fatigue: full base rate
        assert_eq!(sleep_recovery(dec!(90), &cfg).ok(), Some(dec!(10)));
        // 30/60 = 0.5
        assert_eq!(sleep_recovery(dec!(30), &cfg).ok(), Some(dec!(5)));
        // 20/60 floored at 0.5
        assert_eq!(sleep_recovery(dec!(20), &cfg).ok(), Some(dec!(5)));
        // never below zero
        assert_eq!(sleep_recovery(dec!(3), &cfg).ok(), Some(dec!(3)));
        let generous = NeedsConfig {
            recovery_rate: dec!(40),
            ..NeedsConfig::default()
        };
        assert_eq!(sleep_recovery(dec!(90), &generous).ok(), Some(dec!(15)));
    }

    #[test]
    fn sleeping_pawn_recovers_and_pays_debt() {
        let mut p = pawn();
        p.needs.fatigue = dec!(70);
        p.needs.sleep_debt = dec!(12);
        p.state.set_activity(ActivityState::Sleeping);
        let _ = apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), 9);
        assert_eq!(p.needs.fatigue, dec!(60));
        assert_eq!(p.needs.sleep_debt, dec!(2));
        assert_eq!(p.needs.last_sleep, 9);
    }

    #[test]
    fn sleep_debt_accrues_above_threshold() {
        let mut p = pawn();
        p.needs.fatigue = dec!(55);
        let _ = apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), 1);
        assert_eq!(p.needs.sleep_debt, dec!(7));
    }

    #[test]
    fn health_regen_tiers() {
        let cfg = NeedsConfig::default();
        assert_eq!(health_regen(dec!(10), dec!(10), &cfg).ok(), Some(dec!(1)));
        assert_eq!(health_regen(dec!(50), dec!(10), &cfg).ok(), Some(dec!(0.5)));
        assert_eq!(health_regen(dec!(75), dec!(10), &cfg).ok(), Some(dec!(0.25)));
    }

    #[test]
    fn mood_feedback() {
        let cfg = NeedsConfig::default();
        assert_eq!(mood_drift(dec!(80), dec!(80), &cfg).ok(), Some(dec!(-2)));
        assert_eq!(mood_drift(dec!(10), dec!(10), &cfg).ok(), Some(dec!(0.5)));
        assert_eq!(mood_drift(dec!(50), dec!(50), &cfg).ok(), Some(Decimal::ZERO));
    }

    #[test]
    fn values_stay_in_bounds() {
        let mut p = pawn();
        p.needs.hunger = dec!(99.5);
        p.needs.fatigue = dec!(99);
        p.state.set_activity(ActivityState::Working);
        p.state.mood = dec!(0.5);
        p.state.health = dec!(100);
        for turn in 1..=20 {
            assert!(apply_needs_tick(&mut p, &catalog(), &NeedsConfig::default(), turn).is_ok());
        }
        assert_eq!(p.needs.hunger, dec!(100));
        assert_eq!(p.needs.fatigue, dec!(100));
        assert_eq!(p.state.mood, Decimal::ZERO);
        assert_eq!(p.state.health, dec!(100));
    }

    #[test]
    fn clamp_needs_repairs_out_of_range() {
        let mut p = pawn();
        p.needs.hunger = dec!(-4);
        p.state.mood = dec!(140);
        assert!(clamp_needs(&mut p));
        assert_eq!(p.needs.hunger, Decimal::ZERO);
        assert_eq!(p.state.mood, dec!(100));
        assert!(!clamp_needs(&mut p));
    }
}
