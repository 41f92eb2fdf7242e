//! The pawn activity state machine.
//!
//! Each turn a pawn is in exactly one of `Working`, `Sleeping`, `Eating`, or
//! `Idle`. Within a turn the orchestrator drives the transitions:
//!
//! - [`clear_transient`]: eating lasts one turn; sleep ends when the
//!   continuation condition fails
//! - [`sync_working`]: an awake, non-eating pawn works iff it has an active
//!   assignment
//! - [`run_automatic_needs`]: eat if hungry enough, then fall asleep if
//!   tired enough
//!
//! Sleep uses hysteresis. A sleeping pawn keeps sleeping while
//! `fatigue > sleep_continue_fatigue` and it is not starving; an awake pawn
//! only falls asleep at the hunger-dependent threshold from
//! [`NeedsConfig::sleep_threshold`]. Eating and sleeping always clear the
//! working flag.

use colony_types::{ActivityState, Needs, Pawn, PawnState};
use colony_world::Catalog;
use tracing::debug;

use crate::config::NeedsConfig;
use crate::eating::{self, MealReport};
use crate::error::AgentError;
use crate::inventory::Stockpile;

/// Whether a sleeping pawn keeps sleeping.
pub fn should_continue_sleeping(needs: &Needs, config: &NeedsConfig) -> bool {
    needs.fatigue > config.sleep_continue_fatigue && needs.hunger < config.starving_hunger
}

/// Whether an awake pawn falls asleep.
pub fn should_start_sleeping(needs: &Needs, config: &NeedsConfig) -> bool {
    config
        .sleep_threshold(needs.hunger)
        .is_some_and(|threshold| needs.fatigue >= threshold)
}

/// Whether a pawn should eat this turn.
///
/// Forced hunger overrides sleep; lower tiers apply only while awake or
/// while idle.
pub fn should_eat(needs: &Needs, state: &PawnState, config: &NeedsConfig) -> bool {
    if needs.hunger >= config.eat_forced_hunger {
        return true;
    }
    if state.is_sleeping() {
        return false;
    }
    if needs.hunger >= config.eat_awake_hunger {
        return true;
    }
    !state.is_working() && needs.hunger >= config.eat_idle_hunger
}

/// What [`clear_transient`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransientCleared {
    /// The pawn finished last turn's meal.
    pub finished_meal: bool,
    /// The pawn woke up.
    pub woke: bool,
}

/// Clear one-turn activity flags left over from the previous turn.
pub fn clear_transient(pawn: &mut Pawn, config: &NeedsConfig) -> TransientCleared {
    let mut cleared = TransientCleared {
        finished_meal: false,
        woke: false,
    };
    if pawn.state.is_eating() {
        pawn.state.set_activity(ActivityState::Idle);
        cleared.finished_meal = true;
    } else if pawn.state.is_sleeping() && !should_continue_sleeping(&pawn.needs, config) {
        pawn.state.set_activity(ActivityState::Idle);
        cleared.woke = true;
        debug!(pawn = %pawn.id, fatigue = %pawn.needs.fatigue, "pawn woke up");
    }
    cleared
}

/// Align the working flag with the pawn's assignment.
///
/// Eating and sleeping pawns are left alone; everyone else works iff
/// `has_active_assignment`.
pub const fn sync_working(state: &mut PawnState, has_active_assignment: bool) {
    if state.is_eating() || state.is_sleeping() {
        return;
    }
    if has_active_assignment {
        state.set_activity(ActivityState::Working);
    } else {
        state.set_activity(ActivityState::Idle);
    }
}

/// Outcome of the automatic needs pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomaticOutcome {
    /// The meal eaten, if any.
    pub meal: Option<MealReport>,
    /// The pawn wanted to eat but the stockpile had no food.
    pub went_hungry: bool,
    /// The pawn fell asleep this turn.
    pub fell_asleep: bool,
}

/// Run the automatic eating and sleeping decisions for one pawn.
///
/// Eating is checked first; a pawn that eats does not also fall asleep. A
/// pawn that wanted to eat but found nothing keeps its current activity.
///
/// # Errors
///
/// Returns [`AgentError`] if the meal fails.
pub fn run_automatic_needs(
    pawn: &mut Pawn,
    stockpile: &mut Stockpile,
    catalog: &Catalog,
    config: &NeedsConfig,
    turn: u64,
) -> Result<AutomaticOutcome, AgentError> {
    let mut outcome = AutomaticOutcome {
        meal: None,
        went_hungry: false,
        fell_asleep: false,
    };

    if should_eat(&pawn.needs, &pawn.state, config) {
        match eating::eat_meal(pawn, stockpile, catalog, config, turn)? {
            Some(report) => {
                pawn.state.set_activity(ActivityState::Eating);
                outcome.meal = Some(report);
                return Ok(outcome);
            }
            None => outcome.went_hungry = true,
        }
    }

    if !pawn.state.is_sleeping() && should_start_sleeping(&pawn.needs, config) {
        pawn.state.set_activity(ActivityState::Sleeping);
        pawn.needs.last_sleep = turn;
        outcome.fell_asleep = true;
        debug!(
            pawn = %pawn.id,
            fatigue = %pawn.needs.fatigue,
            hunger = %pawn.needs.hunger,
            "pawn fell asleep"
        );
    }

    Ok(outcome)
}
