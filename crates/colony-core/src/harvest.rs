//! Harvesting: turning working pawns into stockpile yields.
//!
//! Harvesting is split into a read phase and a write phase. [`plan_harvest`]
//! looks at a frozen snapshot and decides, per pawn on duty, which activity
//! it performs, where, how efficiently, and how many units it asks of each
//! eligible resource node. [`apply_harvest`] then extracts from the nodes,
//! advances the work rotations, awards experience, and merges all yields
//! into the stockpile in one step.
//!
//! The requested amount is `floor(priority * base_rate * efficiency)`, and
//! at least 1. It is requested from every eligible node at the location.

use std::collections::BTreeMap;

use colony_agents::{inventory, work, AgentError};
use colony_types::{ActivityId, ItemId, LocationId, PawnId};
use colony_world::{Catalog, WorldError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::issue::TurnIssue;
use crate::modifiers::ModifierEngine;
use crate::state::GameState;

/// Errors from applying a harvest plan.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Node extraction failed.
    #[error("extraction failed: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Rotation, experience, or stockpile update failed.
    #[error("work bookkeeping failed for pawn {pawn}: {source}")]
    Agent {
        /// The pawn being processed.
        pawn: PawnId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// Merging yields into the stockpile failed.
    #[error("stockpile merge failed: {source}")]
    Stockpile {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

/// One pawn's work for the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestTask {
    /// Who works.
    pub pawn: PawnId,
    /// What the rotation picked.
    pub activity: ActivityId,
    /// Where.
    pub location: LocationId,
    /// Priority of the activity.
    pub priority: u8,
    /// Resolved efficiency (total modifier value).
    pub efficiency: Decimal,
    /// Units requested from each eligible node.
    pub requested: u32,
    /// Eligible node resources. Empty when the work yields nothing.
    pub resources: Vec<ItemId>,
    /// Whether the activity exists and earns experience.
    pub counts_as_work: bool,
}

/// Everything [`apply_harvest`] needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestPlan {
    /// Tasks in pawn id order.
    pub tasks: Vec<HarvestTask>,
    /// Problems noticed while planning.
    pub issues: Vec<TurnIssue>,
}

/// What a harvest produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestOutcome {
    /// Total units per resource, as merged into the stockpile.
    pub yields: BTreeMap<ItemId, u32>,
    /// Units gathered per pawn.
    pub per_pawn: BTreeMap<PawnId, u32>,
    /// Problems noticed while applying.
    pub issues: Vec<TurnIssue>,
}

/// Units a pawn asks of each node.
pub fn harvest_amount(priority: u8, base_rate: Decimal, efficiency: Decimal) -> u32 {
    if priority == 0 {
        return 0;
    }
    let raw = Decimal::from(priority)
        .saturating_mul(base_rate)
        .saturating_mul(efficiency)
        .max(Decimal::ZERO)
        .floor();
    raw.to_u32().unwrap_or(u32::MAX).max(1)
}

/// Decide what every pawn on duty harvests this turn.
///
/// Sleeping and eating pawns are skipped, as are pawns whose assignment has
/// no current job. A job whose activity is unknown, locked by research, or
/// whose location is missing or undiscovered leaves the pawn idle, but it
/// still appears as a task with no resources so the rotation advances; the
/// reason is recorded as an issue.
pub fn plan_harvest(
    state: &GameState,
    catalog: &Catalog,
    engine: &mut ModifierEngine,
    base_rate: Decimal,
) -> HarvestPlan {
    let mut plan = HarvestPlan::default();

    for (pawn_id, pawn) in &state.pawns {
        if pawn.state.is_sleeping() || pawn.state.is_eating() {
            continue;
        }
        let Some(assignment) = state.assignments.get(pawn_id) else {
            continue;
        };
        if !work::has_active_assignment(assignment) {
            continue;
        }
        let (Some((activity, priority)), Some(location)) =
            (work::current_job(assignment), assignment.current_location.clone())
        else {
            continue;
        };

        let mut task = HarvestTask {
            pawn: *pawn_id,
            activity: activity.clone(),
            location: location.clone(),
            priority,
            efficiency: Decimal::ZERO,
            requested: 0,
            resources: Vec::new(),
            counts_as_work: false,
        };

        if catalog.activity(&activity).is_none() {
            plan.issues.push(TurnIssue::missing(format!(
                "pawn {pawn_id} assigned unknown activity {activity}"
            )));
            plan.tasks.push(task);
            continue;
        }
        if !catalog.is_unlocked(&activity, &state.completed_research) {
            plan.issues.push(TurnIssue::blocked(format!(
                "pawn {pawn_id} cannot perform {activity}: research required"
            )));
            plan.tasks.push(task);
            continue;
        }
        task.counts_as_work = true;

        let Some(site) = state.locations.get(&location) else {
            plan.issues.push(TurnIssue::missing(format!(
                "pawn {pawn_id} assigned unknown location {location}"
            )));
            plan.tasks.push(task);
            continue;
        };
        if !site.discovered {
            plan.issues.push(TurnIssue::blocked(format!(
                "pawn {pawn_id} cannot work at undiscovered {location}"
            )));
            plan.tasks.push(task);
            continue;
        }

        let modifier = engine.resolve(pawn_id, &activity, state, catalog, Some(&location));
        task.efficiency = modifier.total_value;
        task.requested = harvest_amount(priority, base_rate, modifier.total_value);

        for resource in site.resources.keys() {
            match catalog.item(resource) {
                Some(def) if def.harvest_activities.contains(&activity) => {
                    task.resources.push(resource.clone());
                }
                Some(_) => {}
                None => plan.issues.push(TurnIssue::missing(format!(
                    "node at {location} holds unknown item {resource}"
                ))),
            }
        }

        debug!(
            pawn = %pawn_id,
            activity = %activity,
            location = %location,
            efficiency = %task.efficiency,
            requested = task.requested,
            nodes = task.resources.len(),
            "harvest planned"
        );
        plan.tasks.push(task);
    }

    plan
}

/// Carry out a harvest plan against the working snapshot.
///
/// # Errors
///
/// Returns [`HarvestError`] if extraction, rotation bookkeeping, or the
/// stockpile merge fails.
pub fn apply_harvest(
    state: &mut GameState,
    catalog: &Catalog,
    plan: &HarvestPlan,
) -> Result<HarvestOutcome, HarvestError> {
    let mut outcome = HarvestOutcome {
        issues: plan.issues.clone(),
        ..HarvestOutcome::default()
    };

    for task in &plan.tasks {
        let mut gathered: u32 = 0;
        if let Some(site) = state.locations.get_mut(&task.location) {
            for resource in &task.resources {
                let taken = site.extract(resource, task.requested)?;
                if taken == 0 {
                    continue;
                }
                let total = outcome.yields.entry(resource.clone()).or_insert(0);
                *total = total.saturating_add(taken);
                gathered = gathered.saturating_add(taken);
            }
        }

        if let Some(assignment) = state.assignments.get_mut(&task.pawn) {
            work::advance_rotation(assignment, &task.activity).map_err(|source| {
                HarvestError::Agent {
                    pawn: task.pawn,
                    source,
                }
            })?;
        }
        if task.counts_as_work {
            if let Some(pawn) = state.pawns.get_mut(&task.pawn) {
                work::record_work(pawn, &task.activity).map_err(|source| HarvestError::Agent {
                    pawn: task.pawn,
                    source,
                })?;
            }
        }
        outcome.per_pawn.insert(task.pawn, gathered);
    }

    let unknown = inventory::merge_yields(&mut state.stockpile, catalog, &outcome.yields)?;
    for item in unknown {
        warn!(item = %item, "harvested item has no catalog entry; discarded");
        outcome
            .issues
            .push(TurnIssue::missing(format!("harvested unknown item {item}")));
    }

    Ok(outcome)
}
