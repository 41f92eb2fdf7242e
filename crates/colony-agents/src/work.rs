//! Work assignments: priorities, authorized locations, and the round-robin
//! activity rotation.
//!
//! A pawn may have several activities at positive priority. The list is
//! sorted by priority (highest first, ties by id) and the pawn performs
//! `list[job_index % len]`, advancing `job_index` after each worked turn.
//! Priority therefore only decides the order of the rotation: with N
//! positive-priority activities, each one is performed exactly once every N
//! worked turns regardless of its weight.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{ActivityId, LocationId, MAX_PRIORITY, Pawn, ResearchId, WorkAssignment};
use colony_world::{Catalog, LocationState};
use tracing::debug;

use crate::error::AgentError;

/// Build the assignment given to a pawn that has none.
///
/// Picks the lowest-requirement unlocked activity (ties by id) at
/// `default_priority`, and the first discovered location in catalog order.
/// Either may be missing if the catalog offers none, in which case the pawn
/// stays idle.
pub fn default_assignment(
    catalog: &Catalog,
    locations: &BTreeMap<LocationId, LocationState>,
    completed_research: &BTreeSet<ResearchId>,
    default_priority: u8,
) -> WorkAssignment {
    let mut assignment = WorkAssignment::default();

    if let Some(activity) = catalog.unlocked_by_requirement(completed_research).first() {
        set_priority(&mut assignment, &activity.id, default_priority);
    }

    let first_discovered = catalog.locations().iter().find(|def| {
        locations
            .get(&def.id)
            .map_or(def.discovered, |state| state.discovered)
    });
    if let Some(def) = first_discovered {
        assignment.authorized_locations.insert(def.id.clone());
        assignment.current_location = Some(def.id.clone());
    }

    assignment
}

/// Set the priority of an activity, clamped to `0..=MAX_PRIORITY`.
///
/// Priority 0 removes the activity. Returns `true` if the value was clamped.
pub fn set_priority(assignment: &mut WorkAssignment, activity: &ActivityId, priority: u8) -> bool {
    let clamped = priority.min(MAX_PRIORITY);
    if clamped == 0 {
        assignment.priorities.remove(activity);
    } else {
        assignment.priorities.insert(activity.clone(), clamped);
    }
    clamped != priority
}

/// Allow the pawn to work at a location.
pub fn authorize_location(assignment: &mut WorkAssignment, location: &LocationId) {
    assignment.authorized_locations.insert(location.clone());
}

/// Withdraw permission for a location. The pawn stops working there if it
/// was the active location. Returns `true` if the location was authorized.
pub fn revoke_location(assignment: &mut WorkAssignment, location: &LocationId) -> bool {
    let removed = assignment.authorized_locations.remove(location);
    if assignment.current_location.as_ref() == Some(location) {
        assignment.current_location = None;
    }
    removed
}

/// Choose where the pawn works.
///
/// # Errors
///
/// Returns [`AgentError::LocationNotAuthorized`] if the location has not
/// been authorized.
pub fn set_active_location(
    assignment: &mut WorkAssignment,
    location: &LocationId,
) -> Result<(), AgentError> {
    if !assignment.authorized_locations.contains(location) {
        return Err(AgentError::LocationNotAuthorized(location.clone()));
    }
    assignment.current_location = Some(location.clone());
    Ok(())
}

/// Positive-priority activities, highest priority first, ties by id.
pub fn ordered_activities(assignment: &WorkAssignment) -> Vec<(ActivityId, u8)> {
    let mut list: Vec<(ActivityId, u8)> = assignment
        .priorities
        .iter()
        .filter(|(_, p)| **p > 0)
        .map(|(a, p)| (a.clone(), *p))
        .collect();
    list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    list
}

/// Whether the assignment lets the pawn work this turn: an authorized
/// active location and at least one positive-priority activity.
pub fn has_active_assignment(assignment: &WorkAssignment) -> bool {
    assignment
        .current_location
        .as_ref()
        .is_some_and(|l| assignment.authorized_locations.contains(l))
        && assignment.priorities.values().any(|p| *p > 0)
}

/// Whether the pawn can actually perform its current job: the assignment
/// is active, the activity the rotation points at exists and is unlocked,
/// and the active location exists and has been discovered.
///
/// A pawn with an active but blocked assignment idles.
pub fn is_unblocked(
    assignment: &WorkAssignment,
    catalog: &Catalog,
    locations: &BTreeMap<LocationId, LocationState>,
    completed_research: &BTreeSet<ResearchId>,
) -> bool {
    if !has_active_assignment(assignment) {
        return false;
    }
    let Some((activity, _)) = current_job(assignment) else {
        return false;
    };
    let site_open = assignment
        .current_location
        .as_ref()
        .and_then(|l| locations.get(l))
        .is_some_and(|site| site.discovered);
    site_open
        && catalog.activity(&activity).is_some()
        && catalog.is_unlocked(&activity, completed_research)
}

/// The activity the rotation points at, with its priority.
pub fn current_job(assignment: &WorkAssignment) -> Option<(ActivityId, u8)> {
    let list = ordered_activities(assignment);
    let len = u32::try_from(list.len()).ok().filter(|l| *l > 0)?;
    let index = assignment.job_index.checked_rem(len)?;
    list.into_iter().nth(usize::try_from(index).ok()?)
}

/// Record that the pawn performed `activity` and advance the rotation.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if the cursor overflows.
pub fn advance_rotation(
    assignment: &mut WorkAssignment,
    activity: &ActivityId,
) -> Result<(), AgentError> {
    assignment.current_activity = Some(activity.clone());
    assignment.job_index =
        assignment
            .job_index
            .checked_add(1)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: String::from("job index overflow"),
            })?;
    debug!(activity = %activity, job_index = assignment.job_index, "rotation advanced");
    Ok(())
}

/// Award one point of experience in `activity`.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if the skill overflows.
pub fn record_work(pawn: &mut Pawn, activity: &ActivityId) -> Result<u32, AgentError> {
    let xp = pawn.skills.entry(activity.clone()).or_insert(0);
    *xp = xp
        .checked_add(1)
        .ok_or_else(|| AgentError::ArithmeticOverflow {
            context: format!("skill overflow for {activity}"),
        })?;
    Ok(*xp)
}
