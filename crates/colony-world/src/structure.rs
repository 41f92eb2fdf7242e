//! How constructed buildings affect work.
//!
//! A building's bonus for an activity is the product of its effects that
//! apply to the activity. Copies stack linearly: `count` copies of a
//! building with bonus `b` give `1 + (b - 1) * count`, so ten workshops at
//! 1.2 give 3.0 rather than 1.2^10.

use std::collections::BTreeMap;

use colony_types::{ActivityId, BuildingId};
use rust_decimal::Decimal;

use crate::catalog::{BuildingDef, Catalog};
use crate::discovery;

/// Combined bonus of one building type for an activity, or `None` if no
/// effect of the building applies.
pub fn building_bonus(def: &BuildingDef, activity: &ActivityId) -> Option<Decimal> {
    let mut relevant = def
        .effects
        .iter()
        .filter(|e| discovery::applies_to(&e.name, activity.as_str()))
        .peekable();
    relevant.peek()?;
    Some(relevant.fold(Decimal::ONE, |acc, e| acc.saturating_mul(e.value)))
}

/// Linear stacking of `count` copies of a building with the given bonus.
pub fn stacked_factor(bonus: Decimal, count: u32) -> Decimal {
    bonus
        .saturating_sub(Decimal::ONE)
        .saturating_mul(Decimal::from(count))
        .saturating_add(Decimal::ONE)
}

/// Factor per constructed building type that applies to the activity.
///
/// Unknown building ids and zero counts are skipped.
pub fn structure_factors(
    catalog: &Catalog,
    counts: &BTreeMap<BuildingId, u32>,
    activity: &ActivityId,
) -> Vec<(BuildingId, u32, Decimal)> {
    counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .filter_map(|(id, count)| {
            let def = catalog.building(id)?;
            let bonus = building_bonus(def, activity)?;
            Some((id.clone(), *count, stacked_factor(bonus, *count)))
        })
        .collect()
}
