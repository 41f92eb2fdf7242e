//! Renewal and extraction logic for location-bound resource nodes.
//!
//! Renewal depends on the node's [`RenewalType`]:
//! - `None`: never regrows
//! - `Slow` / `Fast`: regrows by `renewal_rate` each turn
//! - `Seasonal`: regrows by `renewal_rate` scaled by the season
//!   (Spring +25%, Summer normal, Autumn -25%, Winter -75%)
//!
//! Every path is capped so `current_amount` never exceeds `max_amount`.
//!
//! Extraction honours the node's `depletion` factor: taking `n` units removes
//! `ceil(n * depletion)` from the node.

use colony_types::{RenewalType, ResourceNode, Season};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::WorldError;

/// Apply one turn of renewal to a node.
///
/// Returns the number of units actually added (zero if the node is full or
/// does not renew).
///
/// # Errors
///
/// Returns [`WorldError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn renew(node: &mut ResourceNode, season: Season) -> Result<u32, WorldError> {
    if node.current_amount >= node.max_amount {
        return Ok(0);
    }

    let rate = match node.renewal_type {
        RenewalType::None => 0,
        RenewalType::Slow | RenewalType::Fast => node.renewal_rate,
        RenewalType::Seasonal => seasonal_rate(node.renewal_rate, season)?,
    };

    let headroom = node
        .max_amount
        .checked_sub(node.current_amount)
        .ok_or(WorldError::ArithmeticOverflow)?;

    let added = rate.min(headroom);
    node.current_amount = node
        .current_amount
        .checked_add(added)
        .ok_or(WorldError::ArithmeticOverflow)?;

    Ok(added)
}

/// Scale a base rate by season using integer arithmetic.
///
/// # Errors
///
/// Returns [`WorldError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn seasonal_rate(base: u32, season: Season) -> Result<u32, WorldError> {
    match season {
        Season::Spring => base
            .checked_mul(5)
            .and_then(|v| v.checked_div(4))
            .ok_or(WorldError::ArithmeticOverflow),
        Season::Summer => Ok(base),
        Season::Autumn => base
            .checked_mul(3)
            .and_then(|v| v.checked_div(4))
            .ok_or(WorldError::ArithmeticOverflow),
        Season::Winter => base.checked_div(4).ok_or(WorldError::ArithmeticOverflow),
    }
}

/// The most units that can be taken from a node right now.
///
/// With a depletion factor `d > 0` this is `floor(current / d)`; with
/// `d == 0` extraction is free and the whole pool is available.
pub fn extractable(node: &ResourceNode) -> u32 {
    if node.depletion <= Decimal::ZERO {
        return node.current_amount;
    }
    Decimal::from(node.current_amount)
        .checked_div(node.depletion)
        .map(|v| v.floor())
        .and_then(|v| v.to_u32())
        .unwrap_or(u32::MAX)
}

/// Take up to `requested` units from a node, returning the units taken.
///
/// The node is reduced by `ceil(taken * depletion)`, never below zero.
///
/// # Errors
///
/// Returns [`WorldError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn extract(node: &mut ResourceNode, requested: u32) -> Result<u32, WorldError> {
    let taken = requested.min(extractable(node));
    let cost = Decimal::from(taken)
        .checked_mul(node.depletion.max(Decimal::ZERO))
        .ok_or(WorldError::ArithmeticOverflow)?
        .ceil()
        .to_u32()
        .ok_or(WorldError::ArithmeticOverflow)?;
    node.current_amount = node.current_amount.saturating_sub(cost);
    Ok(taken)
}

/// Clamp a node's amount into `[0, max_amount]`.
///
/// Returns `true` if the node had to be corrected.
pub fn clamp(node: &mut ResourceNode) -> bool {
    if node.current_amount > node.max_amount {
        node.current_amount = node.max_amount;
        return true;
    }
    false
}
