//! Shared stockpile operations.
//!
//! The colony keeps one stockpile of [`InventoryStack`]s keyed by item id.
//! A stack is created from the item's catalog template the first time the
//! item is acquired and removed again when it runs out. All arithmetic is
//! checked.

use std::collections::BTreeMap;

use colony_types::{InventoryStack, ItemId};
use colony_world::Catalog;

use crate::error::AgentError;

/// The colony's shared stockpile.
pub type Stockpile = BTreeMap<ItemId, InventoryStack>;

/// Units of `item` held (zero if there is no stack).
pub fn quantity_of(stockpile: &Stockpile, item: &ItemId) -> u32 {
    stockpile.get(item).map_or(0, |s| s.quantity)
}

/// Check whether the stockpile holds at least `amount` of `item`.
pub fn has_item(stockpile: &Stockpile, item: &ItemId, amount: u32) -> bool {
    quantity_of(stockpile, item) >= amount
}

/// Add `amount` units of `item`, creating the stack from the catalog
/// template if needed.
///
/// # Errors
///
/// Returns [`AgentError::UnknownItem`] if the item has no catalog entry and
/// no stack exists yet, or [`AgentError::ArithmeticOverflow`] on overflow.
pub fn add_item(
    stockpile: &mut Stockpile,
    catalog: &Catalog,
    item: &ItemId,
    amount: u32,
) -> Result<(), AgentError> {
    if amount == 0 {
        return Ok(());
    }
    if let Some(stack) = stockpile.get_mut(item) {
        stack.quantity =
            stack
                .quantity
                .checked_add(amount)
                .ok_or_else(|| AgentError::ArithmeticOverflow {
                    context: format!("stockpile quantity overflow for {item}"),
                })?;
        return Ok(());
    }
    let def = catalog
        .item(item)
        .ok_or_else(|| AgentError::UnknownItem(item.clone()))?;
    stockpile.insert(
        item.clone(),
        InventoryStack {
            item: item.clone(),
            name: def.name.clone(),
            category: def.category,
            quantity: amount,
        },
    );
    Ok(())
}

/// Remove `amount` units of `item`. The stack is dropped when it empties.
///
/// # Errors
///
/// Returns [`AgentError::InsufficientItem`] if fewer than `amount` are held.
pub fn remove_item(stockpile: &mut Stockpile, item: &ItemId, amount: u32) -> Result<(), AgentError> {
    let current = quantity_of(stockpile, item);
    let remaining = current
        .checked_sub(amount)
        .ok_or_else(|| AgentError::InsufficientItem {
            item: item.clone(),
            requested: amount,
            available: current,
        })?;

    if remaining == 0 {
        stockpile.remove(item);
    } else if let Some(stack) = stockpile.get_mut(item) {
        stack.quantity = remaining;
    }
    Ok(())
}

/// Apply a signed change. Removals larger than the stack empty it.
///
/// Returns `true` if a removal had to be clamped at zero.
///
/// # Errors
///
/// Propagates [`add_item`] errors for positive deltas.
pub fn apply_delta(
    stockpile: &mut Stockpile,
    catalog: &Catalog,
    item: &ItemId,
    delta: i64,
) -> Result<bool, AgentError> {
    let magnitude = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
    if delta >= 0 {
        add_item(stockpile, catalog, item, magnitude)?;
        return Ok(false);
    }
    let held = quantity_of(stockpile, item);
    let taken = magnitude.min(held);
    remove_item(stockpile, item, taken)?;
    Ok(taken < magnitude)
}

/// Merge a batch of yields into the stockpile.
///
/// Returns the items that could not be stored because they are not in the
/// catalog; the rest are stored.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] on quantity overflow.
pub fn merge_yields(
    stockpile: &mut Stockpile,
    catalog: &Catalog,
    yields: &BTreeMap<ItemId, u32>,
) -> Result<Vec<ItemId>, AgentError> {
    let mut unknown = Vec::new();
    for (item, amount) in yields {
        match add_item(stockpile, catalog, item, *amount) {
            Ok(()) => {}
            Err(AgentError::UnknownItem(id)) => unknown.push(id),
            Err(e) => return Err(e),
        }
    }
    Ok(unknown)
}

/// Total units across all stacks. Returns `None` on overflow.
pub fn total_units(stockpile: &Stockpile) -> Option<u32> {
    stockpile
        .values()
        .try_fold(0_u32, |acc, s| acc.checked_add(s.quantity))
}
