//! Mutable runtime state of a location.
//!
//! A [`LocationState`] is created from a [`LocationDef`] and carries the
//! parts that change between turns: whether the colony has discovered the
//! place, and the current amount of every resource node.

use std::collections::BTreeMap;

use colony_types::{ItemId, LocationId, ResourceNode, Season};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::LocationDef;
use crate::error::WorldError;
use crate::resource;

/// Per-turn state of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState {
    /// Catalog key of the location.
    pub id: LocationId,
    /// Whether pawns can be assigned here.
    pub discovered: bool,
    /// Resource nodes keyed by the item they yield.
    pub resources: BTreeMap<ItemId, ResourceNode>,
}

impl LocationState {
    /// Build the initial state from a catalog definition.
    pub fn from_def(def: &LocationDef) -> Self {
        Self {
            id: def.id.clone(),
            discovered: def.discovered,
            resources: def
                .resources
                .iter()
                .map(|n| (n.resource.clone(), n.clone()))
                .collect(),
        }
    }

    /// Mark the location as discovered. Returns `true` if it was hidden.
    pub const fn discover(&mut self) -> bool {
        let was_hidden = !self.discovered;
        self.discovered = true;
        was_hidden
    }

    /// Get an immutable reference to a resource node.
    pub fn get_resource(&self, resource: &ItemId) -> Option<&ResourceNode> {
        self.resources.get(resource)
    }

    /// Get a mutable reference to a resource node.
    pub fn get_resource_mut(&mut self, resource: &ItemId) -> Option<&mut ResourceNode> {
        self.resources.get_mut(resource)
    }

    /// Current amounts of every node.
    pub fn available_resources(&self) -> BTreeMap<ItemId, u32> {
        self.resources
            .iter()
            .map(|(id, node)| (id.clone(), node.current_amount))
            .collect()
    }

    /// Renew every node for one turn.
    ///
    /// Returns the units added per resource (zero entries omitted).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if renewal overflows.
    pub fn renew_all(&mut self, season: Season) -> Result<BTreeMap<ItemId, u32>, WorldError> {
        let mut added = BTreeMap::new();
        for (id, node) in &mut self.resources {
            let amount = resource::renew(node, season)?;
            if amount > 0 {
                added.insert(id.clone(), amount);
            }
        }
        if !added.is_empty() {
            debug!(location = %self.id, renewed = added.len(), "resource nodes renewed");
        }
        Ok(added)
    }

    /// Extract up to `requested` units of a resource.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ResourceNotAvailable`] if the location has no
    /// node for the resource.
    pub fn extract(&mut self, resource: &ItemId, requested: u32) -> Result<u32, WorldError> {
        let location = self.id.clone();
        let node = self
            .resources
            .get_mut(resource)
            .ok_or_else(|| WorldError::ResourceNotAvailable {
                resource: resource.clone(),
                location,
            })?;
        resource::extract(node, requested)
    }

    /// Clamp every node into its bounds. Returns the resources corrected.
    pub fn clamp_all(&mut self) -> Vec<ItemId> {
        self.resources
            .iter_mut()
            .filter_map(|(id, node)| resource::clamp(node).then(|| id.clone()))
            .collect()
    }
}
