//! The colony snapshot.
//!
//! [`GameState`] is everything that changes from turn to turn. The
//! orchestrator clones it at the start of a turn, mutates the clone, and
//! swaps it in only when the whole turn succeeded. Static content lives in
//! the [`Catalog`] and is never part of the snapshot.

use std::collections::{BTreeMap, BTreeSet};

use colony_agents::inventory::{self, Stockpile};
use colony_agents::AgentError;
use colony_types::{BuildingId, ItemId, LocationId, Pawn, PawnId, ResearchId, WorkAssignment};
use colony_world::{Catalog, LocationState, WorldError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::TurnClock;
use crate::queue::{CountdownQueue, CraftOrder};

/// Errors from direct snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The building is not in the catalog.
    #[error("unknown building: {0}")]
    UnknownBuilding(BuildingId),

    /// The item is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// The research project is not in the catalog.
    #[error("unknown research project: {0}")]
    UnknownResearch(ResearchId),

    /// The research project is already completed.
    #[error("research already completed: {0}")]
    ResearchCompleted(ResearchId),

    /// The pawn is not part of the colony.
    #[error("unknown pawn: {0}")]
    UnknownPawn(PawnId),

    /// Location lookup failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Stockpile update failed.
    #[error("stockpile error: {source}")]
    Stockpile {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

/// Payloads completed by one [`GameState::advance_queues`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCompletions {
    /// Buildings finished (one entry per copy).
    pub buildings: Vec<BuildingId>,
    /// Craft orders delivered to the stockpile.
    pub crafted: Vec<CraftOrder>,
    /// Research projects completed.
    pub research: Vec<ResearchId>,
}

impl QueueCompletions {
    /// Whether nothing completed.
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.crafted.is_empty() && self.research.is_empty()
    }
}

/// Mutable colony state for one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Turn counter and season cycle.
    pub clock: TurnClock,
    /// Every colonist, by id.
    pub pawns: BTreeMap<PawnId, Pawn>,
    /// Work assignments, one per pawn at most.
    pub assignments: BTreeMap<PawnId, WorkAssignment>,
    /// Runtime state of every catalog location.
    pub locations: BTreeMap<LocationId, LocationState>,
    /// Constructed building counts.
    pub structures: BTreeMap<BuildingId, u32>,
    /// Shared colony stockpile.
    pub stockpile: Stockpile,
    /// Buildings under construction.
    pub build_queue: CountdownQueue<BuildingId>,
    /// Items being crafted.
    pub craft_queue: CountdownQueue<CraftOrder>,
    /// Research in progress.
    pub research_queue: CountdownQueue<ResearchId>,
    /// Finished research projects.
    pub completed_research: BTreeSet<ResearchId>,
}

impl GameState {
    /// A fresh colony: no pawns, an empty stockpile, and every catalog
    /// location at its starting discovery and resource levels.
    pub fn new(catalog: &Catalog, clock: TurnClock) -> Self {
        let locations = catalog
            .locations()
            .iter()
            .map(|def| (def.id.clone(), LocationState::from_def(def)))
            .collect();
        Self {
            clock,
            pawns: BTreeMap::new(),
            assignments: BTreeMap::new(),
            locations,
            structures: BTreeMap::new(),
            stockpile: Stockpile::new(),
            build_queue: CountdownQueue::new(),
            craft_queue: CountdownQueue::new(),
            research_queue: CountdownQueue::new(),
            completed_research: BTreeSet::new(),
        }
    }

    /// The current turn number.
    pub const fn turn(&self) -> u64 {
        self.clock.turn()
    }

    /// Add a pawn to the colony and return its id.
    pub fn add_pawn(&mut self, pawn: Pawn) -> PawnId {
        let id = pawn.id;
        debug!(pawn = %id, name = %pawn.name, "pawn joined colony");
        self.pawns.insert(id, pawn);
        id
    }

    /// Look up a pawn.
    pub fn pawn(&self, id: &PawnId) -> Option<&Pawn> {
        self.pawns.get(id)
    }

    /// Replace a pawn's work assignment.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownPawn`] if the pawn does not exist.
    pub fn set_assignment(
        &mut self,
        pawn: PawnId,
        assignment: WorkAssignment,
    ) -> Result<(), StateError> {
        if !self.pawns.contains_key(&pawn) {
            return Err(StateError::UnknownPawn(pawn));
        }
        self.assignments.insert(pawn, assignment);
        Ok(())
    }

    /// Add stock directly (starting supplies, scripted gifts).
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Stockpile`] if the item is unknown.
    pub fn stock(&mut self, catalog: &Catalog, item: &ItemId, amount: u32) -> Result<(), StateError> {
        inventory::add_item(&mut self.stockpile, catalog, item, amount)?;
        Ok(())
    }

    /// Mark a location as discovered. Returns `true` if it was hidden.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::World`] if the location does not exist.
    pub fn discover_location(&mut self, id: &LocationId) -> Result<bool, StateError> {
        let state = self
            .locations
            .get_mut(id)
            .ok_or_else(|| WorldError::LocationNotFound(id.clone()))?;
        let newly = state.discover();
        if newly {
            info!(location = %id, "location discovered");
        }
        Ok(newly)
    }

    /// Start construction of one building.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownBuilding`] if the catalog lacks it.
    pub fn enqueue_building(&mut self, catalog: &Catalog, id: &BuildingId) -> Result<(), StateError> {
        let def = catalog
            .building(id)
            .ok_or_else(|| StateError::UnknownBuilding(id.clone()))?;
        self.build_queue.push(id.clone(), def.build_turns);
        debug!(building = %id, turns = def.build_turns, "construction queued");
        Ok(())
    }

    /// Start a craft order.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownItem`] if the catalog lacks the item.
    pub fn enqueue_craft(
        &mut self,
        catalog: &Catalog,
        item: &ItemId,
        quantity: u32,
        turns: u32,
    ) -> Result<(), StateError> {
        if catalog.item(item).is_none() {
            return Err(StateError::UnknownItem(item.clone()));
        }
        self.craft_queue.push(
            CraftOrder {
                item: item.clone(),
                quantity,
            },
            turns,
        );
        debug!(item = %item, quantity, turns, "craft order queued");
        Ok(())
    }

    /// Start a research project.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownResearch`] if the catalog lacks it, or
    /// [`StateError::ResearchCompleted`] if it is already done.
    pub fn enqueue_research(&mut self, catalog: &Catalog, id: &ResearchId) -> Result<(), StateError> {
        let def = catalog
            .research(id)
            .ok_or_else(|| StateError::UnknownResearch(id.clone()))?;
        if self.completed_research.contains(id) {
            return Err(StateError::ResearchCompleted(id.clone()));
        }
        self.research_queue.push(id.clone(), def.turns);
        debug!(research = %id, turns = def.turns, "research queued");
        Ok(())
    }

    /// Count down every queue by one turn and apply completion effects:
    /// a finished building adds one to its structure count, a finished
    /// craft order adds its quantity to the stockpile, and finished research
    /// is marked completed.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if a count overflows or a crafted item cannot
    /// be stored.
    pub fn advance_queues(&mut self, catalog: &Catalog) -> Result<QueueCompletions, StateError> {
        let completions = QueueCompletions {
            buildings: self.build_queue.advance(),
            crafted: self.craft_queue.advance(),
            research: self.research_queue.advance(),
        };

        for building in &completions.buildings {
            let count = self.structures.entry(building.clone()).or_insert(0);
            *count = count
                .checked_add(1)
                .ok_or_else(|| AgentError::ArithmeticOverflow {
                    context: format!("structure count overflow for {building}"),
                })?;
            info!(building = %building, count = *count, "construction completed");
        }
        for order in &completions.crafted {
            inventory::add_item(&mut self.stockpile, catalog, &order.item, order.quantity)?;
            info!(item = %order.item, quantity = order.quantity, "craft order completed");
        }
        for research in &completions.research {
            self.completed_research.insert(research.clone());
            info!(research = %research, "research completed");
        }

        Ok(completions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::Stats;
    use colony_world::create_starting_catalog;

    use super::*;
    use crate::config::TimeConfig;

    fn fresh() -> (Catalog, GameState) {
        let catalog = create_starting_catalog().unwrap();
        let clock = TurnClock::new(&TimeConfig::default()).unwrap();
        let state = GameState::new(&catalog, clock);
        (catalog, state)
    }

    #[test]
    fn new_state_mirrors_catalog_locations() {
        let (catalog, state) = fresh();
        assert_eq!(state.locations.len(), catalog.locations().len());
        assert!(state.locations.get("meadow").unwrap().discovered);
        assert!(!state.locations.get("quarry").unwrap().discovered);
        assert_eq!(state.turn(), 0);
    }

    #[test]
    fn discovery_is_idempotent() {
        let (_, mut state) = fresh();
        let quarry = LocationId::from("quarry");
        assert!(state.discover_location(&quarry).unwrap());
        assert!(!state.discover_location(&quarry).unwrap());
        assert!(matches!(
            state.discover_location(&LocationId::from("moon")),
            Err(StateError::World { .. })
        ));
    }

    #[test]
    fn completed_queues_apply_effects() {
        let (catalog, mut state) = fresh();
        state.build_queue.push(BuildingId::from("workshop"), 1);
        state.build_queue.push(BuildingId::from("workshop"), 1);
        state.enqueue_craft(&catalog, &ItemId::from("bread"), 4, 1).unwrap();
        state.research_queue.push(ResearchId::from("masonry"), 1);

        let done = state.advance_queues(&catalog).unwrap();
        assert_eq!(done.buildings.len(), 2);
        assert_eq!(state.structures.get("workshop").copied(), Some(2));
        assert_eq!(inventory::quantity_of(&state.stockpile, &ItemId::from("bread")), 4);
        assert!(state.completed_research.contains("masonry"));
        assert!(state.advance_queues(&catalog).unwrap().is_empty());
    }

    #[test]
    fn enqueue_uses_catalog_durations() {
        let (catalog, mut state) = fresh();
        state.enqueue_research(&catalog, &ResearchId::from("metallurgy")).unwrap();
        assert_eq!(
            state.research_queue.entries().first().map(|e| e.turns_remaining),
            Some(12)
        );
        assert!(matches!(
            state.enqueue_building(&catalog, &BuildingId::from("castle")),
            Err(StateError::UnknownBuilding(_))
        ));
        state.completed_research.insert(ResearchId::from("masonry"));
        assert!(matches!(
            state.enqueue_research(&catalog, &ResearchId::from("masonry")),
            Err(StateError::ResearchCompleted(_))
        ));
    }

    #[test]
    fn assignment_requires_known_pawn() {
        let (_, mut state) = fresh();
        let stranger = Pawn::new("Stranger", Stats::default());
        assert!(state.set_assignment(stranger.id, WorkAssignment::default()).is_err());
        let id = state.add_pawn(stranger);
        assert!(state.set_assignment(id, WorkAssignment::default()).is_ok());
    }
}
