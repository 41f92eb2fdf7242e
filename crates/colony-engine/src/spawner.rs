//! Pawn spawner for seeding the colony with its founding population.
//!
//! At startup the spawner creates `initial_pawns` pawns with unique names,
//! random attributes, and a few random traits drawn from the catalog. The
//! generator is seeded from `world.seed`, so the same config always yields
//! the same founders (pawn ids are still fresh UUIDs).

use colony_core::config::WorldConfig;
use colony_types::{Pawn, Stats, TraitId};
use colony_world::Catalog;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::EngineError;

/// Lowest attribute value a founder can roll.
const STAT_MIN: u32 = 6;

/// Highest attribute value a founder can roll.
const STAT_MAX: u32 = 14;

/// Most traits a founder can start with.
const MAX_TRAITS: usize = 2;

// -----------------------------------------------------------------------
// Name pool
// -----------------------------------------------------------------------

/// Built-in pool of pawn names. Founders draw from it without replacement.
const NAME_POOL: &[&str] = &[
    "Ada", "Bram", "Cora", "Dov", "Edda", "Finn", "Greta", "Hal", "Ilse", "Jory", "Kit",
    "Lena", "Milo", "Nell", "Otto", "Pia", "Quin", "Rafe", "Sune", "Tova", "Ulf", "Vera",
    "Wren", "Yara", "Zeno", "Arne", "Bea", "Cass", "Dag", "Elin",
];

// -----------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------

/// Create the founding pawns described by the world config.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if more pawns are requested than the
/// name pool can supply.
pub fn spawn_pawns(world: &WorldConfig, catalog: &Catalog) -> Result<Vec<Pawn>, EngineError> {
    let count = usize::try_from(world.initial_pawns).map_err(|e| EngineError::Spawner {
        message: format!("initial pawn count does not fit in memory: {e}"),
    })?;
    if count > NAME_POOL.len() {
        return Err(EngineError::Spawner {
            message: format!(
                "requested {count} pawns but name pool only has {} entries",
                NAME_POOL.len()
            ),
        });
    }

    let mut rng = SmallRng::seed_from_u64(world.seed);
    let mut names: Vec<&str> = NAME_POOL.to_vec();
    let trait_ids: Vec<TraitId> = catalog.traits().map(|t| t.id.clone()).collect();

    let mut pawns = Vec::with_capacity(count);
    for _ in 0..count {
        let name = draw(&mut rng, &mut names).ok_or_else(|| EngineError::Spawner {
            message: String::from("name pool exhausted"),
        })?;
        let mut pawn = Pawn::new(name, random_stats(&mut rng));
        pawn.traits = random_traits(&mut rng, &trait_ids);

        info!(
            pawn = %pawn.id,
            name = %pawn.name,
            traits = ?pawn.traits,
            "spawned founder"
        );
        pawns.push(pawn);
    }

    info!(colony = %world.name, count = pawns.len(), seed = world.seed, "founders spawned");
    Ok(pawns)
}

/// Roll every attribute uniformly in `STAT_MIN..=STAT_MAX`.
fn random_stats(rng: &mut impl Rng) -> Stats {
    Stats {
        strength: rng.random_range(STAT_MIN..=STAT_MAX),
        dexterity: rng.random_range(STAT_MIN..=STAT_MAX),
        endurance: rng.random_range(STAT_MIN..=STAT_MAX),
        intelligence: rng.random_range(STAT_MIN..=STAT_MAX),
        perception: rng.random_range(STAT_MIN..=STAT_MAX),
        charisma: rng.random_range(STAT_MIN..=STAT_MAX),
    }
}

/// Pick up to [`MAX_TRAITS`] distinct traits.
fn random_traits(rng: &mut impl Rng, available: &[TraitId]) -> Vec<TraitId> {
    let mut pool = available.to_vec();
    let wanted = rng.random_range(0..=MAX_TRAITS.min(pool.len()));
    let mut traits = Vec::with_capacity(wanted);
    for _ in 0..wanted {
        if let Some(id) = draw(rng, &mut pool) {
            traits.push(id);
        }
    }
    traits.sort();
    traits
}

/// Remove and return a random element.
fn draw<T>(rng: &mut impl Rng, pool: &mut Vec<T>) -> Option<T> {
    if pool.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..pool.len());
    Some(pool.swap_remove(idx))
}
