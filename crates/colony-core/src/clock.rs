//! Turn clock and season derivation.
//!
//! The clock is the single source of truth for time in the colony. The
//! season is always derived from the turn counter, never stored, so a
//! restored snapshot can never disagree with itself.

use colony_types::Season;
use serde::{Deserialize, Serialize};

use crate::config::TimeConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Turn counter would overflow.
    #[error("turn counter overflow: cannot advance beyond u64::MAX")]
    TurnOverflow,

    /// Invalid time configuration (e.g. zero turns per season).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Turn counter with a seasonal cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    /// Current turn (0 before the first turn has run).
    turn: u64,
    /// Number of turns per season.
    ticks_per_season: u64,
    /// Ordered seasons forming the annual cycle.
    seasons: Vec<Season>,
}

impl TurnClock {
    /// Create a clock at turn 0 from a time configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_season` is 0,
    /// a season name is unknown, or the season list is empty.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        let seasons = parse_seasons(&config.seasons)?;
        Self::from_parts(0, config.ticks_per_season, seasons)
    }

    /// Create a clock from explicit parameters (useful for testing and
    /// state restoration).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_season` is 0
    /// or the season list is empty.
    pub fn from_parts(
        turn: u64,
        ticks_per_season: u64,
        seasons: Vec<Season>,
    ) -> Result<Self, ClockError> {
        if ticks_per_season == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "ticks_per_season must be at least 1".to_owned(),
            });
        }
        if seasons.is_empty() {
            return Err(ClockError::InvalidConfig {
                reason: "at least one season must be configured".to_owned(),
            });
        }
        Ok(Self {
            turn,
            ticks_per_season,
            seasons,
        })
    }

    /// Advance the clock by one turn. Returns the new turn number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TurnOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.turn = self.turn.checked_add(1).ok_or(ClockError::TurnOverflow)?;
        Ok(self.turn)
    }

    /// Return the current turn number.
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Return the configured number of turns per season.
    pub const fn ticks_per_season(&self) -> u64 {
        self.ticks_per_season
    }

    /// Compute the current season: `(turn / ticks_per_season) % seasons`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the clock was deserialized
    /// with an empty season list or zero season length.
    pub fn season(&self) -> Result<Season, ClockError> {
        let season_count = u64::try_from(self.seasons.len()).map_err(|_err| {
            ClockError::InvalidConfig {
                reason: "season count exceeds u64 range".to_owned(),
            }
        })?;
        let index = self
            .turn
            .checked_div(self.ticks_per_season)
            .and_then(|raw| raw.checked_rem(season_count))
            .ok_or_else(|| ClockError::InvalidConfig {
                reason: "season list or length is zero".to_owned(),
            })?;
        let idx = usize::try_from(index).map_err(|_err| ClockError::InvalidConfig {
            reason: "season index exceeds usize range".to_owned(),
        })?;
        self.seasons
            .get(idx)
            .copied()
            .ok_or_else(|| ClockError::InvalidConfig {
                reason: format!("season index {idx} out of bounds"),
            })
    }

    /// Return the number of turns until the next season transition.
    pub fn turns_until_season_change(&self) -> u64 {
        let within = self.turn.checked_rem(self.ticks_per_season).unwrap_or(0);
        self.ticks_per_season.saturating_sub(within)
    }

    /// Return the complete season list.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }
}

/// Parse season names into typed [`Season`] values.
///
/// # Errors
///
/// Returns [`ClockError::InvalidConfig`] for an unknown name.
fn parse_seasons(names: &[String]) -> Result<Vec<Season>, ClockError> {
    names
        .iter()
        .map(|name| match name.to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            other => Err(ClockError::InvalidConfig {
                reason: format!("unknown season: {other}"),
            }),
        })
        .collect()
}
