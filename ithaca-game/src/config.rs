use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SEED, MAX_PLAYERS, MIN_PLAYERS};
use crate::state::{GameError, GameState, create_game, validate_seed};

/// Table setup loadable from JSON; missing fields fall back to a two-player
/// game on the default seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_player_count")]
    pub player_count: usize,
    #[serde(default = "GameConfig::default_seed")]
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: Self::default_player_count(),
            seed: Self::default_seed(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub const fn default_player_count() -> usize {
        MIN_PLAYERS
    }

    #[must_use]
    pub const fn default_seed() -> u64 {
        DEFAULT_SEED
    }

    /// Load a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the table size and seed range.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] naming the first violated bound.
    pub fn validate(&self) -> Result<(), GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(GameError::InvalidPlayerCount {
                count: self.player_count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        validate_seed(self.seed)?;
        Ok(())
    }
}

/// Build a fresh game from a validated configuration.
///
/// # Errors
///
/// Returns [`GameError`] when the configuration fails validation.
pub fn create_game_with_config(config: &GameConfig) -> Result<GameState, GameError> {
    config.validate()?;
    create_game(config.player_count, config.seed)
}
