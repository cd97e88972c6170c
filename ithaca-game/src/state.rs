use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::constants::{ACTION_BUDGET, LEHMER_MODULUS, MAX_PLAYERS, MIN_PLAYERS, SHIPWRECK_DAMAGE};
use crate::deck::{SeaCard, shuffled_base_deck};
use crate::rng::DeterministicRng;
use crate::tiles::{Tile, epic_supply, initial_path, open_sea_supply};

/// Seat index of a player; ids are assigned `0..player_count` in seating order.
pub type PlayerId = usize;

/// Errors raised when a game cannot be constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player count {count} is outside the supported range {min}..={max}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },
    #[error("seed must be a positive integer below {max} (got {seed})")]
    InvalidSeed { seed: u64, max: u64 },
}

/// Per-player record. Mutated only by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: usize,
    pub damage: u8,
    #[serde(default)]
    pub skip_next_turn: bool,
    #[serde(default)]
    pub stuck_at_cyclops: bool,
    /// Sirens demand the whole budget be spent before the turn may end.
    #[serde(default)]
    pub sirens_active: bool,
    /// One look at the next epic tile, earned by outlasting the sirens.
    #[serde(default)]
    pub sirens_peek_pending: bool,
    #[serde(default)]
    pub circe_jump_pending: bool,
    /// Landed on Aeolus this turn and has not yet chosen how far to sail.
    #[serde(default)]
    pub aeolus_choice_pending: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_wrecked(&self) -> bool {
        self.damage >= SHIPWRECK_DAMAGE
    }

    /// Whether `begin_turn` will pass over this player.
    #[must_use]
    pub const fn sits_out(&self) -> bool {
        self.skip_next_turn || self.stuck_at_cyclops
    }
}

/// The whole simulation as a single value.
///
/// Public operations never mutate a `GameState` they are handed; they clone
/// it, work on the copy, and return the copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    pub current_player: usize,
    pub actions_remaining: u8,
    pub path: Vec<Tile>,
    pub open_sea_supply: VecDeque<Tile>,
    pub epic_supply: VecDeque<Tile>,
    pub epic_clock: u8,
    pub sea_deck: VecDeque<SeaCard>,
    pub sea_discard: Vec<SeaCard>,
    pub rng: DeterministicRng,
    pub game_ended: bool,
    pub winner: Option<PlayerId>,
}

/// Construct a fresh game for `player_count` players.
///
/// # Errors
///
/// Returns [`GameError::InvalidPlayerCount`] unless `2 <= player_count <= 4`.
pub fn create_game(player_count: usize, seed: u64) -> Result<GameState, GameError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(GameError::InvalidPlayerCount {
            count: player_count,
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        });
    }
    Ok(GameState::new_unchecked(player_count, seed))
}

impl GameState {
    /// Build a game without validating the table size.
    pub(crate) fn new_unchecked(player_count: usize, seed: u64) -> Self {
        let mut rng = DeterministicRng::seeded(seed);
        let sea_deck = shuffled_base_deck(&mut rng);
        log::debug!(
            target: crate::constants::LOG_TARGET_RULES,
            "new game: {player_count} players, seed {seed}"
        );
        Self {
            players: (0..player_count).map(PlayerState::new).collect(),
            current_player: 0,
            actions_remaining: 0,
            path: initial_path(),
            open_sea_supply: open_sea_supply(),
            epic_supply: epic_supply(),
            epic_clock: 0,
            sea_deck,
            sea_discard: Vec::new(),
            rng,
            game_ended: false,
            winner: None,
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|player| player.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    /// Apply `update` to the player with `id`, if seated.
    pub(crate) fn update_player(&mut self, id: PlayerId, update: impl FnOnce(&mut PlayerState)) {
        if let Some(player) = self.player_mut(id) {
            update(player);
        }
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<&PlayerState> {
        self.players.get(self.current_player)
    }

    #[must_use]
    pub fn current_id(&self) -> Option<PlayerId> {
        self.current().map(|player| player.id)
    }

    /// Tile under `id`, if the player exists.
    #[must_use]
    pub fn tile_under(&self, id: PlayerId) -> Option<&Tile> {
        self.player(id)
            .and_then(|player| self.path.get(player.position))
    }

    /// Seat that follows the current one, wrapping around the table.
    #[must_use]
    pub fn next_seat(&self) -> usize {
        if self.players.is_empty() {
            return 0;
        }
        (self.current_player + 1) % self.players.len()
    }

    /// Whether a draw is possible from either pile.
    #[must_use]
    pub fn can_draw(&self) -> bool {
        !self.sea_deck.is_empty() || !self.sea_discard.is_empty()
    }

    /// Cards across the draw and discard piles.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.sea_deck.len() + self.sea_discard.len()
    }

    /// Reset the budget when `id` holds the turn.
    pub(crate) fn end_turn_for(&mut self, id: PlayerId) {
        if self.current_id() == Some(id) {
            self.actions_remaining = 0;
        }
    }

    /// Restore the full budget for a new turn.
    pub(crate) fn refill_budget(&mut self) {
        self.actions_remaining = ACTION_BUDGET;
    }
}

/// Validate a seed for use in configuration files.
///
/// # Errors
///
/// Returns [`GameError::InvalidSeed`] for zero or seeds at or above `2^31 - 1`.
pub const fn validate_seed(seed: u64) -> Result<u64, GameError> {
    if seed == 0 || seed >= LEHMER_MODULUS {
        return Err(GameError::InvalidSeed {
            seed,
            max: LEHMER_MODULUS,
        });
    }
    Ok(seed)
}
