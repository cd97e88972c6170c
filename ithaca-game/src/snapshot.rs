//! Flat, versioned persistence records for [`GameState`].
//!
//! The generator is captured at its current stream position, so a restored
//! game draws exactly the cards the saved game would have drawn next.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::constants::{
    ACTION_BUDGET, EPIC_CLOCK_PERIOD, LEHMER_MODULUS, MAX_PLAYERS, MIN_PLAYERS, OPEN_SEA_SUPPLY,
    SEA_DECK_SIZE, SHIPWRECK_DAMAGE, SNAPSHOT_VERSION,
};
use crate::deck::SeaCard;
use crate::rng::{DeterministicRng, RngOrigin};
use crate::state::{GameState, PlayerId, PlayerState};
use crate::tiles::{EpicKind, Tile};

/// Reasons a snapshot cannot become a live game.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error(
        "player count {count} is outside the supported range {min}..={max}",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    PlayerCount { count: usize },
    #[error("player at seat {seat} carries id {id}")]
    SeatMismatch { seat: usize, id: PlayerId },
    #[error("sea cards must total {expected} across both piles (got {found})")]
    CardCount { found: usize, expected: usize },
    #[error("sea card {id} appears more than once")]
    DuplicateCard { id: String },
    #[error("track tiles must total {expected} across path and supplies (got {found})")]
    TileCount { found: usize, expected: usize },
    #[error("{field} must be at most {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        max: usize,
        value: usize,
    },
    #[error("player {player} is at position {position} beyond a path of {path_len} tiles")]
    PositionOffTrack {
        player: PlayerId,
        position: usize,
        path_len: usize,
    },
    #[error("generator state {state} is outside 1..{modulus}")]
    RngState { state: u64, modulus: u64 },
    #[error("winner {winner:?} is inconsistent with game_ended = {game_ended}")]
    Winner {
        winner: Option<PlayerId>,
        game_ended: bool,
    },
}

/// Generator position as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngSnapshot {
    pub origin: RngOrigin,
    pub state: u64,
    #[serde(default)]
    pub draws: u64,
}

/// Field-for-field mirror of [`GameState`] with a format version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub players: Vec<PlayerState>,
    pub current_player: usize,
    pub actions_remaining: u8,
    pub path: Vec<Tile>,
    pub open_sea_supply: Vec<Tile>,
    pub epic_supply: Vec<Tile>,
    pub epic_clock: u8,
    pub sea_deck: Vec<SeaCard>,
    pub sea_discard: Vec<SeaCard>,
    pub rng: RngSnapshot,
    pub game_ended: bool,
    #[serde(default)]
    pub winner: Option<PlayerId>,
}

impl GameSnapshot {
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            players: state.players.clone(),
            current_player: state.current_player,
            actions_remaining: state.actions_remaining,
            path: state.path.clone(),
            open_sea_supply: state.open_sea_supply.iter().cloned().collect(),
            epic_supply: state.epic_supply.iter().cloned().collect(),
            epic_clock: state.epic_clock,
            sea_deck: state.sea_deck.iter().cloned().collect(),
            sea_discard: state.sea_discard.clone(),
            rng: RngSnapshot {
                origin: state.rng.origin(),
                state: state.rng.state(),
                draws: state.rng.draws(),
            },
            game_ended: state.game_ended,
            winner: state.winner,
        }
    }

    /// Rebuild a live game, checking the invariants every reachable state holds.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] for a foreign version or a broken invariant.
    pub fn restore(self) -> Result<GameState, SnapshotError> {
        self.validate()?;
        Ok(GameState {
            players: self.players,
            current_player: self.current_player,
            actions_remaining: self.actions_remaining,
            path: self.path,
            open_sea_supply: self.open_sea_supply.into(),
            epic_supply: self.epic_supply.into(),
            epic_clock: self.epic_clock,
            sea_deck: self.sea_deck.into(),
            sea_discard: self.sea_discard,
            rng: DeterministicRng::from_parts(self.rng.origin, self.rng.state, self.rng.draws),
            game_ended: self.game_ended,
            winner: self.winner,
        })
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        self.validate_players()?;
        self.validate_cards()?;
        self.validate_track()?;
        check_range("actions_remaining", usize::from(ACTION_BUDGET), self.actions_remaining.into())?;
        check_range("epic_clock", usize::from(EPIC_CLOCK_PERIOD), self.epic_clock.into())?;
        check_range("current_player", self.players.len() - 1, self.current_player)?;
        if !(1..LEHMER_MODULUS).contains(&self.rng.state) {
            return Err(SnapshotError::RngState {
                state: self.rng.state,
                modulus: LEHMER_MODULUS,
            });
        }
        let winner_seated = self.winner.is_some_and(|id| id < self.players.len());
        if self.game_ended != winner_seated || (!self.game_ended && self.winner.is_some()) {
            return Err(SnapshotError::Winner {
                winner: self.winner,
                game_ended: self.game_ended,
            });
        }
        Ok(())
    }

    fn validate_players(&self) -> Result<(), SnapshotError> {
        let count = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(SnapshotError::PlayerCount { count });
        }
        for (seat, player) in self.players.iter().enumerate() {
            if player.id != seat {
                return Err(SnapshotError::SeatMismatch { seat, id: player.id });
            }
            check_range("damage", usize::from(SHIPWRECK_DAMAGE), player.damage.into())?;
            if player.position >= self.path.len() {
                return Err(SnapshotError::PositionOffTrack {
                    player: player.id,
                    position: player.position,
                    path_len: self.path.len(),
                });
            }
        }
        Ok(())
    }

    fn validate_cards(&self) -> Result<(), SnapshotError> {
        let found = self.sea_deck.len() + self.sea_discard.len();
        if found != SEA_DECK_SIZE {
            return Err(SnapshotError::CardCount {
                found,
                expected: SEA_DECK_SIZE,
            });
        }
        let mut seen = HashSet::with_capacity(SEA_DECK_SIZE);
        for card in self.sea_deck.iter().chain(&self.sea_discard) {
            if !seen.insert(card.id.as_str()) {
                return Err(SnapshotError::DuplicateCard {
                    id: card.id.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_track(&self) -> Result<(), SnapshotError> {
        let expected = 1 + OPEN_SEA_SUPPLY + EpicKind::ALL.len();
        let found = self.path.len() + self.open_sea_supply.len() + self.epic_supply.len();
        if found != expected {
            return Err(SnapshotError::TileCount { found, expected });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, max: usize, value: usize) -> Result<(), SnapshotError> {
    if value > max {
        return Err(SnapshotError::OutOfRange { field, max, value });
    }
    Ok(())
}

/// Serialize `state` as snapshot JSON.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] if serialization fails.
pub fn to_json(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&GameSnapshot::capture(state))?)
}

/// Parse and restore snapshot JSON.
///
/// # Errors
///
/// Returns [`SnapshotError`] for malformed JSON or a snapshot that fails validation.
pub fn from_json(json: &str) -> Result<GameState, SnapshotError> {
    let snapshot: GameSnapshot = serde_json::from_str(json)?;
    snapshot.restore()
}

/// Stable 64-bit fingerprint of the full game state.
///
/// # Panics
///
/// Panics if the snapshot cannot be serialized, which plain data never triggers.
#[must_use]
pub fn state_digest(state: &GameState) -> u64 {
    let bytes = serde_json::to_vec(&GameSnapshot::capture(state))
        .unwrap_or_else(|err| panic!("snapshot serialization failed: {err}"));
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveName;
    use crate::reducer::apply_move;
    use crate::state::create_game;
    use crate::turns::begin_turn;

    fn mid_game() -> GameState {
        let mut state = begin_turn(&create_game(3, 2718).unwrap()).state;
        for name in [MoveName::DrawCard, MoveName::DrawCard, MoveName::ShortSail] {
            state = apply_move(&state, name);
        }
        state
    }

    #[test]
    fn restore_reproduces_the_state() {
        let state = mid_game();
        let json = to_json(&state).unwrap();
        let restored = from_json(&json).unwrap();
        assert_eq!(restored, state);
        assert_eq!(state_digest(&restored), state_digest(&state));
    }

    #[test]
    fn restored_game_continues_the_same_stream() {
        let mut state = mid_game();
        state.sea_discard.extend(state.sea_deck.drain(..));
        state.actions_remaining = ACTION_BUDGET;
        let restored = from_json(&to_json(&state).unwrap()).unwrap();
        let left = apply_move(&state, MoveName::DrawCard);
        let right = apply_move(&restored, MoveName::DrawCard);
        assert_eq!(left, right);
        assert_ne!(left.rng.state(), state.rng.state());
    }

    #[test]
    fn digest_tracks_any_change() {
        let state = mid_game();
        let mut moved = state.clone();
        moved.players[1].damage = 1;
        assert_ne!(state_digest(&state), state_digest(&moved));
    }

    #[test]
    fn rejects_a_foreign_version() {
        let mut snapshot = GameSnapshot::capture(&mid_game());
        snapshot.version = 99;
        assert!(matches!(
            snapshot.restore(),
            Err(SnapshotError::Version { found: 99, .. })
        ));
    }

    #[test]
    fn rejects_lost_or_duplicated_cards() {
        let mut snapshot = GameSnapshot::capture(&mid_game());
        snapshot.sea_deck.pop();
        assert!(matches!(
            snapshot.clone().restore(),
            Err(SnapshotError::CardCount { found: 49, .. })
        ));
        let copy = snapshot.sea_deck[0].clone();
        snapshot.sea_deck.push(copy);
        assert!(matches!(
            snapshot.restore(),
            Err(SnapshotError::DuplicateCard { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let base = GameSnapshot::capture(&mid_game());

        let mut budget = base.clone();
        budget.actions_remaining = 6;
        assert!(matches!(
            budget.restore(),
            Err(SnapshotError::OutOfRange {
                field: "actions_remaining",
                ..
            })
        ));

        let mut position = base.clone();
        position.players[0].position = position.path.len();
        assert!(matches!(
            position.restore(),
            Err(SnapshotError::PositionOffTrack { .. })
        ));

        let mut winner = base.clone();
        winner.winner = Some(0);
        assert!(matches!(winner.restore(), Err(SnapshotError::Winner { .. })));

        let mut seat = base;
        seat.current_player = 3;
        assert!(matches!(
            seat.restore(),
            Err(SnapshotError::OutOfRange {
                field: "current_player",
                ..
            })
        ));
    }

    #[test]
    fn rejects_generator_states_off_the_stream() {
        let base = GameSnapshot::capture(&mid_game());
        for state in [0, LEHMER_MODULUS, u64::MAX] {
            let mut corrupt = base.clone();
            corrupt.rng.state = state;
            let err = corrupt.restore().unwrap_err();
            assert!(matches!(err, SnapshotError::RngState { state: s, .. } if s == state));
        }
        let mut edge = base;
        edge.rng.state = LEHMER_MODULUS - 1;
        assert_eq!(edge.restore().unwrap().rng.state(), LEHMER_MODULUS - 1);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = from_json("{\"version\":").unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
        assert!(err.to_string().starts_with("snapshot JSON error"));
    }
}
