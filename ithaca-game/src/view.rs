//! Read-only projection of a game for presentation layers.
use serde::{Deserialize, Serialize};

use crate::constants::{AEOLUS_MAX_STEPS, SHIPWRECK_DAMAGE};
use crate::state::{GameState, PlayerId};
use crate::tiles::{EpicKind, Tile, TileCategory};
use crate::track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardTileKind {
    Start,
    Sea,
    Epic,
    Ithaca,
}

impl From<TileCategory> for BoardTileKind {
    fn from(category: TileCategory) -> Self {
        match category {
            TileCategory::Start => Self::Start,
            TileCategory::OpenSea => Self::Sea,
            TileCategory::Epic => Self::Epic,
            TileCategory::Terminal => Self::Ithaca,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTileView {
    pub id: String,
    pub index: usize,
    pub kind: BoardTileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic_name: Option<String>,
    /// Seats standing on this tile.
    pub players: Vec<PlayerId>,
}

/// The encounter under the current player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEpic {
    pub kind: EpicKind,
    pub name: String,
    pub description: String,
    pub requires_choice: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_aeolus_moves: Vec<u8>,
}

/// A sirens peek reveal for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicPreview {
    pub player: PlayerId,
    pub id: String,
    pub index: usize,
    pub kind: EpicKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub winner: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub current_player: PlayerId,
    pub actions_remaining: u8,
    /// Damage by seat.
    pub damage_by_player: Vec<u8>,
    pub tiles: Vec<BoardTileView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_epic: Option<ActiveEpic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upcoming_epic_peek: Vec<EpicPreview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_over: Option<GameOver>,
}

/// Build the view for `state`. The state itself is never changed; peeks
/// that need more track are computed on a private copy.
#[must_use]
pub fn project_view(state: &GameState) -> GameView {
    let tiles = state
        .path
        .iter()
        .enumerate()
        .map(|(index, tile)| BoardTileView {
            id: tile.id.clone(),
            index,
            kind: tile.category.into(),
            epic_name: tile.epic.map(|kind| kind.name().to_string()),
            players: occupants(state, index),
        })
        .collect();

    let game_over = state
        .winner
        .filter(|_| state.game_ended)
        .map(|winner| GameOver { winner });

    GameView {
        current_player: state.current_player,
        actions_remaining: state.actions_remaining,
        damage_by_player: state.players.iter().map(|p| p.damage).collect(),
        tiles,
        active_epic: active_epic(state),
        upcoming_epic_peek: upcoming_peeks(state),
        game_over,
    }
}

/// Aeolus step counts that cannot sink a ship carrying `damage`.
#[must_use]
pub fn allowed_aeolus_moves(damage: u8) -> Vec<u8> {
    let safe = (SHIPWRECK_DAMAGE - 1)
        .saturating_sub(damage)
        .min(AEOLUS_MAX_STEPS);
    (0..=safe).collect()
}

/// Active encounter for the current player, if they stand on an epic tile.
#[must_use]
pub fn active_epic(state: &GameState) -> Option<ActiveEpic> {
    let player = state.current()?;
    let tile = state.path.get(player.position)?;
    if !tile.is_epic_or_terminal() {
        return None;
    }
    let kind = tile.epic?;
    let requires_choice = kind == EpicKind::Aeolus && player.aeolus_choice_pending;
    Some(ActiveEpic {
        kind,
        name: kind.name().to_string(),
        description: kind.description().to_string(),
        requires_choice,
        allowed_aeolus_moves: if requires_choice {
            allowed_aeolus_moves(player.damage)
        } else {
            Vec::new()
        },
    })
}

fn occupants(state: &GameState, index: usize) -> Vec<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| p.position == index)
        .map(|p| p.id)
        .collect()
}

fn upcoming_peeks(state: &GameState) -> Vec<EpicPreview> {
    let owed: Vec<(PlayerId, usize)> = state
        .players
        .iter()
        .filter(|p| p.sirens_peek_pending)
        .map(|p| (p.id, p.position))
        .collect();
    if owed.is_empty() {
        return Vec::new();
    }
    let mut scratch = state.clone();
    owed.into_iter()
        .filter_map(|(player, position)| {
            let index = track::find_next_epic(&mut scratch, position)?;
            preview(player, index, scratch.path.get(index)?)
        })
        .collect()
}

fn preview(player: PlayerId, index: usize, tile: &Tile) -> Option<EpicPreview> {
    let kind = tile.epic?;
    Some(EpicPreview {
        player,
        id: tile.id.clone(),
        index,
        kind,
        name: kind.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_game;

    #[test]
    fn aeolus_choices_shrink_with_damage() {
        assert_eq!(allowed_aeolus_moves(0), vec![0, 1, 2]);
        assert_eq!(allowed_aeolus_moves(1), vec![0, 1]);
        assert_eq!(allowed_aeolus_moves(2), vec![0]);
        assert_eq!(allowed_aeolus_moves(3), vec![0]);
    }

    #[test]
    fn fresh_game_view() {
        let state = create_game(3, 10).unwrap();
        let view = project_view(&state);
        assert_eq!(view.current_player, 0);
        assert_eq!(view.damage_by_player, vec![0, 0, 0]);
        assert_eq!(view.tiles.len(), 1);
        assert_eq!(view.tiles[0].kind, BoardTileKind::Start);
        assert_eq!(view.tiles[0].players, vec![0, 1, 2]);
        assert!(view.active_epic.is_none());
        assert!(view.upcoming_epic_peek.is_empty());
        assert!(view.game_over.is_none());
    }

    #[test]
    fn active_epic_on_aeolus_offers_choices() {
        let mut state = create_game(2, 10).unwrap();
        track::ensure_index(&mut state, 15);
        state.update_player(0, |p| {
            p.position = 15;
            p.damage = 1;
        });
        assert!(!project_view(&state).active_epic.unwrap().requires_choice);

        state.update_player(0, |p| p.aeolus_choice_pending = true);
        let epic = project_view(&state).active_epic.unwrap();
        assert_eq!(epic.kind, EpicKind::Aeolus);
        assert!(epic.requires_choice);
        assert_eq!(epic.allowed_aeolus_moves, vec![0, 1]);
        assert_eq!(epic.name, "Aeolus");
    }

    #[test]
    fn peek_preview_does_not_grow_the_real_track() {
        let mut state = create_game(2, 10).unwrap();
        state.update_player(1, |p| p.sirens_peek_pending = true);
        let view = project_view(&state);
        assert_eq!(view.upcoming_epic_peek.len(), 1);
        let preview = &view.upcoming_epic_peek[0];
        assert_eq!(preview.player, 1);
        assert_eq!(preview.index, 3);
        assert_eq!(preview.kind, EpicKind::SafeHarbor);
        assert_eq!(state.path.len(), 1);
        assert_eq!(view.tiles.len(), 1);
    }

    #[test]
    fn finished_game_reports_the_winner() {
        let mut state = create_game(2, 10).unwrap();
        state.game_ended = true;
        state.winner = Some(1);
        assert_eq!(project_view(&state).game_over, Some(GameOver { winner: 1 }));
    }
}
