//! Looking ahead along the track without moving anyone.
use crate::state::{GameState, PlayerId};
use crate::tiles::Tile;
use crate::track;

/// The next epic or terminal tile strictly ahead of the current player,
/// along with the state after any track growth the search needed.
#[must_use]
pub fn peek_next_epic(state: &GameState) -> (Option<Tile>, GameState) {
    let mut working = state.clone();
    let tile = state
        .current_id()
        .and_then(|id| next_epic_ahead(&mut working, id));
    (tile, working)
}

/// Reveal the next epic for the first seated player owed a sirens peek and
/// clear that player's flag.
#[must_use]
pub fn resolve_sirens_peek(state: &GameState) -> (GameState, Option<Tile>) {
    match state.players.iter().find(|p| p.sirens_peek_pending) {
        Some(player) => resolve_sirens_peek_for(state, player.id),
        None => (state.clone(), None),
    }
}

/// Like [`resolve_sirens_peek`] for a specific player; a player without a
/// pending peek gets `None` and an unchanged state.
#[must_use]
pub fn resolve_sirens_peek_for(state: &GameState, player: PlayerId) -> (GameState, Option<Tile>) {
    if !state.player(player).is_some_and(|p| p.sirens_peek_pending) {
        return (state.clone(), None);
    }
    let mut working = state.clone();
    let tile = next_epic_ahead(&mut working, player);
    working.update_player(player, |p| p.sirens_peek_pending = false);
    (working, tile)
}

fn next_epic_ahead(working: &mut GameState, player: PlayerId) -> Option<Tile> {
    let position = working.player(player)?.position;
    let index = track::find_next_epic(working, position)?;
    working.path.get(index).cloned()
}
