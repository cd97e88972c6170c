//! The move reducer: budget accounting, move dispatch and legality.
use crate::constants::LOG_TARGET_RULES;
use crate::deck;
use crate::effects::{self, Direction};
use crate::moves::{MoveList, MoveName};
use crate::state::{GameState, PlayerState};

/// Apply `name` for the current player.
///
/// Illegal requests (game over, cost above the remaining budget, an unmet
/// precondition) return the state unchanged rather than an error, so callers
/// can query freely.
///
/// # Panics
///
/// Panics only on broken supply invariants; see [`crate::track`].
#[must_use]
pub fn apply_move(state: &GameState, name: MoveName) -> GameState {
    let Some(player) = playable(state, name) else {
        return state.clone();
    };
    let id = player.id;
    let mut working = state.clone();
    match name {
        MoveName::DrawCard => {
            let card = deck::draw_from(&mut working);
            deck::resolve_card(&mut working, id, &card);
            working.sea_discard.push(card);
        }
        MoveName::Repair => {
            working.update_player(id, |p| p.damage = p.damage.saturating_sub(1));
        }
        MoveName::ShortSail => {
            effects::step_player(&mut working, id, Direction::Forward);
        }
        MoveName::LongSail => {
            effects::step_player(&mut working, id, Direction::Forward);
            effects::step_player(&mut working, id, Direction::Forward);
        }
        MoveName::EndTurn => {
            working.actions_remaining = 0;
        }
    }
    working.actions_remaining = working.actions_remaining.saturating_sub(name.cost());
    settle_sirens(&mut working);
    working
}

/// The current player when `name` may be applied right now.
fn playable(state: &GameState, name: MoveName) -> Option<&PlayerState> {
    if state.game_ended || state.actions_remaining < name.cost() {
        return None;
    }
    let player = state.current()?;
    let allowed = match name {
        MoveName::DrawCard => state.can_draw(),
        MoveName::LongSail => player.damage == 0,
        MoveName::EndTurn => !(player.sirens_active && state.actions_remaining > 0),
        MoveName::Repair | MoveName::ShortSail => true,
    };
    allowed.then_some(player)
}

/// Swap the sirens obligation for a peek once the budget is spent.
fn settle_sirens(working: &mut GameState) {
    if working.actions_remaining != 0 {
        return;
    }
    let Some(id) = working.current_id() else {
        return;
    };
    let mut settled = false;
    working.update_player(id, |p| {
        if p.sirens_active {
            p.sirens_active = false;
            p.sirens_peek_pending = true;
            settled = true;
        }
    });
    if settled {
        log::debug!(target: LOG_TARGET_RULES, "player {id} outlasts the sirens");
    }
}

/// Moves the current player may make, in [`MoveName::ALL`] order.
#[must_use]
pub fn legal_moves(state: &GameState) -> MoveList {
    MoveName::ALL
        .into_iter()
        .filter(|name| playable(state, *name).is_some())
        .collect()
}
