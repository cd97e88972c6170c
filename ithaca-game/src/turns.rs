use crate::constants::LOG_TARGET_RULES;
use crate::deck;
use crate::state::GameState;

/// Result of [`begin_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnStart {
    pub state: GameState,
    /// The seated player sat this turn out; the seat has already moved on.
    pub skipped: bool,
}

/// Open the current player's turn.
///
/// A player who must skip, or who is stuck at the cyclops, loses the turn:
/// the skip flag clears (the stuck flag stays) and play passes on with an
/// empty budget. Otherwise the budget refills and a pending Circe jump
/// carries the player straight to the next epic tile, which then resolves.
#[must_use]
pub fn begin_turn(state: &GameState) -> TurnStart {
    let unchanged = || TurnStart {
        state: state.clone(),
        skipped: false,
    };
    if state.game_ended {
        return unchanged();
    }
    let Some(current) = state.current().cloned() else {
        return unchanged();
    };
    let mut working = state.clone();
    if current.sits_out() {
        working.update_player(current.id, |p| p.skip_next_turn = false);
        working.current_player = working.next_seat();
        working.actions_remaining = 0;
        log::debug!(target: LOG_TARGET_RULES, "player {} sits out a turn", current.id);
        return TurnStart {
            state: working,
            skipped: true,
        };
    }

    working.refill_budget();
    working.update_player(current.id, |p| p.skip_next_turn = false);
    if current.circe_jump_pending {
        working.update_player(current.id, |p| p.circe_jump_pending = false);
        log::debug!(target: LOG_TARGET_RULES, "player {} leaves Circe's island", current.id);
        deck::teleport_to_next_epic(&mut working, current.id, true);
    }
    TurnStart {
        state: working,
        skipped: false,
    }
}

/// Pass play to the next seat with an empty budget.
#[must_use]
pub fn advance_turn(state: &GameState) -> GameState {
    let mut working = state.clone();
    if let Some(id) = working.current_id() {
        working.update_player(id, |p| p.aeolus_choice_pending = false);
    }
    working.current_player = working.next_seat();
    working.actions_remaining = 0;
    working
}
