//! Intent-level façade for presentation layers.
//!
//! Callers speak in [`UiCommand`]s; the façade maps them onto the rules
//! primitives and keeps the turn cycle moving: once an action empties the
//! budget, play passes to the next seat that can actually take a turn.
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SEED, LOG_TARGET_RULES};
use crate::effects::{EffectOptions, apply_tile_effect};
use crate::moves::{MoveList, MoveName};
use crate::peek::resolve_sirens_peek_for;
use crate::reducer::{apply_move, legal_moves};
use crate::state::{GameError, GameState, PlayerId, create_game};
use crate::tiles::EpicKind;
use crate::turns::{advance_turn, begin_turn};
use crate::view::{active_epic, allowed_aeolus_moves, project_view};

/// Core actions as presented to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoreAction {
    DrawSeaCard,
    RepairShip,
    ShortSail,
    LongSail,
    EndTurn,
}

impl CoreAction {
    #[must_use]
    pub const fn move_name(self) -> MoveName {
        match self {
            Self::DrawSeaCard => MoveName::DrawCard,
            Self::RepairShip => MoveName::Repair,
            Self::ShortSail => MoveName::ShortSail,
            Self::LongSail => MoveName::LongSail,
            Self::EndTurn => MoveName::EndTurn,
        }
    }
}

impl From<MoveName> for CoreAction {
    fn from(name: MoveName) -> Self {
        match name {
            MoveName::DrawCard => Self::DrawSeaCard,
            MoveName::Repair => Self::RepairShip,
            MoveName::ShortSail => Self::ShortSail,
            MoveName::LongSail => Self::LongSail,
            MoveName::EndTurn => Self::EndTurn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiCommand {
    StartGame {
        player_names: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    ChooseAction {
        player_id: PlayerId,
        action: CoreAction,
    },
    ResolveAeolus {
        player_id: PlayerId,
        tiles_to_move: u8,
    },
    AcknowledgeEpic {
        player_id: PlayerId,
        epic: EpicKind,
    },
}

/// Seat `player_names` at a new table and open the first playable turn.
///
/// # Errors
///
/// Returns [`GameError::InvalidPlayerCount`] for fewer than two or more than
/// four names.
pub fn init_game(player_names: &[String], seed: u64) -> Result<GameState, GameError> {
    let state = create_game(player_names.len(), seed)?;
    log::debug!(target: LOG_TARGET_RULES, "seating {}", player_names.join(", "));
    Ok(start_playable_turn(&state))
}

/// Apply one command.
///
/// Commands from the wrong seat or that the rules refuse leave the state
/// unchanged.
///
/// # Errors
///
/// Only [`UiCommand::StartGame`] can fail, with an unsupported table size.
pub fn apply_command(state: &GameState, command: &UiCommand) -> Result<GameState, GameError> {
    match command {
        UiCommand::StartGame { player_names, seed } => {
            init_game(player_names, seed.unwrap_or(DEFAULT_SEED))
        }
        UiCommand::ChooseAction { player_id, action } => {
            if state.current_id() != Some(*player_id) {
                return Ok(state.clone());
            }
            let name = action.move_name();
            if !legal_moves(state).contains(&name) {
                return Ok(state.clone());
            }
            let next = apply_move(state, name);
            if awaiting_aeolus_choice(&next) && *action != CoreAction::EndTurn {
                return Ok(next);
            }
            Ok(close_turn_if_spent(next))
        }
        UiCommand::ResolveAeolus {
            player_id,
            tiles_to_move,
        } => Ok(resolve_aeolus(state, *player_id, *tiles_to_move)),
        UiCommand::AcknowledgeEpic { player_id, epic } => {
            let (next, revealed) = resolve_sirens_peek_for(state, *player_id);
            if let Some(tile) = revealed {
                log::debug!(
                    target: LOG_TARGET_RULES,
                    "player {player_id} acknowledges {epic}; sirens reveal {}",
                    tile.id
                );
            }
            Ok(next)
        }
    }
}

/// Commands `player_id` may issue right now.
#[must_use]
pub fn legal_commands(state: &GameState, player_id: PlayerId) -> Vec<UiCommand> {
    let mut commands = Vec::new();
    if state.game_ended {
        return commands;
    }
    let view = project_view(state);
    let peek = view
        .upcoming_epic_peek
        .iter()
        .find(|preview| preview.player == player_id)
        .map(|preview| preview.kind);
    if state.current_id() != Some(player_id) {
        if let Some(epic) = peek {
            commands.push(UiCommand::AcknowledgeEpic { player_id, epic });
        }
        return commands;
    }

    let moves: MoveList = legal_moves(state);
    commands.extend(moves.into_iter().map(|name| UiCommand::ChooseAction {
        player_id,
        action: name.into(),
    }));
    if let Some(epic) = &view.active_epic
        && epic.requires_choice
    {
        commands.extend(epic.allowed_aeolus_moves.iter().map(|steps| {
            UiCommand::ResolveAeolus {
                player_id,
                tiles_to_move: *steps,
            }
        }));
    }
    if let Some(epic) = peek.or_else(|| view.active_epic.as_ref().map(|epic| epic.kind)) {
        commands.push(UiCommand::AcknowledgeEpic { player_id, epic });
    }
    commands
}

/// Run `begin_turn` until a seat can act, at most two passes round the table.
fn start_playable_turn(state: &GameState) -> GameState {
    let mut working = state.clone();
    for _ in 0..working.players.len() * 2 {
        let start = begin_turn(&working);
        working = start.state;
        if !start.skipped {
            break;
        }
    }
    working
}

fn close_turn_if_spent(state: GameState) -> GameState {
    if state.game_ended || state.actions_remaining > 0 {
        return state;
    }
    start_playable_turn(&advance_turn(&state))
}

/// The current player stands on Aeolus with a step choice still open.
fn awaiting_aeolus_choice(state: &GameState) -> bool {
    !state.game_ended
        && active_epic(state).is_some_and(|epic| {
            epic.requires_choice && epic.allowed_aeolus_moves.len() > 1
        })
}

fn resolve_aeolus(state: &GameState, player_id: PlayerId, tiles_to_move: u8) -> GameState {
    if state.game_ended || state.current_id() != Some(player_id) {
        return state.clone();
    }
    let Some(player) = state.player(player_id).filter(|p| p.aeolus_choice_pending) else {
        return state.clone();
    };
    let Some(tile) = state.tile_under(player_id).filter(|t| t.is_kind(EpicKind::Aeolus)) else {
        return state.clone();
    };
    if !allowed_aeolus_moves(player.damage).contains(&tiles_to_move) {
        return state.clone();
    }
    let tile = tile.clone();
    let mut working = state.clone();
    working.update_player(player_id, |p| p.aeolus_choice_pending = false);
    let outcome = apply_tile_effect(
        &tile,
        &working,
        player_id,
        EffectOptions::aeolus(tiles_to_move),
    );
    close_turn_if_spent(outcome.state)
}
