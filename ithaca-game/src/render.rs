use crate::constants::EPIC_CLOCK_PERIOD;
use crate::reducer::legal_moves;
use crate::state::{GameState, PlayerState};
use crate::tiles::{Tile, TileCategory};
use crate::turns::begin_turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub include_legal_moves: bool,
    /// List the moves available after opening the current turn.
    pub include_auto_start_turn: bool,
}

/// Multi-line plain-text summary of `state` for logs and terminals.
#[must_use]
pub fn render_state_summary(state: &GameState, options: RenderOptions) -> String {
    let mut lines = vec![
        format!("Current player: P{}", state.current_player + 1),
        format!("Actions remaining: {}", state.actions_remaining),
        format!(
            "Epic clock: {} of {}",
            state.epic_clock,
            EPIC_CLOCK_PERIOD + 1
        ),
        format!(
            "Sea deck: {} | discard: {}",
            state.sea_deck.len(),
            state.sea_discard.len()
        ),
        "Players:".to_string(),
    ];
    lines.extend(
        state
            .players
            .iter()
            .map(|player| format!("- {}", describe_player(state, player))),
    );
    lines.push("Path:".to_string());
    lines.push(describe_path(state));
    if state.game_ended
        && let Some(winner) = state.winner
    {
        lines.push(format!("Winner: P{}", winner + 1));
    }
    if options.include_legal_moves {
        let moves = if options.include_auto_start_turn {
            legal_moves(&begin_turn(state).state)
        } else {
            legal_moves(state)
        };
        let names: Vec<&str> = moves.iter().map(|name| name.as_str()).collect();
        lines.push(format!("Legal moves: {}", names.join(", ")));
    }
    lines.join("\n")
}

fn tile_label(tile: &Tile) -> &'static str {
    match (tile.category, tile.epic) {
        (TileCategory::Start, _) => "Troy",
        (TileCategory::OpenSea, _) => "Open Sea",
        (_, Some(kind)) => kind.name(),
        (TileCategory::Terminal, None) => "Ithaca",
        (TileCategory::Epic, None) => "Epic",
    }
}

fn flags(player: &PlayerState) -> String {
    let set: Vec<&str> = [
        (player.skip_next_turn, "skip next turn"),
        (player.stuck_at_cyclops, "stuck at cyclops"),
        (player.sirens_active, "sirens"),
        (player.circe_jump_pending, "circe jump"),
        (player.sirens_peek_pending, "sirens peek"),
        (player.aeolus_choice_pending, "aeolus choice"),
    ]
    .into_iter()
    .filter_map(|(on, label)| on.then_some(label))
    .collect();
    if set.is_empty() {
        String::new()
    } else {
        format!(" [{}]", set.join(", "))
    }
}

fn describe_player(state: &GameState, player: &PlayerState) -> String {
    let location = state
        .path
        .get(player.position)
        .map_or("Unknown", tile_label);
    format!(
        "P{}: {location} (#{}), damage {}{}",
        player.id + 1,
        player.position,
        player.damage,
        flags(player)
    )
}

fn describe_path(state: &GameState) -> String {
    state
        .path
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let occupants: Vec<String> = state
                .players
                .iter()
                .filter(|p| p.position == index)
                .map(|p| format!("P{}", p.id + 1))
                .collect();
            if occupants.is_empty() {
                format!("[{index}:{}]", tile_label(tile))
            } else {
                format!("[{index}:{} - {}]", tile_label(tile), occupants.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
