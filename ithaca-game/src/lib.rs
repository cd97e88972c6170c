//! Ithaca Game Engine
//!
//! Deterministic rules engine for a 2-4 player race from Troy to Ithaca.
//! Every operation takes a `GameState` by reference and returns a new value,
//! so any position can be replayed, compared, or forked for speculation.

pub mod command;
pub mod config;
pub mod constants;
pub mod deck;
pub mod effects;
pub mod moves;
pub mod numbers;
pub mod peek;
pub mod reducer;
pub mod render;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tiles;
pub mod track;
pub mod turns;
pub mod view;

// Re-export commonly used types
pub use command::{CoreAction, UiCommand, apply_command, init_game, legal_commands};
pub use config::{GameConfig, create_game_with_config};
pub use deck::{
    CardOutcome, SeaCard, base_deck, draw_sea_card, resolve_sea_card, shuffle, shuffled_base_deck,
};
pub use effects::{Direction, EffectOptions, EffectOutcome, apply_tile_effect, move_player_step};
pub use moves::{MoveList, MoveName};
pub use peek::{peek_next_epic, resolve_sirens_peek, resolve_sirens_peek_for};
pub use reducer::{apply_move, legal_moves};
pub use render::{RenderOptions, render_state_summary};
pub use rng::{DeterministicRng, RngOrigin, normalize_seed};
pub use snapshot::{GameSnapshot, RngSnapshot, SnapshotError, state_digest};
pub use state::{GameError, GameState, PlayerId, PlayerState, create_game, validate_seed};
pub use tiles::{EpicKind, Tile, TileCategory};
pub use track::{TrackError, extend_path};
pub use turns::{TurnStart, advance_turn, begin_turn};
pub use view::{
    ActiveEpic, BoardTileKind, BoardTileView, EpicPreview, GameOver, GameView,
    allowed_aeolus_moves, project_view,
};
