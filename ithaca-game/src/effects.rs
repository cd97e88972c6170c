//! Epic tile effects and the single-step movement primitive they recurse through.
//!
//! Movement and effects call each other: a step resolves the landing tile,
//! and several effects take further steps. Every effect adds at most three
//! steps and epic tiles sit three apart, so the recursion stays shallow.
use crate::constants::{
    AEOLUS_MAX_STEPS, LOG_TARGET_MOVEMENT, LOG_TARGET_RULES, SHIPWRECK_DAMAGE,
};
use crate::state::{GameState, PlayerId};
use crate::tiles::{EpicKind, Tile, TileCategory};
use crate::track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Direction of a signed movement delta; zero counts as forward.
    #[must_use]
    pub const fn of(delta: i8) -> Self {
        if delta < 0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    const fn target(self, position: usize) -> usize {
        match self {
            Self::Forward => position + 1,
            Self::Backward => position.saturating_sub(1),
        }
    }
}

/// Caller choices for effects that take one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectOptions {
    /// Steps requested on Aeolus; clamped to `0..=3`.
    pub aeolus_steps: u8,
}

impl EffectOptions {
    #[must_use]
    pub const fn aeolus(steps: u8) -> Self {
        Self {
            aeolus_steps: steps,
        }
    }
}

/// Flags reported by a resolved effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Resolution {
    pub shipwrecked: bool,
    pub turn_ended: bool,
}

impl Resolution {
    const NONE: Self = Self {
        shipwrecked: false,
        turn_ended: false,
    };
    const TURN_ENDED: Self = Self {
        shipwrecked: false,
        turn_ended: true,
    };
    const SHIPWRECK: Self = Self {
        shipwrecked: true,
        turn_ended: true,
    };
}

/// Result of [`apply_tile_effect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectOutcome {
    pub state: GameState,
    pub shipwrecked: bool,
    pub turn_ended: bool,
}

/// Resolve `tile`'s encounter for `player` on a copy of `state`.
///
/// Tiles that are neither epic nor terminal, and unknown players, leave the
/// state unchanged.
#[must_use]
pub fn apply_tile_effect(
    tile: &Tile,
    state: &GameState,
    player: PlayerId,
    options: EffectOptions,
) -> EffectOutcome {
    let mut working = state.clone();
    let resolution = resolve_tile(&mut working, tile, player, options);
    EffectOutcome {
        state: working,
        shipwrecked: resolution.shipwrecked,
        turn_ended: resolution.turn_ended,
    }
}

/// Move `player` one tile in `direction` on a copy of `state`, resolving the
/// landing tile.
#[must_use]
pub fn move_player_step(state: &GameState, player: PlayerId, direction: Direction) -> GameState {
    let mut working = state.clone();
    step_player(&mut working, player, direction);
    working
}

pub(crate) fn resolve_tile(
    working: &mut GameState,
    tile: &Tile,
    player: PlayerId,
    options: EffectOptions,
) -> Resolution {
    if !tile.is_epic_or_terminal() || working.player(player).is_none() {
        return Resolution::NONE;
    }
    let Some(kind) = tile.epic else {
        return Resolution::NONE;
    };
    match kind {
        EpicKind::SafeHarbor => {
            working.update_player(player, |p| p.damage = 0);
            Resolution::NONE
        }
        EpicKind::SoldierAttack => soldier_attack(working, player),
        EpicKind::LotusEaters => {
            step_player(working, player, Direction::Forward);
            working.update_player(player, |p| p.skip_next_turn = true);
            Resolution::NONE
        }
        EpicKind::Cyclops => {
            cyclops(working, player);
            Resolution::NONE
        }
        EpicKind::Aeolus => {
            aeolus(working, player, options.aeolus_steps);
            Resolution::NONE
        }
        EpicKind::Circe => {
            working.update_player(player, |p| {
                p.skip_next_turn = true;
                p.circe_jump_pending = true;
            });
            working.end_turn_for(player);
            log::debug!(target: LOG_TARGET_RULES, "player {player} is enchanted by Circe");
            Resolution::TURN_ENDED
        }
        EpicKind::Underworld => {
            step_player(working, player, Direction::Backward);
            Resolution::NONE
        }
        EpicKind::Sirens => {
            working.update_player(player, |p| p.sirens_active = true);
            Resolution::NONE
        }
        EpicKind::SunGodsCattle => {
            sun_gods_cattle(working, player);
            Resolution::NONE
        }
        EpicKind::Ithaca => {
            working.game_ended = true;
            working.winner = Some(player);
            working.end_turn_for(player);
            log::debug!(target: LOG_TARGET_RULES, "player {player} reaches Ithaca");
            Resolution::TURN_ENDED
        }
    }
}

/// Move one tile and resolve the landing. No-op once the game has ended.
pub(crate) fn step_player(working: &mut GameState, player: PlayerId, direction: Direction) {
    if working.game_ended {
        return;
    }
    let Some(from) = working.player(player).map(|p| p.position) else {
        return;
    };
    let target = direction.target(from);
    track::ensure_index(working, target);
    let tile = working.path[target].clone();
    working.update_player(player, |p| {
        p.position = target;
        p.aeolus_choice_pending = tile.is_kind(EpicKind::Aeolus);
    });
    log::trace!(target: LOG_TARGET_MOVEMENT, "player {player} steps {from} -> {target}");
    resolve_tile(working, &tile, player, EffectOptions::default());
}

/// Force the shipwreck reset on `player` and end their turn.
pub(crate) fn shipwreck(working: &mut GameState, player: PlayerId) {
    working.update_player(player, |p| {
        p.damage = SHIPWRECK_DAMAGE;
        p.skip_next_turn = true;
    });
    working.end_turn_for(player);
    log::debug!(target: LOG_TARGET_RULES, "player {player} is shipwrecked");
}

fn soldier_attack(working: &mut GameState, player: PlayerId) -> Resolution {
    let mut damage = 0;
    working.update_player(player, |p| {
        p.damage = p.damage.saturating_add(1);
        damage = p.damage;
    });
    if damage >= SHIPWRECK_DAMAGE {
        shipwreck(working, player);
        return Resolution::SHIPWRECK;
    }
    Resolution::NONE
}

fn cyclops(working: &mut GameState, player: PlayerId) {
    let stuck: Vec<PlayerId> = working
        .players
        .iter()
        .filter(|p| p.stuck_at_cyclops)
        .map(|p| p.id)
        .collect();
    if stuck.is_empty() {
        working.update_player(player, |p| p.stuck_at_cyclops = true);
        return;
    }
    for p in &mut working.players {
        p.stuck_at_cyclops = false;
    }
    let mut rescued = vec![player];
    rescued.extend(stuck.into_iter().filter(|id| *id != player));
    log::debug!(target: LOG_TARGET_RULES, "cyclops rescue frees players {rescued:?}");
    for id in rescued {
        step_player(working, id, Direction::Forward);
        step_player(working, id, Direction::Forward);
    }
}

fn aeolus(working: &mut GameState, player: PlayerId, requested: u8) {
    for _ in 0..requested.min(AEOLUS_MAX_STEPS) {
        let Some(damage) = working.player(player).map(|p| p.damage) else {
            return;
        };
        if damage + 1 >= SHIPWRECK_DAMAGE {
            break;
        }
        working.update_player(player, |p| p.damage += 1);
        step_player(working, player, Direction::Forward);
    }
}

fn sun_gods_cattle(working: &mut GameState, player: PlayerId) {
    let Some(position) = working.player(player).map(|p| p.position) else {
        return;
    };
    let destination = (0..position)
        .rev()
        .find(|&index| {
            working.path.get(index).is_some_and(|tile| {
                tile.category == TileCategory::Epic && !tile.is_kind(EpicKind::SafeHarbor)
            })
        })
        .unwrap_or(0);
    for _ in destination..position {
        step_player(working, player, Direction::Backward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_game;

    fn game_with_path(len: usize) -> GameState {
        let mut state = create_game(3, 123).unwrap();
        track::ensure_index(&mut state, len - 1);
        state.actions_remaining = 5;
        state
    }

    fn epic_at(state: &GameState, kind: EpicKind) -> usize {
        state.path.iter().position(|t| t.is_kind(kind)).unwrap()
    }

    #[test]
    fn safe_harbor_repairs_fully() {
        let state = game_with_path(4);
        let mut damaged = state.clone();
        damaged.update_player(0, |p| p.damage = 2);
        let outcome = apply_tile_effect(&state.path[3], &damaged, 0, EffectOptions::default());
        assert_eq!(outcome.state.player(0).unwrap().damage, 0);
        assert!(!outcome.shipwrecked);
        assert!(!outcome.turn_ended);
    }

    #[test]
    fn open_sea_has_no_effect() {
        let state = game_with_path(4);
        let outcome = apply_tile_effect(&state.path[1], &state, 0, EffectOptions::default());
        assert_eq!(outcome.state, state);
    }

    #[test]
    fn soldier_attack_wrecks_at_threshold() {
        let mut state = game_with_path(7);
        let soldier = state.path[6].clone();
        let outcome = apply_tile_effect(&soldier, &state, 0, EffectOptions::default());
        assert_eq!(outcome.state.player(0).unwrap().damage, 1);
        assert!(!outcome.shipwrecked);

        state.update_player(0, |p| p.damage = 2);
        let outcome = apply_tile_effect(&soldier, &state, 0, EffectOptions::default());
        let player = outcome.state.player(0).unwrap();
        assert!(outcome.shipwrecked && outcome.turn_ended);
        assert_eq!(player.damage, SHIPWRECK_DAMAGE);
        assert!(player.skip_next_turn);
        assert_eq!(outcome.state.actions_remaining, 0);
    }

    #[test]
    fn shipwreck_of_a_waiting_player_keeps_the_budget() {
        let mut state = game_with_path(7);
        state.update_player(1, |p| p.damage = 2);
        let soldier = state.path[6].clone();
        let outcome = apply_tile_effect(&soldier, &state, 1, EffectOptions::default());
        assert!(outcome.shipwrecked);
        assert_eq!(outcome.state.actions_remaining, 5);
    }

    #[test]
    fn lotus_eaters_step_forward_and_skip() {
        let mut state = game_with_path(10);
        let lotus = epic_at(&state, EpicKind::LotusEaters);
        state.update_player(0, |p| p.position = lotus);
        let outcome = apply_tile_effect(&state.path[lotus].clone(), &state, 0, EffectOptions::default());
        let player = outcome.state.player(0).unwrap();
        assert_eq!(player.position, lotus + 1);
        assert!(player.skip_next_turn);
    }

    #[test]
    fn cyclops_first_arrival_is_stuck_second_frees_everyone() {
        let mut state = game_with_path(13);
        let cyclops = epic_at(&state, EpicKind::Cyclops);
        let tile = state.path[cyclops].clone();
        for id in 0..3 {
            state.update_player(id, |p| p.position = cyclops);
        }
        let first = apply_tile_effect(&tile, &state, 0, EffectOptions::default()).state;
        assert!(first.player(0).unwrap().stuck_at_cyclops);
        assert_eq!(first.player(0).unwrap().position, cyclops);

        let second = apply_tile_effect(&tile, &first, 2, EffectOptions::default()).state;
        assert!(second.players.iter().all(|p| !p.stuck_at_cyclops));
        assert_eq!(second.player(0).unwrap().position, cyclops + 2);
        assert_eq!(second.player(2).unwrap().position, cyclops + 2);
        assert_eq!(second.player(1).unwrap().position, cyclops, "bystander stays");
    }

    #[test]
    fn aeolus_stops_before_the_wreck_threshold() {
        let mut state = game_with_path(16);
        let aeolus = epic_at(&state, EpicKind::Aeolus);
        let tile = state.path[aeolus].clone();
        state.update_player(0, |p| p.position = aeolus);

        let outcome = apply_tile_effect(&tile, &state, 0, EffectOptions::aeolus(9));
        let player = outcome.state.player(0).unwrap();
        assert_eq!(player.position, aeolus + 2);
        assert_eq!(player.damage, 2);

        let none = apply_tile_effect(&tile, &state, 0, EffectOptions::aeolus(0));
        assert_eq!(none.state, state);

        state.update_player(0, |p| p.damage = 1);
        let outcome = apply_tile_effect(&tile, &state, 0, EffectOptions::aeolus(3));
        assert_eq!(outcome.state.player(0).unwrap().position, aeolus + 1);
        assert_eq!(outcome.state.player(0).unwrap().damage, 2);
    }

    #[test]
    fn circe_ends_turn_and_schedules_a_jump() {
        let state = game_with_path(19);
        let circe = state.path[epic_at(&state, EpicKind::Circe)].clone();
        let outcome = apply_tile_effect(&circe, &state, 0, EffectOptions::default());
        let player = outcome.state.player(0).unwrap();
        assert!(outcome.turn_ended);
        assert!(player.skip_next_turn && player.circe_jump_pending);
        assert_eq!(outcome.state.actions_remaining, 0);
    }

    #[test]
    fn underworld_steps_back() {
        let mut state = game_with_path(22);
        let underworld = epic_at(&state, EpicKind::Underworld);
        state.update_player(0, |p| p.position = underworld);
        let tile = state.path[underworld].clone();
        let outcome = apply_tile_effect(&tile, &state, 0, EffectOptions::default());
        assert_eq!(outcome.state.player(0).unwrap().position, underworld - 1);
    }

    #[test]
    fn sirens_force_a_full_turn() {
        let state = game_with_path(25);
        let sirens = state.path[epic_at(&state, EpicKind::Sirens)].clone();
        let outcome = apply_tile_effect(&sirens, &state, 1, EffectOptions::default());
        assert!(outcome.state.player(1).unwrap().sirens_active);
    }

    #[test]
    fn sun_gods_cattle_backtracks_past_safe_harbor_epics() {
        let mut state = game_with_path(28);
        let cattle = epic_at(&state, EpicKind::SunGodsCattle);
        let sirens = epic_at(&state, EpicKind::Sirens);
        state.update_player(0, |p| p.position = cattle);
        let tile = state.path[cattle].clone();
        let outcome = apply_tile_effect(&tile, &state, 0, EffectOptions::default());
        let player = outcome.state.player(0).unwrap();
        assert_eq!(player.position, sirens);
        assert!(player.sirens_active, "landing on the sirens resolves them");
    }

    #[test]
    fn sun_gods_cattle_without_prior_epic_returns_to_troy() {
        let mut state = game_with_path(4);
        state.update_player(0, |p| {
            p.position = 2;
            p.damage = 2;
        });
        let cattle = Tile::epic(9, EpicKind::SunGodsCattle);
        let outcome = apply_tile_effect(&cattle, &state, 0, EffectOptions::default());
        assert_eq!(outcome.state.player(0).unwrap().position, 0);
        assert_eq!(outcome.state.player(0).unwrap().damage, 2);
    }

    #[test]
    fn ithaca_ends_the_game() {
        let state = game_with_path(4);
        let ithaca = Tile::epic(10, EpicKind::Ithaca);
        let outcome = apply_tile_effect(&ithaca, &state, 0, EffectOptions::default());
        assert!(outcome.state.game_ended);
        assert_eq!(outcome.state.winner, Some(0));
        assert!(outcome.turn_ended);
    }

    #[test]
    fn step_extends_the_track_and_clamps_at_start() {
        let state = create_game(2, 8).unwrap();
        let moved = move_player_step(&state, 0, Direction::Forward);
        assert_eq!(moved.path.len(), 2);
        assert_eq!(moved.player(0).unwrap().position, 1);
        let back = move_player_step(&state, 0, Direction::Backward);
        assert_eq!(back.player(0).unwrap().position, 0);
        assert_eq!(state.player(0).unwrap().position, 0);
    }

    #[test]
    fn steps_stop_once_the_game_is_over() {
        let mut state = game_with_path(4);
        state.game_ended = true;
        let moved = move_player_step(&state, 1, Direction::Forward);
        assert_eq!(moved, state);
    }
}
