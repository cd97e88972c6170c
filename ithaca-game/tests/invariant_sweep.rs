//! Scripted whole games across many seeds, checking the invariants that
//! every reachable state must hold after each command.
use ithaca_game::constants::{
    ACTION_BUDGET, MAX_PLAYERS, MIN_PLAYERS, OPEN_SEA_SUPPLY, SEA_DECK_SIZE, SHIPWRECK_DAMAGE,
};
use ithaca_game::{
    EpicKind, GameState, UiCommand, apply_command, init_game, legal_commands, state_digest,
};
use std::collections::HashSet;

const MAX_COMMANDS: usize = 3_000;

type Picker = fn(&[UiCommand], u64, usize) -> UiCommand;

fn names(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("Crew {n}")).collect()
}

fn check_invariants(state: &GameState) {
    assert_eq!(state.card_count(), SEA_DECK_SIZE, "card conservation");
    let ids: HashSet<&str> = state
        .sea_deck
        .iter()
        .chain(&state.sea_discard)
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(ids.len(), SEA_DECK_SIZE, "no duplicated cards");
    assert_eq!(
        state.path.len() + state.open_sea_supply.len() + state.epic_supply.len(),
        1 + OPEN_SEA_SUPPLY + EpicKind::ALL.len(),
        "tile conservation"
    );
    assert!(state.actions_remaining <= ACTION_BUDGET);
    assert!(state.epic_clock <= 2);
    assert!(state.current_player < state.players.len());
    for player in &state.players {
        assert!(player.damage <= SHIPWRECK_DAMAGE);
        assert!(player.position < state.path.len());
        if player.aeolus_choice_pending {
            assert!(state.path[player.position].is_kind(EpicKind::Aeolus));
        }
    }
    if state.game_ended {
        let winner = state.winner.expect("finished game records a winner");
        assert_eq!(state.players[winner].position, 30);
    } else {
        assert_eq!(state.winner, None);
    }
}

/// Deterministic pseudo-choice that still walks every branch over a sweep.
fn pick(commands: &[UiCommand], seed: u64, step: usize) -> UiCommand {
    let sail = commands.iter().find(|command| {
        matches!(
            command,
            UiCommand::ChooseAction {
                action: ithaca_game::CoreAction::ShortSail | ithaca_game::CoreAction::LongSail,
                ..
            }
        )
    });
    if step % 3 == 0
        && let Some(command) = sail
    {
        return command.clone();
    }
    let offset = usize::try_from(seed).unwrap_or(0);
    commands[(step * 7 + offset) % commands.len()].clone()
}

/// Draws whenever it can, so every sea card meets every stretch of track.
fn pick_cards(commands: &[UiCommand], seed: u64, step: usize) -> UiCommand {
    let draw = commands.iter().find(|command| {
        matches!(
            command,
            UiCommand::ChooseAction {
                action: ithaca_game::CoreAction::DrawSeaCard,
                ..
            }
        )
    });
    match draw {
        Some(command) if step % 5 != 4 => command.clone(),
        _ => pick(commands, seed, step),
    }
}

fn play(players: usize, seed: u64) -> (GameState, usize) {
    play_with(players, seed, pick)
}

fn play_with(
    players: usize,
    seed: u64,
    choose: Picker,
) -> (GameState, usize) {
    let mut state = init_game(&names(players), seed).unwrap();
    check_invariants(&state);
    for step in 0..MAX_COMMANDS {
        if state.game_ended {
            return (state, step);
        }
        let current = state.current_player;
        let commands = legal_commands(&state, current);
        assert!(!commands.is_empty(), "seat {current} has no legal command");
        let command = choose(&commands, seed, step);
        state = apply_command(&state, &command).unwrap();
        check_invariants(&state);
    }
    (state, MAX_COMMANDS)
}

#[test]
fn scripted_games_hold_every_invariant() {
    for players in MIN_PLAYERS..=MAX_PLAYERS {
        for seed in 1..=25 {
            let (state, _) = play(players, seed);
            check_invariants(&state);
        }
    }
}

#[test]
fn wide_two_seat_sweep_holds_every_invariant() {
    for seed in 1..=200 {
        for choose in [pick as Picker, pick_cards] {
            let (state, _) = play_with(2, seed, choose);
            check_invariants(&state);
        }
    }
}

#[test]
fn card_heavy_games_hold_every_invariant_at_full_tables() {
    for players in [3, MAX_PLAYERS] {
        for seed in 1..=60 {
            let (state, _) = play_with(players, seed, pick_cards);
            check_invariants(&state);
        }
    }
}

#[test]
fn most_scripted_games_reach_ithaca() {
    let finished = (1..=30).filter(|seed| play(2, *seed).0.game_ended).count();
    assert!(finished >= 15, "only {finished} of 30 games finished");
}

#[test]
fn replaying_a_script_is_bit_identical() {
    for seed in [3, 17, 123_456] {
        let (left, left_steps) = play(4, seed);
        let (right, right_steps) = play(4, seed);
        assert_eq!(left_steps, right_steps);
        assert_eq!(left, right);
        assert_eq!(state_digest(&left), state_digest(&right));
    }
}

#[test]
fn finished_games_accept_no_commands() {
    let finished = (1..=30)
        .map(|seed| play(3, seed).0)
        .find(|state| state.game_ended)
        .expect("at least one scripted game finishes");
    for seat in 0..finished.players.len() {
        assert!(legal_commands(&finished, seat).is_empty());
    }
}
