use anyhow::{Context, Result};
use ithaca_game::constants::{ACTION_BUDGET, SEA_DECK_SIZE, SHIPWRECK_DAMAGE};
use ithaca_game::{
    GameState, PlayerId, RenderOptions, UiCommand, apply_command, init_game, legal_commands,
    project_view, render_state_summary, state_digest,
};
use serde::Serialize;
use thiserror::Error;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, decide};

const LOG_TARGET: &str = "ithaca::tester";

/// Configuration for one simulated game.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub players: usize,
    pub strategy: GameplayStrategy,
    pub max_turns: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64, players: usize) -> Self {
        Self {
            seed,
            players,
            strategy,
            max_turns: 400,
        }
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// A rule the engine must never break, observed broken.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{found} sea cards in play, expected {expected}")]
    CardCount { found: usize, expected: usize },
    #[error("player {player} carries damage {damage} (max {max})")]
    Damage { player: PlayerId, damage: u8, max: u8 },
    #[error("action budget {value} exceeds {max}")]
    Budget { value: u8, max: u8 },
    #[error("player {player} at {position} is off a {len}-tile track")]
    Position {
        player: PlayerId,
        position: usize,
        len: usize,
    },
    #[error("winner {winner:?} does not match game_ended={ended}")]
    Winner {
        winner: Option<PlayerId>,
        ended: bool,
    },
    #[error("seat {seat} has no legal command")]
    NoCommand { seat: PlayerId },
    #[error("seat {seat} issued {command} with no effect")]
    Stalled { seat: PlayerId, command: String },
    #[error("replay digest {replay:#018x} differs from {original:#018x}")]
    ReplayMismatch { original: u64, replay: u64 },
}

/// Check every structural invariant of `state`.
///
/// # Errors
///
/// Returns the first violation found.
pub fn check_invariants(state: &GameState) -> Result<(), InvariantViolation> {
    let cards = state.card_count();
    if cards != SEA_DECK_SIZE {
        return Err(InvariantViolation::CardCount {
            found: cards,
            expected: SEA_DECK_SIZE,
        });
    }
    if state.actions_remaining > ACTION_BUDGET {
        return Err(InvariantViolation::Budget {
            value: state.actions_remaining,
            max: ACTION_BUDGET,
        });
    }
    for player in &state.players {
        if player.damage > SHIPWRECK_DAMAGE {
            return Err(InvariantViolation::Damage {
                player: player.id,
                damage: player.damage,
                max: SHIPWRECK_DAMAGE,
            });
        }
        if player.position >= state.path.len() {
            return Err(InvariantViolation::Position {
                player: player.id,
                position: player.position,
                len: state.path.len(),
            });
        }
    }
    if state.game_ended != state.winner.is_some() {
        return Err(InvariantViolation::Winner {
            winner: state.winner,
            ended: state.game_ended,
        });
    }
    Ok(())
}

/// Outcome of one simulated game, as reported.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub strategy: String,
    pub seed: u64,
    pub players: usize,
    pub turns: u32,
    pub commands: usize,
    pub finished: bool,
    pub winner: Option<PlayerId>,
    pub digest: String,
    pub violations: Vec<String>,
}

impl GameRecord {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A finished run: the report record and the final position.
#[derive(Debug, Clone)]
pub struct GameRun {
    pub record: GameRecord,
    pub final_state: GameState,
}

struct Playthrough {
    state: GameState,
    turns: u32,
    commands: usize,
    violations: Vec<InvariantViolation>,
}

/// Play one game through the command façade, then replay it and compare
/// final digests.
///
/// # Errors
///
/// Fails when the table cannot be seated for `config.players`.
pub fn run_game(config: &SimulationConfig, verbose: bool) -> Result<GameRun> {
    let first = play(config)?;
    let replay = play(config)?;
    let original = state_digest(&first.state);
    let mut violations = first.violations;
    let replayed = state_digest(&replay.state);
    if replayed != original {
        violations.push(InvariantViolation::ReplayMismatch {
            original,
            replay: replayed,
        });
    }

    if verbose {
        let summary = render_state_summary(
            &first.state,
            RenderOptions {
                include_legal_moves: true,
                include_auto_start_turn: false,
            },
        );
        println!("{summary}");
    }

    let record = GameRecord {
        strategy: config.strategy.label().to_string(),
        seed: config.seed,
        players: config.players,
        turns: first.turns,
        commands: first.commands,
        finished: first.state.game_ended,
        winner: first.state.winner,
        digest: format!("{original:016x}"),
        violations: violations.iter().map(ToString::to_string).collect(),
    };
    Ok(GameRun {
        record,
        final_state: first.state,
    })
}

fn seat_names(players: usize) -> Vec<String> {
    (1..=players).map(|n| format!("Sailor {n}")).collect()
}

fn play(config: &SimulationConfig) -> Result<Playthrough> {
    let mut state = init_game(&seat_names(config.players), config.seed)
        .with_context(|| format!("seating {} players", config.players))?;
    let mut policy: Box<dyn PlayerPolicy + Send> = config.strategy.create_policy(config.seed);
    let mut run = Playthrough {
        state: state.clone(),
        turns: 0,
        commands: 0,
        violations: Vec::new(),
    };
    if let Err(violation) = check_invariants(&state) {
        run.violations.push(violation);
        return Ok(run);
    }

    while !state.game_ended && run.turns < config.max_turns {
        state = acknowledge_waiting_peeks(&state)?;
        let seat = state.current_player;
        let commands = legal_commands(&state, seat);
        let view = project_view(&state);
        let Some(decision) = decide(policy.as_mut(), &state, &view, &commands) else {
            run.violations.push(InvariantViolation::NoCommand { seat });
            break;
        };
        log::debug!(
            target: LOG_TARGET,
            "{} seat {seat}: {:?} ({})",
            policy.name(),
            decision.command,
            decision.rationale.unwrap_or("preference")
        );

        let next = apply_command(&state, &decision.command)?;
        let Some(turn_closed) = turn_passed(&state, &next, seat) else {
            run.violations.push(InvariantViolation::Stalled {
                seat,
                command: format!("{:?}", decision.command),
            });
            break;
        };
        run.commands += 1;
        if turn_closed {
            run.turns += 1;
        }
        if let Err(violation) = check_invariants(&next) {
            log::warn!(target: LOG_TARGET, "seed {}: {violation}", config.seed);
            run.violations.push(violation);
            state = next;
            break;
        }
        state = next;
    }

    run.state = state;
    Ok(run)
}

/// Whether the command that turned `before` into `after` closed `seat`'s
/// turn, or `None` when it changed nothing.
fn turn_passed(before: &GameState, after: &GameState, seat: PlayerId) -> Option<bool> {
    if after == before {
        // Play came straight back to a fresh turn for the same seat.
        let others_stranded = before
            .players
            .iter()
            .filter(|p| p.id != seat)
            .all(|p| p.stuck_at_cyclops);
        return others_stranded.then_some(true);
    }
    Some(after.current_player != seat || after.actions_remaining > before.actions_remaining)
}

/// Let seats other than the current one acknowledge peeks they are owed.
fn acknowledge_waiting_peeks(state: &GameState) -> Result<GameState> {
    let mut working = state.clone();
    for seat in 0..working.players.len() {
        if seat == working.current_player {
            continue;
        }
        let ack = legal_commands(&working, seat)
            .into_iter()
            .find(|command| matches!(command, UiCommand::AcknowledgeEpic { .. }));
        if let Some(command) = ack {
            working = apply_command(&working, &command)?;
        }
    }
    Ok(working)
}
