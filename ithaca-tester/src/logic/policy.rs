use std::fmt;

use clap::ValueEnum;
use ithaca_game::{CoreAction, GameState, GameView, PlayerState, UiCommand};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Decision returned by [`decide`].
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub command: UiCommand,
    pub rationale: Option<&'static str>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(command: UiCommand, rationale: Option<&'static str>) -> Self {
        Self { command, rationale }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select one of the legal core actions for `player`.
    fn pick_action(&mut self, player: &PlayerState, actions: &[CoreAction]) -> Option<CoreAction>;

    /// Select how far Aeolus blows the ship from the safe choices.
    fn pick_aeolus(&mut self, allowed: &[u8]) -> Option<u8>;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum GameplayStrategy {
    Cautious,
    Reckless,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 3] = [Self::Cautious, Self::Reckless, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Reckless => "Reckless",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Reckless => Box::new(RecklessPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick the current seat's next command.
///
/// Owed sirens peeks are acknowledged first. A turn held open on Aeolus
/// with an empty budget is settled by the policy's step choice; otherwise
/// the policy chooses among the legal core actions.
pub fn decide(
    policy: &mut dyn PlayerPolicy,
    state: &GameState,
    view: &GameView,
    commands: &[UiCommand],
) -> Option<PolicyDecision> {
    let player = state.current()?;
    if player.sirens_peek_pending
        && let Some(ack) = commands
            .iter()
            .find(|command| matches!(command, UiCommand::AcknowledgeEpic { .. }))
    {
        return Some(PolicyDecision::new(ack.clone(), Some("sirens peek owed")));
    }

    if view.actions_remaining == 0
        && let Some(epic) = view.active_epic.as_ref().filter(|epic| epic.requires_choice)
        && let Some(steps) = policy.pick_aeolus(&epic.allowed_aeolus_moves)
    {
        let command = UiCommand::ResolveAeolus {
            player_id: player.id,
            tiles_to_move: steps,
        };
        return Some(PolicyDecision::new(command, Some("aeolus winds")));
    }

    let actions: Vec<CoreAction> = commands
        .iter()
        .filter_map(|command| match command {
            UiCommand::ChooseAction { action, .. } => Some(*action),
            _ => None,
        })
        .collect();
    let action = policy.pick_action(player, &actions)?;
    let command = UiCommand::ChooseAction {
        player_id: player.id,
        action,
    };
    Some(PolicyDecision::new(command, None))
}

fn first_available(actions: &[CoreAction], preference: &[CoreAction]) -> Option<CoreAction> {
    preference
        .iter()
        .copied()
        .find(|wanted| actions.contains(wanted))
        .or_else(|| actions.first().copied())
}

/// Repairs whenever damaged, otherwise inches forward.
struct CautiousPolicy;

/// Long sails and card draws first, repairs only as a last resort.
struct RecklessPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_action(&mut self, player: &PlayerState, actions: &[CoreAction]) -> Option<CoreAction> {
        if player.damage > 0 && actions.contains(&CoreAction::RepairShip) {
            return Some(CoreAction::RepairShip);
        }
        first_available(
            actions,
            &[
                CoreAction::ShortSail,
                CoreAction::DrawSeaCard,
                CoreAction::EndTurn,
            ],
        )
    }

    fn pick_aeolus(&mut self, allowed: &[u8]) -> Option<u8> {
        allowed
            .iter()
            .copied()
            .find(|steps| *steps > 0)
            .or_else(|| allowed.first().copied())
    }
}

impl PlayerPolicy for RecklessPolicy {
    fn name(&self) -> &'static str {
        "Reckless"
    }

    fn pick_action(&mut self, _player: &PlayerState, actions: &[CoreAction]) -> Option<CoreAction> {
        first_available(
            actions,
            &[
                CoreAction::LongSail,
                CoreAction::DrawSeaCard,
                CoreAction::ShortSail,
                CoreAction::RepairShip,
                CoreAction::EndTurn,
            ],
        )
    }

    fn pick_aeolus(&mut self, allowed: &[u8]) -> Option<u8> {
        allowed.iter().copied().max()
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_action(&mut self, _player: &PlayerState, actions: &[CoreAction]) -> Option<CoreAction> {
        actions.choose(&mut self.rng).copied()
    }

    fn pick_aeolus(&mut self, allowed: &[u8]) -> Option<u8> {
        allowed.choose(&mut self.rng).copied()
    }
}
