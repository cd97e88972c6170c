//! Sea deck: the fixed event-card supply, its shuffler, and card resolution.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::{LOG_TARGET_DECK, SHIPWRECK_DAMAGE};
use crate::effects::{self, Direction, EffectOptions};
use crate::numbers::unit_to_index;
use crate::rng::DeterministicRng;
use crate::state::{GameState, PlayerId};
use crate::tiles::{EpicKind, TileCategory};
use crate::track;

/// An event card drawn from the sea deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeaCard {
    pub id: String,
    pub name: String,
    /// Signed number of single steps; negative sails backward.
    pub movement: i8,
    pub damage: u8,
    #[serde(default)]
    pub end_turn: bool,
    /// Jump straight to the next epic tile, skipping intermediate tiles.
    #[serde(default)]
    pub advance_to_next_epic: bool,
    /// With `advance_to_next_epic`, also leave the landed epic unresolved.
    #[serde(default)]
    pub skip_epic_effect: bool,
}

impl SeaCard {
    #[must_use]
    pub fn new(id: &str, name: &str, movement: i8, damage: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            movement,
            damage,
            end_turn: false,
            advance_to_next_epic: false,
            skip_epic_effect: false,
        }
    }

    #[must_use]
    pub fn ending_turn(mut self) -> Self {
        self.end_turn = true;
        self
    }

    /// Teleport to the next epic without resolving it. Ithaca still ends the game.
    #[must_use]
    pub fn charted(mut self) -> Self {
        self.advance_to_next_epic = true;
        self.skip_epic_effect = true;
        self
    }
}

/// Result of resolving a card against a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardOutcome {
    pub shipwrecked: bool,
    pub end_turn: bool,
}

/// The 50-card balance table: 20 setbacks, 10 neutral, 20 boons.
#[must_use]
pub fn base_deck() -> Vec<SeaCard> {
    let mut deck = Vec::with_capacity(crate::constants::SEA_DECK_SIZE);

    // Setbacks
    push_run(&mut deck, "choppy", "Choppy Waters", 1, 1, 4);
    push_run(&mut deck, "rough", "Rough Gale", 2, 1, 3);
    push_run(&mut deck, "countercurrent", "Countercurrent", -1, 1, 3);
    push_run(&mut deck, "treacherous", "Treacherous Current", -2, 1, 3);
    deck.push(SeaCard::new("maelstrom", "Maelstrom", -3, 1).ending_turn());
    push_run(&mut deck, "squall", "Sudden Squall", 0, 1, 2);
    for n in 1..=2 {
        deck.push(SeaCard::new(&format!("crash_{n}"), "Crash", 2, 1).ending_turn());
    }
    for n in 1..=2 {
        deck.push(SeaCard::new(&format!("surge_{n}"), "Surge", 3, 1).ending_turn());
    }

    // Neutral
    push_run(&mut deck, "dead_calm", "Dead Calm", 0, 0, 3);
    push_run(&mut deck, "ebb_flow", "Ebb and Flow", -1, 0, 2);
    push_run(&mut deck, "balanced_tide", "Balanced Tide", 1, 0, 2);
    deck.push(SeaCard::new("balanced_tide_3", "Balanced Tide", 1, 0).ending_turn());
    for n in 1..=2 {
        deck.push(
            SeaCard::new(&format!("holding_pattern_{n}"), "Holding Pattern", 0, 0).ending_turn(),
        );
    }

    // Boons
    push_run(&mut deck, "calm", "Calm Seas", 1, 0, 7);
    push_run(&mut deck, "steady_breeze", "Steady Breeze", 1, 0, 4);
    push_run(&mut deck, "tailwind", "Tailwind", 2, 0, 3);
    for n in 1..=2 {
        deck.push(
            SeaCard::new(&format!("measured_advance_{n}"), "Measured Advance", 2, 0).ending_turn(),
        );
    }
    deck.push(SeaCard::new("favorable_1", "Favorable Tide", 3, 0));
    deck.push(SeaCard::new("swift_current", "Swift Current", 4, 0).ending_turn());
    for n in 1..=2 {
        deck.push(
            SeaCard::new(&format!("charted_course_{n}"), "Charted Course", 0, 0)
                .ending_turn()
                .charted(),
        );
    }

    deck
}

fn push_run(deck: &mut Vec<SeaCard>, stem: &str, name: &str, movement: i8, damage: u8, count: u8) {
    for n in 1..=count {
        deck.push(SeaCard::new(&format!("{stem}_{n}"), name, movement, damage));
    }
}

/// Uniform in-place permutation: walk from the last index down to 1,
/// swapping each slot with a uniformly chosen slot at or below it.
pub fn shuffle<T>(items: &mut [T], rng: &mut DeterministicRng) {
    for i in (1..items.len()).rev() {
        let j = unit_to_index(rng.next_unit(), i + 1);
        items.swap(i, j);
    }
}

/// The base deck shuffled into a draw pile.
#[must_use]
pub fn shuffled_base_deck(rng: &mut DeterministicRng) -> VecDeque<SeaCard> {
    let mut cards = base_deck();
    shuffle(&mut cards, rng);
    cards.into()
}

/// Take the top card, reshuffling the discard pile into the draw pile first
/// when the draw pile is empty.
///
/// # Panics
///
/// Panics when both piles are empty; legality checks exclude that draw.
pub(crate) fn draw_from(working: &mut GameState) -> SeaCard {
    if working.sea_deck.is_empty() && !working.sea_discard.is_empty() {
        let mut reshuffled = std::mem::take(&mut working.sea_discard);
        shuffle(&mut reshuffled, &mut working.rng);
        log::debug!(
            target: LOG_TARGET_DECK,
            "reshuffled {} discarded cards into the sea deck",
            reshuffled.len()
        );
        working.sea_deck = reshuffled.into();
    }
    working
        .sea_deck
        .pop_front()
        .unwrap_or_else(|| panic!("sea deck and discard pile are both empty"))
}

/// Draw a card without resolving it. The card is held by the caller, so the
/// returned state is one card short until it is discarded.
///
/// # Panics
///
/// Panics when both piles are empty.
#[must_use]
pub fn draw_sea_card(state: &GameState) -> (GameState, SeaCard) {
    let mut working = state.clone();
    let card = draw_from(&mut working);
    (working, card)
}

/// Resolve a drawn card for `player` on a copy of `state`. The card is not
/// discarded; that is the caller's job once it is done with it.
#[must_use]
pub fn resolve_sea_card(
    state: &GameState,
    player: PlayerId,
    card: &SeaCard,
) -> (GameState, CardOutcome) {
    let mut working = state.clone();
    let outcome = resolve_card(&mut working, player, card);
    (working, outcome)
}

/// Resolve `card` for `player`: movement, then damage, then turn ending.
pub(crate) fn resolve_card(working: &mut GameState, player: PlayerId, card: &SeaCard) -> CardOutcome {
    log::debug!(
        target: LOG_TARGET_DECK,
        "player {player} draws {} ({:+} move, {} damage)",
        card.name,
        card.movement,
        card.damage
    );
    if card.advance_to_next_epic {
        teleport_to_next_epic(working, player, !card.skip_epic_effect);
    } else {
        let direction = Direction::of(card.movement);
        for _ in 0..card.movement.unsigned_abs() {
            effects::step_player(working, player, direction);
        }
    }

    let mut outcome = CardOutcome {
        shipwrecked: false,
        end_turn: card.end_turn,
    };
    if card.damage > 0 {
        let mut damage = 0;
        working.update_player(player, |p| {
            p.damage = p.damage.saturating_add(card.damage);
            damage = p.damage;
        });
        if damage >= SHIPWRECK_DAMAGE {
            effects::shipwreck(working, player);
            outcome.shipwrecked = true;
        }
    }
    if outcome.end_turn {
        working.end_turn_for(player);
    }
    outcome
}

/// Move `player` straight onto the next epic or terminal tile.
pub(crate) fn teleport_to_next_epic(working: &mut GameState, player: PlayerId, resolve_landing: bool) {
    if working.game_ended {
        return;
    }
    let Some(from) = working.player(player).map(|p| p.position) else {
        return;
    };
    let target = track::next_epic_index(working, from);
    let tile = working.path[target].clone();
    let resolves = resolve_landing || tile.category == TileCategory::Terminal;
    working.update_player(player, |p| {
        p.position = target;
        p.aeolus_choice_pending = resolves && tile.is_kind(EpicKind::Aeolus);
    });
    log::trace!(
        target: crate::constants::LOG_TARGET_MOVEMENT,
        "player {player} jumps {from} -> {target}"
    );
    if resolves {
        effects::resolve_tile(working, &tile, player, EffectOptions::default());
    }
}
