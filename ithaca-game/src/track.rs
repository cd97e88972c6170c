//! Lazy track growth driven by the epic clock.
//!
//! The clock cycles 0, 1, 2: the first two values draw an open-sea tile and
//! advance the clock, the third draws an epic tile and resets it. The track
//! therefore always reads start, sea, sea, epic, sea, sea, epic, ...
use thiserror::Error;

use crate::constants::EPIC_CLOCK_PERIOD;
use crate::state::GameState;

/// A required tile supply ran dry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    #[error("open-sea tile supply exhausted")]
    OpenSeaExhausted,
    #[error("epic tile supply exhausted")]
    EpicExhausted,
}

/// Append one tile to the path. Leaves `working` untouched on failure.
pub(crate) fn try_extend(working: &mut GameState) -> Result<(), TrackError> {
    if working.epic_clock >= EPIC_CLOCK_PERIOD {
        let tile = working
            .epic_supply
            .pop_front()
            .ok_or(TrackError::EpicExhausted)?;
        working.path.push(tile);
        working.epic_clock = 0;
    } else {
        let tile = working
            .open_sea_supply
            .pop_front()
            .ok_or(TrackError::OpenSeaExhausted)?;
        working.path.push(tile);
        working.epic_clock += 1;
    }
    Ok(())
}

/// Append one tile, treating an empty supply as a broken invariant.
///
/// # Panics
///
/// Panics when the supply the epic clock selects is empty; the rules keep
/// every game finished before that point.
pub(crate) fn extend(working: &mut GameState) {
    if let Err(err) = try_extend(working) {
        panic!("track extension past the tile supply: {err}");
    }
}

/// Grow the path until `index` is addressable.
pub(crate) fn ensure_index(working: &mut GameState, index: usize) {
    while index >= working.path.len() {
        extend(working);
    }
}

/// Index of the first epic or terminal tile strictly after `from`, growing
/// the path as needed. `None` once the supplies cannot reach one.
pub(crate) fn find_next_epic(working: &mut GameState, from: usize) -> Option<usize> {
    let mut index = from + 1;
    loop {
        while index >= working.path.len() {
            if try_extend(working).is_err() {
                return None;
            }
        }
        if working.path[index].is_epic_or_terminal() {
            return Some(index);
        }
        index += 1;
    }
}

/// Like [`find_next_epic`], for callers that are only reachable before Ithaca.
///
/// # Panics
///
/// Panics when no epic tile can be reached.
pub(crate) fn next_epic_index(working: &mut GameState, from: usize) -> usize {
    find_next_epic(working, from)
        .unwrap_or_else(|| panic!("no epic tile reachable after index {from}"))
}

/// Return a copy of `state` with exactly one more tile on the path.
///
/// # Panics
///
/// Panics when the supply selected by the epic clock is exhausted.
#[must_use]
pub fn extend_path(state: &GameState) -> GameState {
    let mut working = state.clone();
    extend(&mut working);
    working
}
