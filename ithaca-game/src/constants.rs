//! Centralized rule and tuning constants for the Ithaca voyage.
//!
//! These values define the deterministic math of the rules engine. Keeping
//! them together means the balance can only change through reviewed code,
//! never through external assets.

// Turn structure -----------------------------------------------------------
/// Actions granted at the start of every non-skipped turn.
pub const ACTION_BUDGET: u8 = 5;
/// Damage at which a ship is wrecked.
pub const SHIPWRECK_DAMAGE: u8 = 3;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

// Move costs ---------------------------------------------------------------
pub(crate) const COST_DRAW_CARD: u8 = 1;
pub(crate) const COST_REPAIR: u8 = 1;
pub(crate) const COST_SHORT_SAIL: u8 = 3;
pub(crate) const COST_LONG_SAIL: u8 = 5;
pub(crate) const COST_END_TURN: u8 = 0;

// Track --------------------------------------------------------------------
/// Open-sea tiles available for track extension.
pub const OPEN_SEA_SUPPLY: usize = 24;
/// Epic clock value at which the next extension draws an epic tile.
pub(crate) const EPIC_CLOCK_PERIOD: u8 = 2;
pub(crate) const START_TILE_ID: &str = "troy";

// Aeolus -------------------------------------------------------------------
pub(crate) const AEOLUS_MAX_STEPS: u8 = 3;

// Sea deck -----------------------------------------------------------------
pub const SEA_DECK_SIZE: usize = 50;

// Deterministic generator --------------------------------------------------
/// Lehmer modulus, the Mersenne prime 2^31 - 1.
pub const LEHMER_MODULUS: u64 = 2_147_483_647;
pub(crate) const LEHMER_MULTIPLIER: u64 = 48_271;
pub(crate) const DEFAULT_SEED: u64 = 1;

// Persistence --------------------------------------------------------------
pub(crate) const SNAPSHOT_VERSION: u32 = 1;

// Logging targets ------------------------------------------------------------
pub(crate) const LOG_TARGET_RULES: &str = "ithaca::rules";
pub(crate) const LOG_TARGET_MOVEMENT: &str = "ithaca::movement";
pub(crate) const LOG_TARGET_DECK: &str = "ithaca::deck";
