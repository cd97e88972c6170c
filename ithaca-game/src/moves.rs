use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{COST_DRAW_CARD, COST_END_TURN, COST_LONG_SAIL, COST_REPAIR, COST_SHORT_SAIL};

/// Actions a player may spend their turn budget on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveName {
    DrawCard,
    Repair,
    /// One careful step forward.
    #[serde(alias = "careful_sail_1")]
    ShortSail,
    /// Two steps forward; only an undamaged ship may attempt it.
    #[serde(alias = "careful_sail_2")]
    LongSail,
    EndTurn,
}

/// Legal moves in presentation order; never more than five.
pub type MoveList = SmallVec<[MoveName; 5]>;

impl MoveName {
    pub const ALL: [Self; 5] = [
        Self::DrawCard,
        Self::Repair,
        Self::ShortSail,
        Self::LongSail,
        Self::EndTurn,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DrawCard => "draw_card",
            Self::Repair => "repair",
            Self::ShortSail => "short_sail",
            Self::LongSail => "long_sail",
            Self::EndTurn => "end_turn",
        }
    }

    /// Action points spent by this move.
    #[must_use]
    pub const fn cost(self) -> u8 {
        match self {
            Self::DrawCard => COST_DRAW_CARD,
            Self::Repair => COST_REPAIR,
            Self::ShortSail => COST_SHORT_SAIL,
            Self::LongSail => COST_LONG_SAIL,
            Self::EndTurn => COST_END_TURN,
        }
    }
}

impl fmt::Display for MoveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draw_card" | "draw" => Ok(Self::DrawCard),
            "repair" => Ok(Self::Repair),
            "short_sail" | "careful_sail_1" => Ok(Self::ShortSail),
            "long_sail" | "careful_sail_2" => Ok(Self::LongSail),
            "end_turn" => Ok(Self::EndTurn),
            _ => Err(()),
        }
    }
}
