//! Track tiles and the two finite supplies the track is drawn from.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::constants::{OPEN_SEA_SUPPLY, START_TILE_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCategory {
    /// Troy, the single starting tile.
    Start,
    OpenSea,
    Epic,
    /// Ithaca, the finish.
    Terminal,
}

/// Named encounter carried by an epic or terminal tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpicKind {
    SafeHarbor,
    SoldierAttack,
    LotusEaters,
    Cyclops,
    Aeolus,
    Circe,
    Underworld,
    Sirens,
    SunGodsCattle,
    Ithaca,
}

impl EpicKind {
    /// Supply order; the last entry is the terminal tile.
    pub const ALL: [Self; 10] = [
        Self::SafeHarbor,
        Self::SoldierAttack,
        Self::LotusEaters,
        Self::Cyclops,
        Self::Aeolus,
        Self::Circe,
        Self::Underworld,
        Self::Sirens,
        Self::SunGodsCattle,
        Self::Ithaca,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SafeHarbor => "safe_harbor",
            Self::SoldierAttack => "soldier_attack",
            Self::LotusEaters => "lotus_eaters",
            Self::Cyclops => "cyclops",
            Self::Aeolus => "aeolus",
            Self::Circe => "circe",
            Self::Underworld => "underworld",
            Self::Sirens => "sirens",
            Self::SunGodsCattle => "sun_gods_cattle",
            Self::Ithaca => "ithaca",
        }
    }

    /// Display name shown to players.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SafeHarbor => "Safe Harbor",
            Self::SoldierAttack => "Soldier Attack",
            Self::LotusEaters => "Lotus-Eaters",
            Self::Cyclops => "Cyclops",
            Self::Aeolus => "Aeolus",
            Self::Circe => "Circe",
            Self::Underworld => "Underworld",
            Self::Sirens => "Sirens",
            Self::SunGodsCattle => "Sun God's Cattle",
            Self::Ithaca => "Ithaca",
        }
    }

    /// One-line rules reminder.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SafeHarbor => "Fully repair all damage.",
            Self::SoldierAttack => "Take 1 damage; shipwreck at 3.",
            Self::LotusEaters => "Move forward 1 and skip your next turn.",
            Self::Cyclops => {
                "First visitor becomes stuck; the next arrival frees everyone and all sail forward 2."
            }
            Self::Aeolus => {
                "Choose 0-3 steps forward; each step adds 1 damage without sinking the ship."
            }
            Self::Circe => "End turn; next turn starts with a jump to the next epic tile.",
            Self::Underworld => "Move back 1 tile and resolve it.",
            Self::Sirens => "Spend all 5 actions this turn; earn a peek ahead after finishing.",
            Self::SunGodsCattle => "Backtrack to the nearest prior epic that is not Safe Harbor.",
            Self::Ithaca => "Reach Ithaca to win the game.",
        }
    }
}

impl fmt::Display for EpicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EpicKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// A single track position. Immutable once placed on the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    pub category: TileCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<EpicKind>,
}

impl Tile {
    #[must_use]
    pub fn start() -> Self {
        Self {
            id: START_TILE_ID.to_string(),
            category: TileCategory::Start,
            epic: None,
        }
    }

    #[must_use]
    pub fn open_sea(ordinal: usize) -> Self {
        Self {
            id: format!("open_{ordinal}"),
            category: TileCategory::OpenSea,
            epic: None,
        }
    }

    /// Epic tile for `kind`; Ithaca is categorized as terminal.
    #[must_use]
    pub fn epic(ordinal: usize, kind: EpicKind) -> Self {
        let category = if kind == EpicKind::Ithaca {
            TileCategory::Terminal
        } else {
            TileCategory::Epic
        };
        Self {
            id: format!("epic_{ordinal}_{}", kind.as_str()),
            category,
            epic: Some(kind),
        }
    }

    /// Whether landing here dispatches an encounter.
    #[must_use]
    pub const fn is_epic_or_terminal(&self) -> bool {
        matches!(self.category, TileCategory::Epic | TileCategory::Terminal)
    }

    #[must_use]
    pub fn is_kind(&self, kind: EpicKind) -> bool {
        self.epic == Some(kind)
    }
}

/// The 24 open-sea tiles, in draw order.
#[must_use]
pub fn open_sea_supply() -> VecDeque<Tile> {
    (1..=OPEN_SEA_SUPPLY).map(Tile::open_sea).collect()
}

/// The ten epic tiles in their fixed order, ending with Ithaca.
#[must_use]
pub fn epic_supply() -> VecDeque<Tile> {
    EpicKind::ALL
        .into_iter()
        .enumerate()
        .map(|(index, kind)| Tile::epic(index + 1, kind))
        .collect()
}

/// A fresh path holding only the starting tile.
#[must_use]
pub fn initial_path() -> Vec<Tile> {
    vec![Tile::start()]
}
