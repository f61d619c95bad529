//! Serde schema for the level document consumed by the catalogue.

use serde::{Deserialize, Serialize};

use delve_core::CellKind;

/// Root of a level document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDocument {
    /// Ordered level layouts.
    pub levels: Vec<LevelEntry>,
    /// Parameters shared by every level.
    pub metadata: Metadata,
}

/// A single level as it appears in the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelEntry {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rows of cell-type codes, top to bottom.
    pub grid: Vec<Vec<u8>>,
    /// Cell the player occupies when the level begins.
    pub entry_position: EntryPosition,
    /// Declared number of treasures. When omitted the counted total is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasure_count: Option<u32>,
}

/// Row and column of a level's entry cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPosition {
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub col: u32,
}

/// Parameters shared by every level in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Side length of every square grid.
    pub grid_size: u32,
    /// Reward parameters.
    pub rewards: RewardsEntry,
}

/// Reward parameters as written in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsEntry {
    /// Diamonds awarded per treasure.
    pub treasure_diamonds: u64,
    /// Inclusive chest reward range.
    pub chest_diamonds_range: RangeEntry,
}

/// Inclusive numeric range as written in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEntry {
    /// Lower bound.
    pub min: u64,
    /// Upper bound.
    pub max: u64,
}

/// Maps a document cell code to the cell kind it denotes.
#[must_use]
pub fn kind_from_code(code: u8) -> Option<CellKind> {
    match code {
        0 => Some(CellKind::Floor),
        1 => Some(CellKind::Wall),
        2 => Some(CellKind::Treasure),
        3 => Some(CellKind::Portal),
        4 => Some(CellKind::Chest),
        _ => None,
    }
}

/// Maps a cell kind back to its document code.
#[must_use]
pub const fn code_for(kind: CellKind) -> u8 {
    match kind {
        CellKind::Floor => 0,
        CellKind::Wall => 1,
        CellKind::Treasure => 2,
        CellKind::Portal => 3,
        CellKind::Chest => 4,
    }
}
