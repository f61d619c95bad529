#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Immutable level catalogue for Delve.
//!
//! The catalogue parses a level document once, validates every layout, and
//! then serves pristine [`LevelDefinition`] values addressed by one-based
//! index for the lifetime of a session.

use delve_core::{Cell, CellCoord, CellKind, ChestRange, Grid, GridError, Rewards};
use thiserror::Error;

pub mod document;

use document::{
    code_for, kind_from_code, EntryPosition, LevelDocument, LevelEntry, Metadata, RangeEntry,
    RewardsEntry,
};

const BUILTIN_DOCUMENT: &str = include_str!("../levels/builtin.json");

/// Reasons a level document is rejected at load time.
#[derive(Debug, Error)]
pub enum DataError {
    /// The document is not valid JSON or does not match the schema.
    #[error("level document could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document lists no levels.
    #[error("level document contains no levels")]
    NoLevels,
    /// The declared grid size is zero.
    #[error("grid size must be positive")]
    ZeroGridSize,
    /// The chest reward range has `min` greater than `max`.
    #[error("chest reward range {min}..={max} is inverted")]
    InvertedChestRange {
        /// Declared lower bound.
        min: u64,
        /// Declared upper bound.
        max: u64,
    },
    /// A level's row count differs from the declared grid size.
    #[error("level {level} has {actual} rows, expected {expected}")]
    RowCount {
        /// One-based level index.
        level: u32,
        /// Declared grid size.
        expected: u32,
        /// Rows found in the level.
        actual: u32,
    },
    /// A row's length differs from the declared grid size.
    #[error("level {level} row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// One-based level index.
        level: u32,
        /// Zero-based row index.
        row: u32,
        /// Declared grid size.
        expected: u32,
        /// Cells found in the row.
        actual: u32,
    },
    /// A cell code does not name any cell type.
    #[error("level {level} cell {cell} uses unknown code {code}")]
    UnknownCellCode {
        /// One-based level index.
        level: u32,
        /// Offending cell.
        cell: CellCoord,
        /// Code found in the document.
        code: u8,
    },
    /// The grid model refused the layout.
    #[error("level {level} layout is invalid: {source}")]
    Layout {
        /// One-based level index.
        level: u32,
        /// Underlying grid error.
        source: GridError,
    },
    /// A level has no portal.
    #[error("level {level} has no portal")]
    MissingPortal {
        /// One-based level index.
        level: u32,
    },
    /// A level has more than one portal.
    #[error("level {level} has {count} portals, expected exactly one")]
    MultiplePortals {
        /// One-based level index.
        level: u32,
        /// Portals found.
        count: u32,
    },
    /// A level's treasure cells disagree with its declared total.
    #[error("level {level} declares {declared} treasures but contains {found}")]
    TreasureMismatch {
        /// One-based level index.
        level: u32,
        /// Declared treasure total.
        declared: u32,
        /// Treasure cells found.
        found: u32,
    },
    /// A level's entry position lies outside its grid.
    #[error("level {level} entry {entry} lies outside the grid")]
    EntryOutOfBounds {
        /// One-based level index.
        level: u32,
        /// Declared entry cell.
        entry: CellCoord,
    },
    /// A level's entry position is a wall.
    #[error("level {level} entry {entry} is a wall")]
    EntryBlocked {
        /// One-based level index.
        level: u32,
        /// Declared entry cell.
        entry: CellCoord,
    },
    /// A level's entry position is its portal.
    #[error("level {level} entry {entry} is the portal")]
    EntryOnPortal {
        /// One-based level index.
        level: u32,
        /// Declared entry cell.
        entry: CellCoord,
    },
}

/// Raised when a level index falls outside `1..=len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("level {index} is outside the catalogue range 1..={len}")]
pub struct OutOfRangeError {
    /// Requested one-based index.
    pub index: u32,
    /// Number of levels in the catalogue.
    pub len: u32,
}

/// Pristine definition of one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDefinition {
    index: u32,
    name: String,
    grid: Grid,
    entry: CellCoord,
    portal: CellCoord,
    rewards: Rewards,
}

impl LevelDefinition {
    /// One-based index of the level within its catalogue.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pristine layout. Never carries collection progress.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Fresh working copy of the layout for a newly started level.
    #[must_use]
    pub fn instantiate(&self) -> Grid {
        self.grid.clone()
    }

    /// Cell the player occupies when the level begins.
    #[must_use]
    pub const fn entry(&self) -> CellCoord {
        self.entry
    }

    /// Location of the level's single portal.
    #[must_use]
    pub const fn portal(&self) -> CellCoord {
        self.portal
    }

    /// Reward parameters applied while the level is active.
    #[must_use]
    pub const fn rewards(&self) -> Rewards {
        self.rewards
    }

    /// Treasures contained in the level.
    #[must_use]
    pub fn treasure_total(&self) -> u32 {
        self.grid.count(CellKind::Treasure)
    }

    /// Chests contained in the level.
    #[must_use]
    pub fn chest_total(&self) -> u32 {
        self.grid.count(CellKind::Chest)
    }
}

/// Ordered, read-only collection of validated levels.
///
/// A catalogue always holds at least one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCatalogue {
    grid_size: u32,
    rewards: Rewards,
    levels: Vec<LevelDefinition>,
}

impl LevelCatalogue {
    /// Parses and validates a JSON level document.
    pub fn from_json(source: &str) -> Result<Self, DataError> {
        let document: LevelDocument = serde_json::from_str(source)?;
        Self::from_document(document)
    }

    /// Validates an already deserialised document.
    pub fn from_document(document: LevelDocument) -> Result<Self, DataError> {
        let Metadata { grid_size, rewards } = document.metadata;
        if grid_size == 0 {
            return Err(DataError::ZeroGridSize);
        }
        let range = rewards.chest_diamonds_range;
        let chest_range = ChestRange::new(range.min, range.max).ok_or(
            DataError::InvertedChestRange {
                min: range.min,
                max: range.max,
            },
        )?;
        let rewards = Rewards::new(rewards.treasure_diamonds, chest_range);

        if document.levels.is_empty() {
            return Err(DataError::NoLevels);
        }

        let mut levels = Vec::with_capacity(document.levels.len());
        for (position, entry) in document.levels.into_iter().enumerate() {
            let index = u32::try_from(position + 1).unwrap_or(u32::MAX);
            levels.push(validate_level(index, entry, grid_size, rewards)?);
        }

        Ok(Self {
            grid_size,
            rewards,
            levels,
        })
    }

    /// Catalogue bundled with the engine.
    pub fn builtin() -> Result<Self, DataError> {
        Self::from_json(BUILTIN_DOCUMENT)
    }

    /// Number of levels in the catalogue.
    #[must_use]
    pub fn len(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    /// Always `false`; a validated catalogue holds at least one level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Side length of every grid.
    #[must_use]
    pub const fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Reward parameters shared by every level.
    #[must_use]
    pub const fn rewards(&self) -> Rewards {
        self.rewards
    }

    /// Returns the level at one-based `index`.
    pub fn level(&self, index: u32) -> Result<&LevelDefinition, OutOfRangeError> {
        let position = index.checked_sub(1).map(|value| value as usize);
        position
            .and_then(|position| self.levels.get(position))
            .ok_or(OutOfRangeError {
                index,
                len: self.len(),
            })
    }

    /// First level of the catalogue.
    #[must_use]
    pub fn opening(&self) -> &LevelDefinition {
        &self.levels[0]
    }

    /// Iterator over every level in order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    /// Converts the catalogue back into its document form.
    #[must_use]
    pub fn to_document(&self) -> LevelDocument {
        let levels = self
            .levels
            .iter()
            .map(|level| LevelEntry {
                name: Some(level.name.clone()),
                grid: level
                    .grid
                    .iter_rows()
                    .map(|row| row.iter().map(|cell| code_for(cell.kind())).collect())
                    .collect(),
                entry_position: EntryPosition {
                    row: level.entry.row(),
                    col: level.entry.column(),
                },
                treasure_count: Some(level.treasure_total()),
            })
            .collect();

        LevelDocument {
            levels,
            metadata: Metadata {
                grid_size: self.grid_size,
                rewards: RewardsEntry {
                    treasure_diamonds: self.rewards.treasure_diamonds(),
                    chest_diamonds_range: RangeEntry {
                        min: self.rewards.chest_range().min(),
                        max: self.rewards.chest_range().max(),
                    },
                },
            },
        }
    }
}

/// Loads the ordered level sequence from a JSON document.
pub fn load_levels(source: &str) -> Result<LevelCatalogue, DataError> {
    LevelCatalogue::from_json(source)
}

fn validate_level(
    level: u32,
    entry: LevelEntry,
    grid_size: u32,
    rewards: Rewards,
) -> Result<LevelDefinition, DataError> {
    let row_count = u32::try_from(entry.grid.len()).unwrap_or(u32::MAX);
    if row_count != grid_size {
        return Err(DataError::RowCount {
            level,
            expected: grid_size,
            actual: row_count,
        });
    }

    let mut layout = Vec::with_capacity(entry.grid.len());
    for (row_index, row) in entry.grid.iter().enumerate() {
        let row_index = u32::try_from(row_index).unwrap_or(u32::MAX);
        let width = u32::try_from(row.len()).unwrap_or(u32::MAX);
        if width != grid_size {
            return Err(DataError::RaggedRow {
                level,
                row: row_index,
                expected: grid_size,
                actual: width,
            });
        }

        let mut cells = Vec::with_capacity(row.len());
        for (column_index, code) in row.iter().copied().enumerate() {
            let column_index = u32::try_from(column_index).unwrap_or(u32::MAX);
            let kind = kind_from_code(code).ok_or(DataError::UnknownCellCode {
                level,
                cell: CellCoord::new(row_index, column_index),
                code,
            })?;
            cells.push(Cell::fresh(kind));
        }
        layout.push(cells);
    }

    let grid =
        Grid::from_rows(layout).map_err(|source| DataError::Layout { level, source })?;

    let mut portals = grid.positions_of(CellKind::Portal);
    let portal = portals.next().ok_or(DataError::MissingPortal { level })?;
    let extra_portals = u32::try_from(portals.count()).unwrap_or(u32::MAX);
    if extra_portals > 0 {
        return Err(DataError::MultiplePortals {
            level,
            count: extra_portals.saturating_add(1),
        });
    }

    let found = grid.count(CellKind::Treasure);
    if let Some(declared) = entry.treasure_count {
        if declared != found {
            return Err(DataError::TreasureMismatch {
                level,
                declared,
                found,
            });
        }
    }

    let entry_cell = CellCoord::new(entry.entry_position.row, entry.entry_position.col);
    if !grid.contains(entry_cell) {
        return Err(DataError::EntryOutOfBounds {
            level,
            entry: entry_cell,
        });
    }
    if !grid.is_walkable(entry_cell) {
        return Err(DataError::EntryBlocked {
            level,
            entry: entry_cell,
        });
    }
    if entry_cell == portal {
        return Err(DataError::EntryOnPortal {
            level,
            entry: entry_cell,
        });
    }

    Ok(LevelDefinition {
        index: level,
        name: entry.name.unwrap_or_else(|| format!("Level {level}")),
        grid,
        entry: entry_cell,
        portal,
        rewards,
    })
}
