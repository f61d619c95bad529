//! Grid model: one level's cell layout plus its collection flags.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Discriminant describing what a cell is, independent of collection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable cell.
    Wall,
    /// Plain walkable cell.
    Floor,
    /// Collectible worth a fixed diamond reward.
    Treasure,
    /// Cell whose confirmed entry advances the level or ends the game.
    Portal,
    /// Collectible worth a randomly sampled diamond reward.
    Chest,
}

impl CellKind {
    /// Every kind in a stable order.
    pub const ALL: [CellKind; 5] = [
        CellKind::Wall,
        CellKind::Floor,
        CellKind::Treasure,
        CellKind::Portal,
        CellKind::Chest,
    ];
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::Treasure => "treasure",
            Self::Portal => "portal",
            Self::Chest => "chest",
        };
        f.write_str(name)
    }
}

/// One grid square.
///
/// Only collectible variants carry a `collected` flag, so a wall or portal can
/// never be marked as collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Impassable cell.
    Wall,
    /// Plain walkable cell.
    Floor,
    /// Portal cell.
    Portal,
    /// Treasure cell.
    Treasure {
        /// Whether the treasure was already picked up.
        collected: bool,
    },
    /// Chest cell.
    Chest {
        /// Whether the chest was already opened.
        collected: bool,
    },
}

impl Cell {
    /// Wall cell.
    pub const WALL: Cell = Cell::Wall;
    /// Floor cell.
    pub const FLOOR: Cell = Cell::Floor;
    /// Portal cell.
    pub const PORTAL: Cell = Cell::Portal;
    /// Treasure that has not been picked up.
    pub const TREASURE: Cell = Cell::Treasure { collected: false };
    /// Chest that has not been opened.
    pub const CHEST: Cell = Cell::Chest { collected: false };

    /// Creates a pristine cell of the provided kind.
    #[must_use]
    pub const fn fresh(kind: CellKind) -> Self {
        match kind {
            CellKind::Wall => Self::WALL,
            CellKind::Floor => Self::FLOOR,
            CellKind::Treasure => Self::TREASURE,
            CellKind::Portal => Self::PORTAL,
            CellKind::Chest => Self::CHEST,
        }
    }

    /// Kind of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        match self {
            Self::Wall => CellKind::Wall,
            Self::Floor => CellKind::Floor,
            Self::Portal => CellKind::Portal,
            Self::Treasure { .. } => CellKind::Treasure,
            Self::Chest { .. } => CellKind::Chest,
        }
    }

    /// Whether the cell was collected. Always `false` for non-collectibles.
    #[must_use]
    pub const fn is_collected(&self) -> bool {
        match self {
            Self::Treasure { collected } | Self::Chest { collected } => *collected,
            Self::Wall | Self::Floor | Self::Portal => false,
        }
    }
}

/// Errors raised when the grid model is used outside its contract.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested cell lies outside the grid.
    #[error("cell {cell} lies outside the {rows}x{columns} grid")]
    Bounds {
        /// Cell that was requested.
        cell: CellCoord,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
    /// Collection was attempted on a cell that cannot be collected.
    #[error("cell {cell} is a {kind} and cannot be collected")]
    InvalidCell {
        /// Cell that was targeted.
        cell: CellCoord,
        /// Kind found at the cell.
        kind: CellKind,
    },
    /// The layout provided no rows or no columns.
    #[error("grid layout is empty")]
    Empty,
    /// A row's length differs from the first row's length.
    #[error("row {row} has {actual} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: u32,
        /// Length of the first row.
        expected: u32,
        /// Length of the offending row.
        actual: u32,
    },
}

/// Rectangular, row-major cell layout for a single level.
///
/// Every cell is immutable except for the collection flag of treasures and
/// chests, which only ever moves from `false` to `true`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from rows of cells, rejecting empty or ragged layouts.
    pub fn from_rows(layout: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let expected = layout.first().map_or(0, Vec::len);
        if layout.is_empty() || expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(layout.len() * expected);
        for (index, row) in layout.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::Ragged {
                    row: saturating_u32(index),
                    expected: saturating_u32(expected),
                    actual: saturating_u32(row.len()),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            rows: saturating_u32(layout.len()),
            columns: saturating_u32(expected),
            cells,
        })
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Returns the cell at `cell`.
    pub fn cell_at(&self, cell: CellCoord) -> Result<Cell, GridError> {
        self.index(cell)
            .map(|index| self.cells[index])
            .ok_or(GridError::Bounds {
                cell,
                rows: self.rows,
                columns: self.columns,
            })
    }

    /// Kind of the cell at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn kind_at(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index].kind())
    }

    /// Reports whether the player may stand on `cell`.
    ///
    /// Cells outside the grid are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.kind_at(cell).is_some_and(|kind| kind != CellKind::Wall)
    }

    /// Marks the treasure or chest at `cell` as collected.
    ///
    /// Returns `Ok(true)` when the flag flipped and `Ok(false)` when the cell
    /// had already been collected.
    pub fn mark_collected(&mut self, cell: CellCoord) -> Result<bool, GridError> {
        let index = self.index(cell).ok_or(GridError::Bounds {
            cell,
            rows: self.rows,
            columns: self.columns,
        })?;

        match &mut self.cells[index] {
            Cell::Treasure { collected } | Cell::Chest { collected } => {
                let flipped = !*collected;
                *collected = true;
                Ok(flipped)
            }
            other => Err(GridError::InvalidCell {
                cell,
                kind: other.kind(),
            }),
        }
    }

    /// Counts the cells of the provided kind, collected or not.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> u32 {
        saturating_u32(self.cells.iter().filter(|cell| cell.kind() == kind).count())
    }

    /// Counts the collectible cells of `kind` that were already collected.
    #[must_use]
    pub fn count_collected(&self, kind: CellKind) -> u32 {
        saturating_u32(
            self.cells
                .iter()
                .filter(|cell| cell.kind() == kind && cell.is_collected())
                .count(),
        )
    }

    /// Coordinates of every cell of the provided kind in row-major order.
    pub fn positions_of(&self, kind: CellKind) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| cell.kind() == kind)
            .map(|(index, _)| self.coord_of(index))
    }

    /// Iterator over the grid's rows, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.columns.max(1) as usize)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn coord_of(&self, index: usize) -> CellCoord {
        let width = self.columns.max(1) as usize;
        CellCoord::new(saturating_u32(index / width), saturating_u32(index % width))
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
