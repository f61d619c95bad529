#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delve dungeon engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and the pure gameplay systems. Adapters submit
//! [`Command`] values describing player intents, the session executes each
//! command to completion, and then broadcasts [`Event`] values that
//! collaborators (renderers, the ledger client) consume without being able to
//! influence the engine. Snapshots of the session are exposed as plain
//! [`GameState`] values that are replaced wholesale on every transition.

use std::fmt;

use serde::{Deserialize, Serialize};

mod grid;

pub use grid::{Cell, CellKind, Grid, GridError};

/// Multiplier applied to collected diamonds when presenting a score.
pub const SCORE_PER_DIAMOND: u64 = 3;

/// Commands that express every intent the session accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Requests that the player step one cell in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Confirms entry into the portal the player is standing on.
    EnterPortal,
    /// Discards all progress and restarts the session at the first level.
    Reset,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after completing the move.
        to: CellCoord,
        /// Session-wide step counter after the move.
        steps: u64,
    },
    /// Reports that a movement intent was refused without changing state.
    MoveRejected {
        /// Direction requested by the player.
        direction: Direction,
        /// Specific reason the move was refused.
        reason: MoveRejection,
    },
    /// Confirms that a treasure was picked up.
    TreasureCollected {
        /// Cell that held the treasure.
        cell: CellCoord,
        /// Diamonds awarded for the treasure.
        diamonds: u64,
    },
    /// Confirms that a chest was opened and its reward sampled.
    ChestOpened {
        /// Cell that held the chest.
        cell: CellCoord,
        /// Diamonds rolled for this chest. The value never changes afterwards.
        diamonds: u64,
    },
    /// Announces that the player is standing on the level's portal.
    PortalReached {
        /// One-based level whose portal was reached.
        level: u32,
    },
    /// Announces that the player confirmed the portal of the active level.
    ///
    /// The final level also reports completion, immediately before `GameWon`.
    LevelCompleted {
        /// One-based index of the completed level.
        level: u32,
        /// Diamonds gathered while the completed level was active.
        diamonds_this_level: u64,
    },
    /// Announces that a fresh level became active.
    LevelStarted {
        /// One-based index of the level that started.
        level: u32,
        /// Cell the player occupies when the level begins.
        entry: CellCoord,
    },
    /// Announces that the final portal was entered and the session concluded.
    GameWon {
        /// Steps accumulated across the whole session.
        total_steps: u64,
        /// Diamonds accumulated across the whole session.
        total_diamonds: u64,
    },
    /// Confirms that all progress was discarded.
    SessionReset,
}

/// Reasons a movement intent may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The candidate cell lies beyond the grid edge.
    OutOfBounds,
    /// The candidate cell is a wall.
    Wall,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column delta applied by a single step.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// The origin sits at the top-left corner of the grid and rows grow downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Cell reached by stepping once in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern, not the coordinate's.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (row_delta, column_delta) = direction.delta();
        let row = u32::try_from(i64::from(self.row) + row_delta).ok()?;
        let column = u32::try_from(i64::from(self.column) + column_delta).ok()?;
        Some(CellCoord::new(row, column))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Inclusive range of diamonds a chest may award.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChestRange {
    min: u64,
    max: u64,
}

impl ChestRange {
    /// Creates a chest range, returning `None` when `min` exceeds `max`.
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Option<Self> {
        if min > max {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Smallest reward a chest may roll.
    #[must_use]
    pub const fn min(&self) -> u64 {
        self.min
    }

    /// Largest reward a chest may roll.
    #[must_use]
    pub const fn max(&self) -> u64 {
        self.max
    }

    /// Reports whether `value` lies inside the range.
    #[must_use]
    pub const fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Reward parameters attached to every level of a catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rewards {
    treasure_diamonds: u64,
    chest_range: ChestRange,
}

impl Rewards {
    /// Creates a new reward descriptor.
    #[must_use]
    pub const fn new(treasure_diamonds: u64, chest_range: ChestRange) -> Self {
        Self {
            treasure_diamonds,
            chest_range,
        }
    }

    /// Diamonds awarded by every treasure.
    #[must_use]
    pub const fn treasure_diamonds(&self) -> u64 {
        self.treasure_diamonds
    }

    /// Range sampled once per chest when it is opened.
    #[must_use]
    pub const fn chest_range(&self) -> ChestRange {
        self.chest_range
    }
}

/// Human-facing summary of where the session stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// The player is roaming the current level.
    Exploring,
    /// The player stands on the portal and may confirm entry.
    OnPortal,
    /// The final portal was entered.
    Victory,
}

impl SessionStatus {
    /// Prompt shown to the player for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exploring => "Exploring",
            Self::OnPortal => "Press Space to Enter",
            Self::Victory => "Victory!",
        }
    }
}

/// Authoritative snapshot of a session.
///
/// Snapshots are never mutated in place by the engine: every accepted
/// transition produces a new value, so an observer holding a copy always sees
/// a consistent picture. Collection counters and their totals are
/// session-wide; the totals grow as each new level is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// One-based index of the active level.
    pub current_level: u32,
    /// Cell the player occupies.
    pub position: CellCoord,
    /// Accepted moves across the session. Never decreases.
    pub steps: u64,
    /// Treasures collected across the session.
    pub treasures_collected: u32,
    /// Treasures present in every level entered so far.
    pub total_treasures: u32,
    /// Chests opened across the session.
    pub chests_collected: u32,
    /// Chests present in every level entered so far.
    pub total_chests: u32,
    /// Diamonds accumulated across the session.
    pub total_diamonds: u64,
    /// Whether the cell at `position` is the level's portal.
    pub is_on_portal: bool,
    /// Whether the final portal was entered.
    pub game_won: bool,
}

impl GameState {
    /// Creates the opening snapshot for a level one grid.
    #[must_use]
    pub fn opening(entry: CellCoord, grid: &Grid) -> Self {
        Self {
            current_level: 1,
            position: entry,
            steps: 0,
            treasures_collected: 0,
            total_treasures: grid.count(CellKind::Treasure),
            chests_collected: 0,
            total_chests: grid.count(CellKind::Chest),
            total_diamonds: 0,
            is_on_portal: grid.kind_at(entry) == Some(CellKind::Portal),
            game_won: false,
        }
    }

    /// Score presented to the player.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.total_diamonds.saturating_mul(SCORE_PER_DIAMOND)
    }

    /// Status prompt derived from the snapshot.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        if self.game_won {
            SessionStatus::Victory
        } else if self.is_on_portal {
            SessionStatus::OnPortal
        } else {
            SessionStatus::Exploring
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_off_the_top_left_edge_yields_none() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Down), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.step(Direction::Right), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn chest_range_rejects_inverted_bounds() {
        assert!(ChestRange::new(5, 2).is_none());
        let range = ChestRange::new(2, 2).expect("degenerate range is valid");
        assert!(range.contains(2));
        assert!(!range.contains(3));
    }

    #[test]
    fn score_is_three_diamonds_apiece() {
        let grid = Grid::from_rows(vec![vec![Cell::FLOOR, Cell::PORTAL]]).expect("valid grid");
        let mut state = GameState::opening(CellCoord::new(0, 0), &grid);
        state.total_diamonds = 7;
        assert_eq!(state.score(), 21);
    }

    #[test]
    fn status_prefers_victory_over_portal() {
        let grid = Grid::from_rows(vec![vec![Cell::PORTAL]]).expect("valid grid");
        let mut state = GameState::opening(CellCoord::new(0, 0), &grid);
        assert_eq!(state.status(), SessionStatus::OnPortal);
        state.game_won = true;
        assert_eq!(state.status(), SessionStatus::Victory);
        assert_eq!(state.status().label(), "Victory!");
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = Event::LevelCompleted {
            level: 2,
            diamonds_this_level: 9,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        let restored: Event = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, event);
    }
}
