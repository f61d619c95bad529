#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that validates single-cell player steps.

use delve_core::{CellCoord, CellKind, Direction, Grid, MoveRejection};

/// Outcome of a single movement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveResult {
    /// The step is legal and the player should occupy `to`.
    Accepted {
        /// Cell the player moves into.
        to: CellCoord,
    },
    /// The step was refused and the player stays put.
    Rejected(MoveRejection),
}

impl MoveResult {
    /// Increment applied to the step counter for this outcome.
    #[must_use]
    pub const fn step_delta(&self) -> u64 {
        match self {
            Self::Accepted { .. } => 1,
            Self::Rejected(_) => 0,
        }
    }

    /// Destination cell when the step was accepted.
    #[must_use]
    pub const fn destination(&self) -> Option<CellCoord> {
        match self {
            Self::Accepted { to } => Some(*to),
            Self::Rejected(_) => None,
        }
    }
}

/// Validates a one-cell step from `current` toward `direction`.
///
/// The candidate cell is rejected when it lies outside the grid or is a wall.
/// The grid is only read; collection and portal handling happen elsewhere.
#[must_use]
pub fn attempt_move(current: CellCoord, direction: Direction, grid: &Grid) -> MoveResult {
    let Some(candidate) = current.step(direction) else {
        return MoveResult::Rejected(MoveRejection::OutOfBounds);
    };

    match grid.kind_at(candidate) {
        None => MoveResult::Rejected(MoveRejection::OutOfBounds),
        Some(CellKind::Wall) => MoveResult::Rejected(MoveRejection::Wall),
        Some(_) => MoveResult::Accepted { to: candidate },
    }
}
