#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progression state machine governing level completion and victory.
//!
//! Portal entry is a two-intent protocol: stepping onto the portal only flags
//! the snapshot, and a separate confirmation drives the transition to the next
//! level or to the terminal [`Phase::GameWon`] state.

use delve_core::{CellCoord, CellKind, GameState, Grid};

/// Phases of the progression state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The player is exploring the active level.
    #[default]
    Playing,
    /// The active level was completed and the next one has not started yet.
    LevelComplete,
    /// The final portal was entered. Terminal.
    GameWon,
}

/// Result of confirming portal entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortalOutcome {
    /// The confirmation was not applicable and nothing changed.
    Ignored,
    /// A non-final level was completed.
    Advance {
        /// Level that was completed.
        completed: u32,
        /// Level that must be started next.
        next: u32,
    },
    /// The final level was completed.
    Victory,
}

/// Tracks the progression phase across a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Progression {
    phase: Phase,
}

impl Progression {
    /// Creates a state machine in the initial `Playing` phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Playing,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Reports whether movement intents are still honoured.
    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        matches!(self.phase, Phase::Playing)
    }

    /// Handles an explicit portal confirmation.
    ///
    /// Off the portal, or once the game is won, the confirmation is ignored.
    /// On a non-final level the machine moves to `LevelComplete` and expects
    /// [`Progression::begin_level`] once the next level is in place.
    pub fn enter_portal(&mut self, state: &GameState, total_levels: u32) -> PortalOutcome {
        if !self.accepts_input() || state.game_won || !state.is_on_portal {
            return PortalOutcome::Ignored;
        }

        if state.current_level >= total_levels {
            self.phase = Phase::GameWon;
            PortalOutcome::Victory
        } else {
            self.phase = Phase::LevelComplete;
            PortalOutcome::Advance {
                completed: state.current_level,
                next: state.current_level + 1,
            }
        }
    }

    /// Returns to `Playing` after the next level was instantiated.
    pub fn begin_level(&mut self) {
        if self.phase == Phase::LevelComplete {
            self.phase = Phase::Playing;
        }
    }

    /// Discards progress and returns to the initial phase.
    pub fn reset(&mut self) {
        self.phase = Phase::Playing;
    }
}

/// Snapshot for the first moment of `level`, entered at `entry` on `grid`.
///
/// Steps, diamonds and collection counters carry over from `previous`. The
/// totals grow by the collectibles of the fresh grid.
#[must_use]
pub fn advance_state(previous: &GameState, level: u32, entry: CellCoord, grid: &Grid) -> GameState {
    GameState {
        current_level: level,
        position: entry,
        total_treasures: previous
            .total_treasures
            .saturating_add(grid.count(CellKind::Treasure)),
        total_chests: previous
            .total_chests
            .saturating_add(grid.count(CellKind::Chest)),
        is_on_portal: grid.kind_at(entry) == Some(CellKind::Portal),
        game_won: false,
        ..*previous
    }
}

/// Terminal snapshot reached by entering the final portal.
#[must_use]
pub const fn victory_state(previous: &GameState) -> GameState {
    GameState {
        game_won: true,
        ..*previous
    }
}
