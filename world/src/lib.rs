#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Delve.
//!
//! A [`Session`] owns the level catalogue, the working grid of the active
//! level and the live [`GameState`]. Commands are processed one at a time and
//! to completion by [`apply`]: the movement system validates the step, the
//! collection system resolves pickups, and the progression state machine
//! decides whether a portal confirmation advances the level or wins the game.

use delve_catalogue::{DataError, LevelCatalogue};
use delve_core::{CellKind, Command, Direction, Event, GameState, Grid, Rewards};
use delve_system_collection::Collection;
use delve_system_movement::{attempt_move, MoveResult};
use delve_system_progression::{advance_state, victory_state, PortalOutcome, Progression};
use tracing::{debug, info, warn};

/// Seed used for chest rewards when none is configured.
pub const DEFAULT_SEED: u64 = 0x5eed_d1a3_0c4e_57a1;

/// Represents one continuous run of the engine from level one onward.
#[derive(Clone, Debug)]
pub struct Session {
    catalogue: LevelCatalogue,
    grid: Grid,
    state: GameState,
    collection: Collection,
    progression: Progression,
    seed: u64,
    level_start_diamonds: u64,
}

impl Session {
    /// Creates a session positioned at the entry of the catalogue's first level.
    #[must_use]
    pub fn new(catalogue: LevelCatalogue, seed: u64) -> Self {
        let opening = catalogue.opening();
        let grid = opening.instantiate();
        let state = GameState::opening(opening.entry(), &grid);
        Self {
            catalogue,
            grid,
            state,
            collection: Collection::new(seed),
            progression: Progression::new(),
            seed,
            level_start_diamonds: 0,
        }
    }

    /// Creates a session over the built-in catalogue.
    pub fn builtin(seed: u64) -> Result<Self, DataError> {
        Ok(Self::new(LevelCatalogue::builtin()?, seed))
    }

    /// Processes a single intent and returns the resulting snapshot.
    ///
    /// Events produced along the way are discarded; use [`apply`] to observe
    /// them.
    pub fn dispatch(&mut self, command: Command) -> GameState {
        let mut events = Vec::new();
        apply(self, command, &mut events);
        self.state
    }

    fn restart(&mut self) {
        let opening = self.catalogue.opening();
        self.grid = opening.instantiate();
        self.state = GameState::opening(opening.entry(), &self.grid);
        self.collection.reseed(self.seed);
        self.progression.reset();
        self.level_start_diamonds = 0;
    }

    fn step(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.progression.accepts_input() || self.state.game_won {
            debug!(%direction, "move ignored after victory");
            return;
        }

        let from = self.state.position;
        let to = match attempt_move(from, direction, &self.grid) {
            MoveResult::Accepted { to } => to,
            MoveResult::Rejected(reason) => {
                debug!(%direction, ?reason, cell = %from, "move rejected");
                out_events.push(Event::MoveRejected { direction, reason });
                return;
            }
        };

        let moved = GameState {
            position: to,
            steps: self.state.steps.saturating_add(1),
            is_on_portal: self.grid.kind_at(to) == Some(CellKind::Portal),
            ..self.state
        };

        let rewards = self.level_rewards();
        let (next, pickup) =
            match self
                .collection
                .resolve_pickup(to, &mut self.grid, moved, &rewards)
            {
                Ok(resolved) => resolved,
                Err(error) => {
                    warn!(%error, cell = %to, "pickup lookup failed on an accepted move");
                    (moved, None)
                }
            };

        self.state = next;
        debug!(%from, %to, steps = next.steps, "player moved");
        out_events.push(Event::PlayerMoved {
            from,
            to,
            steps: next.steps,
        });

        if let Some(pickup) = pickup {
            debug!(?pickup, total = next.total_diamonds, "collectible picked up");
            out_events.push(pickup.event());
        }

        if next.is_on_portal {
            out_events.push(Event::PortalReached {
                level: next.current_level,
            });
        }
    }

    fn confirm_portal(&mut self, out_events: &mut Vec<Event>) {
        match self
            .progression
            .enter_portal(&self.state, self.catalogue.len())
        {
            PortalOutcome::Ignored => {
                debug!(
                    level = self.state.current_level,
                    on_portal = self.state.is_on_portal,
                    "portal confirmation ignored"
                );
            }
            PortalOutcome::Advance { completed, next } => {
                let level = match self.catalogue.level(next) {
                    Ok(level) => level,
                    Err(error) => {
                        warn!(%error, "next level missing from catalogue");
                        self.progression.begin_level();
                        return;
                    }
                };

                let diamonds_this_level = self.diamonds_this_level();
                info!(level = completed, diamonds_this_level, "level completed");
                out_events.push(Event::LevelCompleted {
                    level: completed,
                    diamonds_this_level,
                });

                let entry = level.entry();
                self.grid = level.instantiate();
                self.state = advance_state(&self.state, next, entry, &self.grid);
                self.level_start_diamonds = self.state.total_diamonds;
                self.progression.begin_level();
                debug!(level = next, %entry, name = level.name(), "level started");
                out_events.push(Event::LevelStarted { level: next, entry });
            }
            PortalOutcome::Victory => {
                let diamonds_this_level = self.diamonds_this_level();
                info!(
                    level = self.state.current_level,
                    diamonds_this_level, "final level completed"
                );
                out_events.push(Event::LevelCompleted {
                    level: self.state.current_level,
                    diamonds_this_level,
                });
                self.state = victory_state(&self.state);
                info!(
                    total_steps = self.state.steps,
                    total_diamonds = self.state.total_diamonds,
                    score = self.state.score(),
                    "game won"
                );
                out_events.push(Event::GameWon {
                    total_steps: self.state.steps,
                    total_diamonds: self.state.total_diamonds,
                });
            }
        }
    }

    fn level_rewards(&self) -> Rewards {
        self.catalogue
            .level(self.state.current_level)
            .map_or(self.catalogue.rewards(), |level| level.rewards())
    }

    fn diamonds_this_level(&self) -> u64 {
        self.state
            .total_diamonds
            .saturating_sub(self.level_start_diamonds)
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move { direction } => session.step(direction, out_events),
        Command::EnterPortal => session.confirm_portal(out_events),
        Command::Reset => {
            session.restart();
            info!(seed = session.seed, "session reset");
            out_events.push(Event::SessionReset);
            out_events.push(Event::LevelStarted {
                level: session.state.current_level,
                entry: session.state.position,
            });
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use delve_catalogue::{LevelCatalogue, LevelDefinition};
    use delve_core::{GameState, Grid};
    use delve_system_progression::Phase;

    use super::Session;

    /// Current snapshot of the session.
    #[must_use]
    pub fn state(session: &Session) -> GameState {
        session.state
    }

    /// Working grid of the active level, including collection flags.
    #[must_use]
    pub fn grid(session: &Session) -> &Grid {
        &session.grid
    }

    /// Catalogue the session plays through.
    #[must_use]
    pub fn catalogue(session: &Session) -> &LevelCatalogue {
        &session.catalogue
    }

    /// Definition of the active level.
    #[must_use]
    pub fn current_level(session: &Session) -> Option<&LevelDefinition> {
        session.catalogue.level(session.state.current_level).ok()
    }

    /// Number of levels in the session's catalogue.
    #[must_use]
    pub fn total_levels(session: &Session) -> u32 {
        session.catalogue.len()
    }

    /// Diamonds gathered since the active level started.
    #[must_use]
    pub fn diamonds_this_level(session: &Session) -> u64 {
        session.diamonds_this_level()
    }

    /// Phase of the progression state machine.
    #[must_use]
    pub fn phase(session: &Session) -> Phase {
        session.progression.phase()
    }

    /// Read-only view bundling everything a renderer draws.
    #[must_use]
    pub fn view(session: &Session) -> SessionView<'_> {
        SessionView {
            state: session.state,
            grid: &session.grid,
            level_name: current_level(session).map_or("", LevelDefinition::name),
            total_levels: total_levels(session),
        }
    }

    /// Snapshot plus the active grid, borrowed from a session.
    #[derive(Clone, Copy, Debug)]
    pub struct SessionView<'a> {
        /// Session snapshot.
        pub state: GameState,
        /// Active grid with collection flags.
        pub grid: &'a Grid,
        /// Display name of the active level.
        pub level_name: &'a str,
        /// Number of levels in the catalogue.
        pub total_levels: u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{CellCoord, MoveRejection};

    const TWO_LEVELS: &str = r#"{
        "metadata": { "gridSize": 3,
            "rewards": { "treasureDiamonds": 1, "chestDiamondsRange": { "min": 4, "max": 4 } } },
        "levels": [
            { "grid": [[0, 2, 3], [1, 4, 1], [0, 0, 0]], "entryPosition": { "row": 0, "col": 0 } },
            { "grid": [[3, 0, 0], [1, 1, 0], [2, 0, 0]], "entryPosition": { "row": 2, "col": 2 } }
        ]
    }"#;

    fn session() -> Session {
        Session::new(
            LevelCatalogue::from_json(TWO_LEVELS).expect("valid catalogue"),
            9,
        )
    }

    #[test]
    fn session_starts_at_first_entry() {
        let session = session();
        let state = query::state(&session);
        assert_eq!(state.current_level, 1);
        assert_eq!(state.position, CellCoord::new(0, 0));
        assert_eq!(state.total_treasures, 1);
        assert_eq!(state.total_chests, 1);
        assert_eq!(query::catalogue(&session).opening().entry(), state.position);
    }

    #[test]
    fn rejected_move_emits_reason_only() {
        let mut session = session();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Move {
                direction: Direction::Up,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::MoveRejected {
                direction: Direction::Up,
                reason: MoveRejection::OutOfBounds
            }]
        );
        assert_eq!(query::state(&session).steps, 0);
    }

    #[test]
    fn level_completion_reports_level_diamonds() {
        let mut session = session();
        let mut events = Vec::new();
        for direction in [Direction::Right, Direction::Right] {
            apply(&mut session, Command::Move { direction }, &mut events);
        }
        assert!(events.contains(&Event::PortalReached { level: 1 }));

        events.clear();
        apply(&mut session, Command::EnterPortal, &mut events);
        assert_eq!(
            events,
            vec![
                Event::LevelCompleted {
                    level: 1,
                    diamonds_this_level: 1
                },
                Event::LevelStarted {
                    level: 2,
                    entry: CellCoord::new(2, 2)
                },
            ]
        );
        assert_eq!(query::diamonds_this_level(&session), 0);
        assert_eq!(query::view(&session).level_name, "Level 2");
    }
}
