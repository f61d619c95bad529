#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collection system that awards diamonds for treasures and chests.
//!
//! Chest rewards are drawn from a seeded [`ChaCha8Rng`] so a session replayed
//! with the same seed and the same intents produces identical rewards.

use delve_core::{Cell, CellCoord, Event, GameState, Grid, GridError, Rewards};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reward granted by stepping onto an uncollected cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pickup {
    /// A treasure was picked up.
    Treasure {
        /// Cell that held the treasure.
        cell: CellCoord,
        /// Diamonds awarded.
        diamonds: u64,
    },
    /// A chest was opened.
    Chest {
        /// Cell that held the chest.
        cell: CellCoord,
        /// Diamonds rolled for the chest.
        diamonds: u64,
    },
}

impl Pickup {
    /// Diamonds awarded by the pickup.
    #[must_use]
    pub const fn diamonds(&self) -> u64 {
        match self {
            Self::Treasure { diamonds, .. } | Self::Chest { diamonds, .. } => *diamonds,
        }
    }

    /// Event announcing the pickup.
    #[must_use]
    pub fn event(&self) -> Event {
        match *self {
            Self::Treasure { cell, diamonds } => Event::TreasureCollected { cell, diamonds },
            Self::Chest { cell, diamonds } => Event::ChestOpened { cell, diamonds },
        }
    }
}

/// Stateful collection system owning the chest reward generator.
#[derive(Clone, Debug)]
pub struct Collection {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Collection {
    /// Creates a collection system whose chest rolls derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the generator was last initialised with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Restarts the reward sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// Awards whatever the player finds on `position`.
    ///
    /// Uncollected treasures and chests are flagged on `grid` and their
    /// diamonds folded into a new snapshot. Any other cell, or a cell already
    /// collected, leaves both the grid and the snapshot untouched.
    pub fn resolve_pickup(
        &mut self,
        position: CellCoord,
        grid: &mut Grid,
        state: GameState,
        rewards: &Rewards,
    ) -> Result<(GameState, Option<Pickup>), GridError> {
        let pickup = match grid.cell_at(position)? {
            Cell::Treasure { collected: false } => Pickup::Treasure {
                cell: position,
                diamonds: rewards.treasure_diamonds(),
            },
            Cell::Chest { collected: false } => Pickup::Chest {
                cell: position,
                diamonds: self.roll_chest(rewards),
            },
            _ => return Ok((state, None)),
        };

        if !grid.mark_collected(position)? {
            return Ok((state, None));
        }

        let mut next = state;
        match pickup {
            Pickup::Treasure { .. } => {
                next.treasures_collected = next.treasures_collected.saturating_add(1);
            }
            Pickup::Chest { .. } => {
                next.chests_collected = next.chests_collected.saturating_add(1);
            }
        }
        next.total_diamonds = next.total_diamonds.saturating_add(pickup.diamonds());
        Ok((next, Some(pickup)))
    }

    fn roll_chest(&mut self, rewards: &Rewards) -> u64 {
        let range = rewards.chest_range();
        self.rng.gen_range(range.min()..=range.max())
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new(0)
    }
}
