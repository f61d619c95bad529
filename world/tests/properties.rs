use delve_catalogue::LevelCatalogue;
use delve_core::{CellKind, Command, Direction, Event};
use delve_world::{self as world, query, Session};
use proptest::prelude::*;

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        8 => prop::sample::select(Direction::ALL.to_vec())
            .prop_map(|direction| Command::Move { direction }),
        2 => Just(Command::EnterPortal),
    ]
}

fn builtin_session(seed: u64) -> Session {
    Session::new(LevelCatalogue::builtin().expect("builtin catalogue"), seed)
}

proptest! {
    #[test]
    fn snapshot_invariants_hold_for_any_intent_sequence(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 0..200),
    ) {
        let mut session = builtin_session(seed);
        let mut previous = query::state(&session);
        let mut rewarded = 0u64;

        for command in commands {
            let mut events = Vec::new();
            world::apply(&mut session, command, &mut events);
            let state = query::state(&session);
            let grid = query::grid(&session);

            prop_assert!(state.steps >= previous.steps);
            prop_assert!(state.score() >= previous.score());
            prop_assert!(state.steps - previous.steps <= 1);
            prop_assert!(grid.is_walkable(state.position));
            prop_assert_eq!(
                state.is_on_portal,
                grid.kind_at(state.position) == Some(CellKind::Portal)
            );
            prop_assert!(state.treasures_collected <= state.total_treasures);
            prop_assert!(state.chests_collected <= state.total_chests);

            for event in &events {
                match event {
                    Event::TreasureCollected { diamonds, .. }
                    | Event::ChestOpened { diamonds, .. } => {
                        rewarded += diamonds;
                    }
                    Event::MoveRejected { .. } => {
                        prop_assert_eq!(state.position, previous.position);
                        prop_assert_eq!(state.steps, previous.steps);
                    }
                    _ => {}
                }
            }
            prop_assert_eq!(state.total_diamonds, rewarded);

            if previous.game_won {
                prop_assert_eq!(state, previous);
                prop_assert!(events.is_empty());
            }
            if state.current_level != previous.current_level {
                prop_assert_eq!(command, Command::EnterPortal);
                prop_assert!(previous.is_on_portal);
            }

            previous = state;
        }
    }

    #[test]
    fn each_collectible_pays_out_at_most_once(
        commands in prop::collection::vec(command(), 0..200),
    ) {
        let mut session = builtin_session(1);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut session, command, &mut events);
        }

        let mut seen = Vec::new();
        let mut level = 1;
        for event in &events {
            match event {
                Event::LevelStarted { level: started, .. } => level = *started,
                Event::TreasureCollected { cell, .. } | Event::ChestOpened { cell, .. } => {
                    prop_assert!(!seen.contains(&(level, *cell)));
                    seen.push((level, *cell));
                }
                _ => {}
            }
        }
    }
}
