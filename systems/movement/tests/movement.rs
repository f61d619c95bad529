use delve_core::{Cell, CellCoord, Direction, Grid, MoveRejection};
use delve_system_movement::{attempt_move, MoveResult};
use proptest::prelude::*;

fn five_by_five() -> Grid {
    let mut rows = vec![vec![Cell::FLOOR; 5]; 5];
    rows[0][1] = Cell::WALL;
    rows[2][2] = Cell::TREASURE;
    rows[4][4] = Cell::PORTAL;
    Grid::from_rows(rows).expect("valid grid")
}

#[test]
fn moving_into_a_wall_is_rejected() {
    let grid = five_by_five();
    assert_eq!(
        attempt_move(CellCoord::new(0, 0), Direction::Right, &grid),
        MoveResult::Rejected(MoveRejection::Wall)
    );
}

#[test]
fn moving_off_any_edge_is_rejected() {
    let grid = five_by_five();
    let cases = [
        (CellCoord::new(0, 0), Direction::Up),
        (CellCoord::new(0, 0), Direction::Left),
        (CellCoord::new(4, 3), Direction::Down),
        (CellCoord::new(3, 4), Direction::Right),
    ];
    for (from, direction) in cases {
        assert_eq!(
            attempt_move(from, direction, &grid),
            MoveResult::Rejected(MoveRejection::OutOfBounds),
            "{direction} from {from}"
        );
    }
}

#[test]
fn collectibles_and_portals_are_walkable() {
    let grid = five_by_five();
    assert_eq!(
        attempt_move(CellCoord::new(2, 1), Direction::Right, &grid),
        MoveResult::Accepted {
            to: CellCoord::new(2, 2)
        }
    );
    assert_eq!(
        attempt_move(CellCoord::new(4, 3), Direction::Right, &grid),
        MoveResult::Accepted {
            to: CellCoord::new(4, 4)
        }
    );
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn accepted_moves_are_adjacent_and_walkable(
        row in 0u32..5,
        column in 0u32..5,
        direction in direction(),
    ) {
        let grid = five_by_five();
        let from = CellCoord::new(row, column);
        match attempt_move(from, direction, &grid) {
            MoveResult::Accepted { to } => {
                prop_assert_eq!(from.step(direction), Some(to));
                prop_assert!(grid.is_walkable(to));
            }
            MoveResult::Rejected(MoveRejection::Wall) => {
                let target = from.step(direction).expect("walls lie inside the grid");
                prop_assert!(!grid.is_walkable(target));
                prop_assert!(grid.contains(target));
            }
            MoveResult::Rejected(MoveRejection::OutOfBounds) => {
                prop_assert!(from.step(direction).map_or(true, |cell| !grid.contains(cell)));
            }
        }
    }
}
