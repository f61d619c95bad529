use delve_catalogue::{load_levels, DataError, LevelCatalogue};
use delve_core::{CellCoord, CellKind};

fn document(grid_size: u32, levels: &str) -> String {
    format!(
        r#"{{
            "metadata": {{
                "gridSize": {grid_size},
                "rewards": {{ "treasureDiamonds": 1, "chestDiamondsRange": {{ "min": 2, "max": 5 }} }}
            }},
            "levels": [{levels}]
        }}"#
    )
}

const SMALL_LEVEL: &str = r#"{
    "grid": [[0, 1, 0], [2, 4, 0], [0, 0, 3]],
    "entryPosition": { "row": 0, "col": 0 },
    "treasureCount": 1
}"#;

#[test]
fn minimal_document_loads() {
    let catalogue = load_levels(&document(3, SMALL_LEVEL)).expect("valid document");
    assert_eq!(catalogue.len(), 1);

    let level = catalogue.level(1).expect("level one");
    assert_eq!(level.name(), "Level 1");
    assert_eq!(level.entry(), CellCoord::new(0, 0));
    assert_eq!(level.portal(), CellCoord::new(2, 2));
    assert_eq!(level.treasure_total(), 1);
    assert_eq!(level.chest_total(), 1);
    assert_eq!(level.rewards().chest_range().min(), 2);
    assert_eq!(
        level.grid().kind_at(CellCoord::new(0, 1)),
        Some(CellKind::Wall)
    );
}

#[test]
fn instantiate_returns_independent_copy() {
    let catalogue = load_levels(&document(3, SMALL_LEVEL)).expect("valid document");
    let level = catalogue.opening();

    let mut working = level.instantiate();
    assert_eq!(working.mark_collected(CellCoord::new(1, 0)), Ok(true));

    assert_eq!(level.grid().count_collected(CellKind::Treasure), 0);
    assert_eq!(level.instantiate().count_collected(CellKind::Treasure), 0);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let error = load_levels("{ not json").expect_err("garbage must fail");
    assert!(matches!(error, DataError::Parse(_)));
}

#[test]
fn empty_level_list_is_rejected() {
    let error = load_levels(&document(3, "")).expect_err("no levels");
    assert!(matches!(error, DataError::NoLevels));
}

#[test]
fn inverted_chest_range_is_rejected() {
    let source = document(3, SMALL_LEVEL).replace(r#""min": 2, "max": 5"#, r#""min": 6, "max": 5"#);
    let error = load_levels(&source).expect_err("inverted range");
    assert!(matches!(
        error,
        DataError::InvertedChestRange { min: 6, max: 5 }
    ));
}

#[test]
fn row_count_must_match_grid_size() {
    let error = load_levels(&document(4, SMALL_LEVEL)).expect_err("three rows in a size four grid");
    assert!(matches!(
        error,
        DataError::RowCount {
            level: 1,
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn ragged_rows_are_rejected() {
    let level = r#"{ "grid": [[0, 0, 0], [0, 0], [0, 0, 3]], "entryPosition": { "row": 0, "col": 0 } }"#;
    let error = load_levels(&document(3, level)).expect_err("ragged row");
    assert!(matches!(
        error,
        DataError::RaggedRow {
            level: 1,
            row: 1,
            expected: 3,
            actual: 2
        }
    ));
}

#[test]
fn unknown_cell_codes_are_rejected() {
    let level = r#"{ "grid": [[0, 9, 0], [0, 0, 0], [0, 0, 3]], "entryPosition": { "row": 0, "col": 0 } }"#;
    let error = load_levels(&document(3, level)).expect_err("code 9");
    match error {
        DataError::UnknownCellCode { level, cell, code } => {
            assert_eq!(level, 1);
            assert_eq!(cell, CellCoord::new(0, 1));
            assert_eq!(code, 9);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn portal_count_must_be_exactly_one() {
    let none = r#"{ "grid": [[0, 0], [0, 0]], "entryPosition": { "row": 0, "col": 0 } }"#;
    let error = load_levels(&document(2, none)).expect_err("no portal");
    assert!(matches!(error, DataError::MissingPortal { level: 1 }));

    let two = r#"{ "grid": [[0, 3], [3, 0]], "entryPosition": { "row": 0, "col": 0 } }"#;
    let error = load_levels(&document(2, two)).expect_err("two portals");
    assert!(matches!(
        error,
        DataError::MultiplePortals { level: 1, count: 2 }
    ));
}

#[test]
fn declared_treasure_count_must_match_layout() {
    let level = r#"{ "grid": [[0, 2], [2, 3]], "entryPosition": { "row": 0, "col": 0 }, "treasureCount": 3 }"#;
    let error = load_levels(&document(2, level)).expect_err("count mismatch");
    assert!(matches!(
        error,
        DataError::TreasureMismatch {
            level: 1,
            declared: 3,
            found: 2
        }
    ));
}

#[test]
fn entry_must_be_inside_and_walkable() {
    let outside = r#"{ "grid": [[0, 0], [0, 3]], "entryPosition": { "row": 2, "col": 0 } }"#;
    let error = load_levels(&document(2, outside)).expect_err("entry outside");
    assert!(matches!(error, DataError::EntryOutOfBounds { level: 1, .. }));

    let walled = r#"{ "grid": [[1, 0], [0, 3]], "entryPosition": { "row": 0, "col": 0 } }"#;
    let error = load_levels(&document(2, walled)).expect_err("entry on wall");
    assert!(matches!(error, DataError::EntryBlocked { level: 1, .. }));
}

#[test]
fn entry_may_not_start_on_the_portal() {
    let on_portal = r#"{ "grid": [[0, 0], [0, 3]], "entryPosition": { "row": 1, "col": 1 } }"#;
    let error = load_levels(&document(2, on_portal)).expect_err("entry on portal");
    assert!(matches!(
        error,
        DataError::EntryOnPortal { level: 1, entry } if entry == CellCoord::new(1, 1)
    ));
    assert_eq!(error.to_string(), "level 1 entry (1, 1) is the portal");
}

#[test]
fn errors_name_the_offending_level() {
    let broken = r#"{ "grid": [[0, 0], [0, 0]], "entryPosition": { "row": 0, "col": 0 } }"#;
    let valid = r#"{ "grid": [[0, 0], [0, 3]], "entryPosition": { "row": 0, "col": 0 } }"#;
    let error = load_levels(&document(2, &format!("{valid}, {broken}"))).expect_err("second level");
    assert!(matches!(error, DataError::MissingPortal { level: 2 }));
    assert_eq!(error.to_string(), "level 2 has no portal");
}

#[test]
fn builtin_levels_are_distinct_and_named() {
    let catalogue = LevelCatalogue::builtin().expect("builtin catalogue");
    let names: Vec<_> = catalogue.iter().map(|level| level.name().to_owned()).collect();
    assert_eq!(names.first().map(String::as_str), Some("Antechamber"));
    for (index, level) in catalogue.iter().enumerate() {
        assert_eq!(level.index() as usize, index + 1);
        assert!(level.treasure_total() > 0);
    }
}
