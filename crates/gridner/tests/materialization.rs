//! Apply/revert behaviour of extraction changes on the reference table.

use gridner::change::{ChangeError, NerChange};
use gridner::grid::{Cell, CellValue, Judgment, Table, TabularGrid};
use gridner::models::{Disambiguation, ExtractionResult, NamedEntity};

fn entities(count: usize, prefix: &str) -> ExtractionResult {
    ExtractionResult::Entities(
        (0..count)
            .map(|i| NamedEntity::new(format!("{}{}", prefix, i)))
            .collect(),
    )
}

fn providers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn sample_table(rows: usize) -> Table {
    let mut table = Table::with_columns(&["id", "text"]);
    for i in 0..rows {
        table.push_text_row(&[&i.to_string(), &format!("text {}", i)]);
    }
    table
}

fn text_at(table: &Table, row: usize, column: usize) -> Option<String> {
    table.view()[row][column]
        .as_ref()
        .and_then(|cell| cell.value.as_text())
}

#[test]
fn test_row_split_places_entities_per_provider() {
    let mut table = sample_table(1);
    let mut change = NerChange::new(
        2,
        providers(&["p0", "p1", "p2"]),
        vec![vec![entities(1, "a"), entities(3, "b"), entities(2, "c")]],
    );

    change.apply(&mut table).unwrap();

    assert_eq!(table.row_count(), 3);
    assert_eq!(change.added_row_ids(), &[1, 2]);
    assert_eq!(table.column_names(), vec!["id", "text", "p0", "p1", "p2"]);

    // Provider 0: only the first row
    assert_eq!(text_at(&table, 0, 2).as_deref(), Some("a0"));
    assert_eq!(text_at(&table, 1, 2), None);
    assert_eq!(text_at(&table, 2, 2), None);

    // Provider 1: one entity per row
    assert_eq!(text_at(&table, 0, 3).as_deref(), Some("b0"));
    assert_eq!(text_at(&table, 1, 3).as_deref(), Some("b1"));
    assert_eq!(text_at(&table, 2, 3).as_deref(), Some("b2"));

    // Provider 2: two rows
    assert_eq!(text_at(&table, 1, 4).as_deref(), Some("c1"));
    assert_eq!(text_at(&table, 2, 4), None);

    // Source cells stay on the original row only
    assert_eq!(text_at(&table, 0, 1).as_deref(), Some("text 0"));
    assert_eq!(text_at(&table, 1, 1), None);
}

#[test]
fn test_error_written_only_on_first_row_of_block() {
    let mut table = sample_table(2);
    let mut change = NerChange::new(
        2,
        providers(&["ok", "broken"]),
        vec![
            vec![entities(3, "x"), ExtractionResult::failed("HTTP 503")],
            vec![entities(1, "y"), ExtractionResult::failed("HTTP 503")],
        ],
    );

    change.apply(&mut table).unwrap();
    assert_eq!(table.row_count(), 4);

    let view = table.view();
    assert!(view[0][3].as_ref().is_some_and(Cell::is_error));
    assert_eq!(view[1][3], None);
    assert_eq!(view[2][3], None);
    // Second source row now starts at grid row 3
    assert!(view[3][3].as_ref().is_some_and(Cell::is_error));
    assert_eq!(text_at(&table, 3, 1).as_deref(), Some("text 1"));
    assert_eq!(text_at(&table, 3, 2).as_deref(), Some("y0"));
}

#[test]
fn test_zero_entity_rows_advance_by_one() {
    let mut table = sample_table(3);
    let mut change = NerChange::new(
        2,
        providers(&["p"]),
        vec![
            vec![entities(0, "a")],
            vec![entities(2, "b")],
            vec![entities(0, "c")],
        ],
    );

    change.apply(&mut table).unwrap();

    assert_eq!(table.row_count(), 4);
    assert_eq!(change.added_row_ids(), &[2]);
    assert_eq!(text_at(&table, 0, 2), None);
    assert_eq!(text_at(&table, 1, 2).as_deref(), Some("b0"));
    assert_eq!(text_at(&table, 2, 2).as_deref(), Some("b1"));
    assert_eq!(text_at(&table, 3, 1).as_deref(), Some("text 2"));
}

#[test]
fn test_columns_inserted_in_the_middle() {
    let mut table = sample_table(1);
    let mut change = NerChange::new(1, providers(&["p", "q"]), vec![vec![entities(1, "a"), entities(1, "b")]]);

    change.apply(&mut table).unwrap();

    assert_eq!(table.column_names(), vec!["id", "p", "q", "text"]);
    assert_eq!(text_at(&table, 0, 1).as_deref(), Some("a0"));
    assert_eq!(text_at(&table, 0, 2).as_deref(), Some("b0"));
    assert_eq!(text_at(&table, 0, 3).as_deref(), Some("text 0"));
}

#[test]
fn test_apply_pads_every_row() {
    let mut table = sample_table(3);
    let mut change = NerChange::new(2, providers(&["p", "q"]), vec![vec![entities(2, "a"), entities(0, "b")]]);

    change.apply(&mut table).unwrap();

    let width = table.column(3).unwrap().cell_index + 1;
    for row in 0..table.row_count() {
        assert!(table.row_width(row).unwrap() >= width);
    }
}

#[test]
fn test_revert_restores_table_for_many_distributions() {
    let distributions: Vec<Vec<Vec<usize>>> = vec![
        vec![vec![1]],
        vec![vec![0], vec![0], vec![0]],
        vec![vec![1, 3, 2], vec![0, 0, 0], vec![4, 1, 0]],
        vec![vec![2, 2], vec![5, 1], vec![1, 1], vec![0, 3]],
    ];

    for counts in distributions {
        let names: Vec<String> = (0..counts[0].len()).map(|i| format!("p{}", i)).collect();
        let results: Vec<Vec<ExtractionResult>> = counts
            .iter()
            .map(|row| row.iter().map(|&n| entities(n, "e")).collect())
            .collect();

        let original = sample_table(counts.len() + 1);
        let mut table = original.clone();
        let mut change = NerChange::new(1, names, results);

        change.apply(&mut table).unwrap();
        change.revert(&mut table).unwrap();

        assert_eq!(table.view(), original.view(), "distribution {:?}", counts);
        assert_eq!(table, original, "distribution {:?}", counts);
        assert!(change.added_row_ids().is_empty());
    }
}

#[test]
fn test_reapply_after_revert_is_identical() {
    let mut table = sample_table(2);
    let mut change = NerChange::new(
        2,
        providers(&["p", "q"]),
        vec![
            vec![entities(2, "a"), ExtractionResult::failed("offline")],
            vec![entities(0, "b"), entities(3, "c")],
        ],
    );

    change.apply(&mut table).unwrap();
    let first_view = table.view();
    let first_rows = change.added_row_ids().to_vec();

    change.revert(&mut table).unwrap();
    change.apply(&mut table).unwrap();

    assert_eq!(table.view(), first_view);
    assert_eq!(change.added_row_ids(), first_rows.as_slice());
}

#[test]
fn test_persisted_change_reverts_after_reload() {
    let original = sample_table(2);
    let mut table = original.clone();
    let linked = NamedEntity::with_disambiguations(
        "Lowell",
        vec![
            Disambiguation::new("Lowell", "http://dbpedia.org/resource/Lowell", 0.4),
            Disambiguation::new("Lowell, MA", "http://dbpedia.org/resource/Lowell,_Massachusetts", 0.9),
        ],
    );
    let mut change = NerChange::new(
        2,
        providers(&["nif"]),
        vec![
            vec![ExtractionResult::Entities(vec![linked, NamedEntity::new("MA")])],
            vec![ExtractionResult::failed("timeout")],
        ],
    );
    change.apply(&mut table).unwrap();

    let line = change.to_json_line().unwrap();
    let mut reloaded = NerChange::from_json_line(&line).unwrap();
    assert_eq!(reloaded, change);

    reloaded.revert(&mut table).unwrap();
    assert_eq!(table, original);
}

#[test]
fn test_materialized_cell_is_reconciled() {
    let mut table = sample_table(1);
    let entity = NamedEntity::with_disambiguations(
        "some text",
        vec![
            Disambiguation::new("A", "http://example.org/1", 0.4),
            Disambiguation::new("B", "http://example.org/2", 0.9),
            Disambiguation::new("C", "", 1.0),
        ],
    );
    let mut change = NerChange::new(2, providers(&["p"]), vec![vec![ExtractionResult::Entities(vec![entity])]]);
    change.apply(&mut table).unwrap();

    let cell = table.view()[0][2].clone().unwrap();
    assert_eq!(cell.value, CellValue::Text("some text".to_string()));
    let recon = cell.recon.unwrap();
    assert_eq!(recon.judgment, Judgment::Matched);
    assert_eq!(recon.matched.unwrap().id, "http://example.org/2");
    assert_eq!(recon.candidates.len(), 2);
}

#[test]
fn test_revert_without_apply_only_removes_columns_when_present() {
    let mut table = sample_table(1);
    let mut change = NerChange::new(2, providers(&["p"]), vec![vec![entities(1, "a")]]);

    // Nothing was inserted at position 2 yet
    assert!(matches!(
        change.revert(&mut table),
        Err(ChangeError::InconsistentState(_))
    ));
    assert_eq!(table, sample_table(1));
}
