use lens::columns::ColumnProjectionList;
use lens::error::QueryError;
use lens::spec::{ColumnSpec, NewColumn};

fn columns(labels: &[&str]) -> (ColumnProjectionList, Vec<String>) {
    let mut list = ColumnProjectionList::new();
    let names = labels
        .iter()
        .map(|label| list.add(NewColumn::column("orders", label.to_lowercase(), *label, "String")))
        .collect();
    (list, names)
}

fn labels(list: &ColumnProjectionList) -> Vec<&str> {
    list.iter().map(|c| c.label.as_str()).collect()
}

fn indexes(list: &ColumnProjectionList) -> Vec<usize> {
    list.iter().map(|c| c.idx).collect()
}

#[test]
fn test_move_last_to_first() {
    let (mut list, _) = columns(&["A", "B", "C"]);

    list.move_column(2, 0).unwrap();
    assert_eq!(labels(&list), vec!["C", "A", "B"]);
    assert_eq!(indexes(&list), vec![1, 2, 3]);
}

#[test]
fn test_move_first_to_last() {
    let (mut list, _) = columns(&["A", "B", "C", "D"]);

    list.move_column(0, 3).unwrap();
    assert_eq!(labels(&list), vec!["B", "C", "D", "A"]);
    assert_eq!(indexes(&list), vec![1, 2, 3, 4]);
}

#[test]
fn test_move_out_of_range() {
    let (mut list, _) = columns(&["A", "B"]);
    let before = list.clone();

    let err = list.move_column(0, 2).unwrap_err();
    assert!(matches!(err, QueryError::InvalidMove { from: 0, to: 2, len: 2 }));
    assert_eq!(list, before);
}

#[test]
fn test_indexes_stay_contiguous() {
    let (mut list, names) = columns(&["A", "B", "C", "D", "E"]);

    list.remove(&names[1]);
    list.move_column(3, 1).unwrap();
    list.add(NewColumn::column("orders", "f", "F", "String"));
    list.remove(&names[0]);
    list.remove("no-such-row");

    assert_eq!(labels(&list), vec!["E", "C", "D", "F"]);
    assert_eq!(indexes(&list), (1..=4).collect::<Vec<_>>());
}

#[test]
fn test_empty_list() {
    let mut list = ColumnProjectionList::new();
    assert!(list.is_empty());
    assert!(matches!(list.move_column(0, 0), Err(QueryError::InvalidMove { len: 0, .. })));
}

#[test]
fn test_stored_rows_are_reordered_by_idx() {
    let stored: Vec<ColumnSpec> = serde_json::from_value(serde_json::json!([
        {"name": "r3", "idx": 7, "type": "String", "label": "Third", "table": "t", "table_label": "T"},
        {"name": "r1", "idx": 2, "type": "String", "label": "First", "table": "t", "table_label": "T"},
        {"name": "r2", "idx": 4, "type": "String", "label": "Second", "table": "t", "table_label": "T"}
    ]))
    .unwrap();

    let list = ColumnProjectionList::from_columns(stored);
    assert_eq!(labels(&list), vec!["First", "Second", "Third"]);
    assert_eq!(indexes(&list), vec![1, 2, 3]);
}
