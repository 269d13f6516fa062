use lens::columns::ColumnProjectionList;
use lens::results::{type_columns, RawResultSet};
use lens::spec::{NewColumn, Payload};
use serde_json::json;

fn results() -> RawResultSet {
    serde_json::from_value(json!([
        [{"label": "Month"}, {"label": "Sales"}, {"label": "order_count"}, {"label": "Shipped"}],
        ["2024-01-01", 10.5, 3, true],
        ["2024-02-01", 20.25, 7, false]
    ]))
    .unwrap()
}

#[test]
fn test_matched_columns_use_their_spec() {
    let mut columns = ColumnProjectionList::new();
    columns.add(NewColumn {
        format_option: Some(Payload::from_input(json!({"prefix": "$"}))),
        ..NewColumn::column("orders", "amount", "Sales", "Currency")
    });

    let display = type_columns(&results(), columns.as_slice());
    assert_eq!(display[1].label, "Sales");
    assert_eq!(display[1].column_type, "Currency");
    assert_eq!(display[1].format_options, json!({"prefix": "$"}));
}

#[test]
fn test_raw_column_name_also_matches() {
    let mut columns = ColumnProjectionList::new();
    columns.add(NewColumn::column("orders", "order_count", "Orders", "Integer"));

    let display = type_columns(&results(), columns.as_slice());
    assert_eq!(display[2].label, "order_count");
    assert_eq!(display[2].column_type, "Integer");
    assert_eq!(display[2].format_options, json!({}));
}

#[test]
fn test_unmatched_columns_fall_back_to_inference() {
    let mut columns = ColumnProjectionList::new();
    columns.add(NewColumn::column("orders", "amount", "Sales", "Decimal"));

    let display = type_columns(&results(), columns.as_slice());
    let types: Vec<&str> = display.iter().map(|c| c.column_type.as_str()).collect();
    assert_eq!(types, vec!["Date", "Decimal", "Integer", "Boolean"]);
    assert_eq!(display[0].format_options, json!({}));
    assert_eq!(display[3].format_options, json!({}));
}

#[test]
fn test_first_matching_spec_wins() {
    let mut columns = ColumnProjectionList::new();
    columns.add(NewColumn::column("orders", "amount", "Sales", "Currency"));
    columns.add(NewColumn::column("refunds", "amount", "Sales", "Decimal"));

    let display = type_columns(&results(), columns.as_slice());
    assert_eq!(display[1].column_type, "Currency");
}

#[test]
fn test_no_specs_at_all() {
    let display = type_columns(&results(), &[]);
    assert_eq!(display.len(), 4);
    assert_eq!(display[0].column_type, "Date");
}

#[test]
fn test_empty_results() {
    let empty: RawResultSet = serde_json::from_value(json!([])).unwrap();
    assert!(type_columns(&empty, &[]).is_empty());
}

#[test]
fn test_text_format_options_are_parsed() {
    let mut columns = ColumnProjectionList::new();
    columns.add(NewColumn {
        format_option: Some(Payload::from_stored("{\"decimals\": 2}")),
        ..NewColumn::column("orders", "amount", "Sales", "Decimal")
    });

    let display = type_columns(&results(), columns.as_slice());
    assert_eq!(display[1].format_options, json!({"decimals": 2}));
}
