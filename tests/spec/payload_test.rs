use lens::spec::{ColumnPatch, NewColumn, Payload, SortOrder};
use lens::columns::ColumnProjectionList;
use serde_json::json;

#[test]
fn test_stored_object_comes_back_structured() {
    let payload = Payload::from_stored("{\n  \"prefix\": \"$\"\n}");
    assert_eq!(payload, Payload::Object(json!({"prefix": "$"})));
}

#[test]
fn test_stored_plain_text_stays_text() {
    let payload = Payload::from_stored("SUM(amount) / COUNT(*)");
    assert_eq!(payload, Payload::Text("SUM(amount) / COUNT(*)".to_string()));
    assert_eq!(payload.to_value(), json!("SUM(amount) / COUNT(*)"));
}

#[test]
fn test_column_input_accepts_both_forms() {
    let column: NewColumn = serde_json::from_value(json!({
        "type": "Decimal",
        "label": "Margin",
        "table": "orders",
        "is_expression": true,
        "expression": {"raw": "amount - cost"},
        "format_option": "{\"suffix\": \"%\"}",
        "order_by": "desc"
    }))
    .unwrap();

    assert!(column.is_expression);
    assert_eq!(column.expression, Some(Payload::Object(json!({"raw": "amount - cost"}))));
    assert_eq!(
        column.format_option,
        Some(Payload::Text("{\"suffix\": \"%\"}".to_string()))
    );
    assert_eq!(column.order_by, Some(SortOrder::Desc));
}

#[test]
fn test_update_keeps_payloads_when_patch_is_empty() {
    let mut columns = ColumnProjectionList::new();
    let name = columns.add(NewColumn {
        expression: Some(Payload::from_input(json!({"raw": "amount"}))),
        format_option: Some(Payload::from_input(json!({"prefix": "$"}))),
        ..NewColumn::column("orders", "amount", "Amount", "Decimal")
    });

    let mut patch = ColumnPatch::from_spec(columns.get(&name).unwrap());
    patch.label = "Revenue".to_string();
    patch.format_option = Some(Payload::from_input(json!({})));
    assert!(columns.update(&name, patch));

    let column = columns.get(&name).unwrap();
    assert_eq!(column.label, "Revenue");
    assert_eq!(column.format_option, Some(Payload::Object(json!({"prefix": "$"}))));
    assert_eq!(column.expression, Some(Payload::Object(json!({"raw": "amount"}))));
}

#[test]
fn test_update_replaces_non_empty_payloads() {
    let mut columns = ColumnProjectionList::new();
    let name = columns.add(NewColumn::column("orders", "amount", "Amount", "Decimal"));

    let mut patch = ColumnPatch::from_spec(columns.get(&name).unwrap());
    patch.format_option = Some(Payload::from_input(json!({"decimals": 2})));
    columns.update(&name, patch);

    assert_eq!(
        columns.get(&name).unwrap().format_option,
        Some(Payload::Object(json!({"decimals": 2})))
    );
}
