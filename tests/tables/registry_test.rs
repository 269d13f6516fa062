use lens::spec::{JoinSpec, NewTable, TableRef};
use lens::tables::{SelectedTable, TableJoinRegistry};
use serde_json::json;

fn new_table(table: &str, label: &str) -> NewTable {
    NewTable {
        table: table.to_string(),
        label: label.to_string(),
    }
}

#[test]
fn test_unjoined_table_resolves_to_itself() {
    let mut tables = TableJoinRegistry::new();
    tables.add(new_table("orders", "Orders"));

    assert_eq!(
        tables.resolve_selected_tables(),
        vec![SelectedTable {
            table: "orders".to_string(),
            label: "Orders".to_string(),
        }]
    );
}

#[test]
fn test_join_adds_one_derived_entry() {
    let mut tables = TableJoinRegistry::new();
    let orders = tables.add(new_table("orders", "Orders"));
    tables.add(new_table("items", "Items"));
    assert!(tables.set_join(&orders, Some(JoinSpec::with_table("customers", "Customers"))));

    let resolved = tables.resolve_selected_tables();
    let names: Vec<&str> = resolved.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(names, vec!["orders", "items", "customers"]);
    assert_eq!(resolved[2].label, "Customers");
}

#[test]
fn test_rows_are_matched_by_name_not_table() {
    let mut tables = TableJoinRegistry::new();
    let first = tables.add(new_table("orders", "Orders"));
    let second = tables.add(new_table("orders", "Past Orders"));
    assert_ne!(first, second);

    assert!(tables.remove(&first));
    assert_eq!(tables.len(), 1);
    assert_eq!(tables.get(&second).unwrap().label, "Past Orders");
}

#[test]
fn test_unknown_rows_are_ignored() {
    let mut tables = TableJoinRegistry::new();
    tables.add(new_table("orders", "Orders"));
    let before = tables.clone();

    assert!(!tables.remove("no-such-row"));
    assert!(!tables.set_join("no-such-row", Some(JoinSpec::with_table("x", "X"))));
    assert_eq!(tables, before);
}

#[test]
fn test_clearing_a_join() {
    let mut tables = TableJoinRegistry::new();
    let orders = tables.add(new_table("orders", "Orders"));
    tables.set_join(&orders, Some(JoinSpec::with_table("customers", "Customers")));

    assert!(tables.set_join(&orders, None));
    assert_eq!(tables.resolve_selected_tables().len(), 1);
}

#[test]
fn test_join_details_survive_serialization() {
    let join = JoinSpec::with_table("customers", "Customers")
        .detail("type", json!({"label": "Left", "value": "left"}))
        .detail("condition", json!({"left": "customer_id", "right": "id"}));
    let row = TableRef {
        join: Some(join),
        ..TableRef::new("row-1", "orders", "Orders")
    };

    let value = serde_json::to_value(&row).unwrap();
    assert_eq!(value["join"]["with"], json!({"value": "customers", "label": "Customers"}));
    assert_eq!(value["join"]["condition"]["right"], json!("id"));

    let back: TableRef = serde_json::from_value(value).unwrap();
    assert_eq!(back, row);
}
