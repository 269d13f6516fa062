use lens::spec::{
    Condition, FilterGroup, JoinSpec, LogicalOperator, NewColumn, NewTable, Payload, QuerySpec,
    SortOrder,
};
use lens::store::{SaveOutcome, SpecStore, SqliteSpecStore, StoreError};
use serde_json::json;

fn sample_spec() -> QuerySpec {
    let mut spec = QuerySpec::new("QRY-0001", "sales_db");
    let orders = spec.tables.add(NewTable {
        label: "Orders".to_string(),
        table: "orders".to_string(),
    });
    spec.tables.add(NewTable {
        label: "Items".to_string(),
        table: "items".to_string(),
    });
    spec.tables.set_join(
        &orders,
        Some(
            JoinSpec::with_table("customers", "Customers")
                .detail("type", json!({"label": "Inner", "value": "inner"})),
        ),
    );

    spec.columns.add(NewColumn::column("orders", "month", "Month", "String"));
    spec.columns.add(NewColumn {
        is_expression: true,
        expression: Some(Payload::from_input(json!({"raw": "SUM(amount)"}))),
        format_option: Some(Payload::from_input(json!({"prefix": "$"}))),
        order_by: Some(SortOrder::Desc),
        ..NewColumn::column("orders", "amount", "Sales", "Decimal").aggregated("Cumulative Sum")
    });

    spec.filters = Some(FilterGroup::default().with(Condition::from_value(json!({
        "type": "BinaryExpression",
        "left": "status",
        "operator": "==",
        "right": "Open"
    }))));
    spec.limit = Some(500);
    spec
}

#[test]
fn test_save_and_load() {
    let store = SqliteSpecStore::open_in_memory().unwrap();
    let spec = sample_spec();

    store.save(&spec).unwrap();
    let loaded = store.load("QRY-0001").unwrap().unwrap();
    assert_eq!(loaded, spec);
}

#[test]
fn test_missing_document() {
    let store = SqliteSpecStore::open_in_memory().unwrap();
    assert!(store.load("QRY-9999").unwrap().is_none());
    assert!(!store.delete("QRY-9999").unwrap());
}

#[test]
fn test_unchanged_save_is_skipped() {
    let store = SqliteSpecStore::open_in_memory().unwrap();
    let spec = sample_spec();

    let first = store.save(&spec).unwrap();
    assert!(matches!(first, SaveOutcome::Saved(_)));

    let second = store.save(&spec).unwrap();
    assert_eq!(second, SaveOutcome::Unchanged(first.revision().to_string()));
}

#[test]
fn test_loaded_document_saves_unchanged() {
    let store = SqliteSpecStore::open_in_memory().unwrap();
    let mut spec = sample_spec();
    spec.columns.add(NewColumn {
        format_option: Some(Payload::from_input(json!("{\"suffix\": \"%\"}"))),
        expression: Some(Payload::from_input(json!("{\"raw\":\"amount\"}"))),
        ..NewColumn::column("orders", "margin", "Margin", "Decimal")
    });
    let first = store.save(&spec).unwrap();

    let loaded = store.load("QRY-0001").unwrap().unwrap();
    let second = store.save(&loaded).unwrap();
    assert_eq!(second, SaveOutcome::Unchanged(first.revision().to_string()));

    let stored = store.load_stored("QRY-0001").unwrap().unwrap();
    assert_eq!(stored.columns[2].format_option.as_deref(), Some("{\"suffix\": \"%\"}"));
    assert_eq!(stored.columns[2].expression.as_deref(), Some("{\"raw\":\"amount\"}"));
}

#[test]
fn test_edits_rewrite_child_rows() {
    let store = SqliteSpecStore::open_in_memory().unwrap();
    let mut spec = sample_spec();
    store.save(&spec).unwrap();

    let first_table = spec.tables.iter().next().unwrap().name.clone();
    spec.tables.remove(&first_table);
    spec.columns.move_column(1, 0).unwrap();
    spec.filters = Some(FilterGroup::new(LogicalOperator::Or, 1, 1));
    assert!(matches!(store.save(&spec).unwrap(), SaveOutcome::Saved(_)));

    let loaded = store.load("QRY-0001").unwrap().unwrap();
    assert_eq!(loaded.tables.len(), 1);
    assert_eq!(loaded.columns.iter().next().unwrap().label, "Sales");
    assert_eq!(loaded, spec);
}

#[test]
fn test_blobs_are_pretty_printed_text() {
    let store = SqliteSpecStore::open_in_memory().unwrap();
    store.save(&sample_spec()).unwrap();

    let stored = store.load_stored("QRY-0001").unwrap().unwrap();
    assert!(stored.query.filters.starts_with("{\n"));
    assert_eq!(stored.tables[1].join_spec, "");
    assert_eq!(
        stored.columns[1].format_option.as_deref(),
        Some("{\n  \"prefix\": \"$\"\n}")
    );
    assert_eq!(stored.columns[1].order_by.as_deref(), Some("desc"));
}

#[test]
fn test_list_and_delete() {
    let store = SqliteSpecStore::open_in_memory().unwrap();
    store.save(&QuerySpec::new("QRY-0002", "sales_db")).unwrap();
    store.save(&QuerySpec::new("QRY-0001", "sales_db")).unwrap();

    assert_eq!(store.list().unwrap(), vec!["QRY-0001", "QRY-0002"]);
    assert!(store.delete("QRY-0001").unwrap());
    assert_eq!(store.list().unwrap(), vec!["QRY-0002"]);
}

#[test]
fn test_reopen_file_store() {
    let dir = std::env::temp_dir().join(format!("lens-store-{}", std::process::id()));
    let path = dir.join("queries.db");
    let spec = sample_spec();

    {
        let store = SqliteSpecStore::open(&path).unwrap();
        store.save(&spec).unwrap();
    }
    let store = SqliteSpecStore::open(&path).unwrap();
    assert_eq!(store.load("QRY-0001").unwrap(), Some(spec));

    drop(store);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_newer_schema_is_refused() {
    let dir = std::env::temp_dir().join(format!("lens-version-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("queries.db");

    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE meta (key TEXT PRIMARY KEY, value TEXT NOT NULL);
             INSERT INTO meta (key, value) VALUES ('version', '99');",
        )
        .unwrap();
    }

    let err = SqliteSpecStore::open(&path).err().unwrap();
    assert!(matches!(err, StoreError::VersionMismatch { found: 99, expected: 1 }));

    let _ = std::fs::remove_dir_all(&dir);
}
