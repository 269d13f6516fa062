use lens::catalog::{InMemoryCatalog, TableMetadata};
use lens::error::{QueryError, TableRejection};
use lens::spec::{FilterGroup, LogicalOperator, NewColumn, NewTable, QuerySpec};
use lens::validation::{QuerySpecValidator, ValidationOptions};

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_table(TableMetadata::new("orders", "sales_db").column("amount", "Amount", "Decimal"))
        .with_table(TableMetadata::new("salaries", "sales_db").hidden())
        .with_table(TableMetadata::new("leads", "crm_db"))
}

fn spec_with_tables(tables: &[&str]) -> QuerySpec {
    let mut spec = QuerySpec::new("QRY-0001", "sales_db");
    for table in tables {
        spec.tables.add(NewTable {
            label: table.to_string(),
            table: table.to_string(),
        });
    }
    spec
}

fn with_labels(mut spec: QuerySpec, labels: &[&str]) -> QuerySpec {
    for label in labels {
        spec.columns
            .add(NewColumn::column("orders", label.to_lowercase(), *label, "Decimal"));
    }
    spec
}

#[test]
fn test_valid_spec() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    let mut spec = with_labels(spec_with_tables(&["orders"]), &["Revenue", "Cost"]);
    spec.limit = Some(100);
    assert!(validator.validate(&mut spec).is_ok());
}

#[test]
fn test_hidden_table_is_rejected() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    let mut spec = spec_with_tables(&["orders", "salaries"]);
    let err = validator.validate(&mut spec).unwrap_err();
    assert!(matches!(
        &err,
        QueryError::InvalidTable { table, reason: TableRejection::Hidden } if table == "salaries"
    ));
    assert_eq!(err.to_string(), "Table salaries is hidden. You cannot query it");
}

#[test]
fn test_table_from_other_data_source_is_rejected() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    let mut spec = spec_with_tables(&["leads"]);
    let err = validator.validate(&mut spec).unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidTable { reason: TableRejection::OtherDataSource, .. }
    ));
}

#[test]
fn test_unknown_table_is_rejected() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    let mut spec = spec_with_tables(&["invoices"]);
    let err = validator.validate(&mut spec).unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidTable { reason: TableRejection::NotFound, .. }
    ));
}

#[test]
fn test_table_check_runs_before_limit_check() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    let mut spec = spec_with_tables(&["salaries"]);
    spec.limit = Some(0);
    let err = validator.validate(&mut spec).unwrap_err();
    assert!(matches!(err, QueryError::InvalidTable { .. }));
}

#[test]
fn test_limit_below_one() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    for limit in [0, -5] {
        let mut spec = spec_with_tables(&["orders"]);
        spec.limit = Some(limit);
        let err = validator.validate(&mut spec).unwrap_err();
        assert!(matches!(err, QueryError::InvalidLimit(l) if l == limit));
    }
}

#[test]
fn test_missing_filters_are_defaulted() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    let mut spec = spec_with_tables(&["orders"]);
    spec.filters = None;
    validator.validate(&mut spec).unwrap();
    assert_eq!(spec.filters, Some(FilterGroup::default()));
}

#[test]
fn test_duplicate_labels_report_second_occurrence() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::default());

    let mut spec = with_labels(spec_with_tables(&["orders"]), &["Revenue", "Cost", "Revenue"]);
    let err = validator.validate(&mut spec).unwrap_err();
    assert!(matches!(
        &err,
        QueryError::DuplicateColumn { label, idx: 3 } if label == "Revenue"
    ));
    assert!(err.is_validation());
}

#[test]
fn test_lenient_mode_allows_duplicate_labels() {
    let catalog = catalog();
    let validator = QuerySpecValidator::new(&catalog, ValidationOptions::lenient());

    let mut spec = with_labels(spec_with_tables(&["orders"]), &["Revenue", "Cost", "Revenue"]);
    assert!(validator.validate(&mut spec).is_ok());
}

#[test]
fn test_filter_depth_bound() {
    let catalog = catalog();
    let options = ValidationOptions {
        max_filter_depth: 2,
        ..ValidationOptions::default()
    };
    let validator = QuerySpecValidator::new(&catalog, options);

    let mut spec = spec_with_tables(&["orders"]);
    spec.filters = Some(
        FilterGroup::new(LogicalOperator::And, 1, 1).with(
            FilterGroup::new(LogicalOperator::Or, 2, 1)
                .with(FilterGroup::new(LogicalOperator::And, 3, 1)),
        ),
    );
    let err = validator.validate(&mut spec).unwrap_err();
    assert!(matches!(err, QueryError::FilterTooDeep { max_depth: 2 }));
}
