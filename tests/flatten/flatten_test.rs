//! Column keys and row flattening for both report shapes.

use reportpage::flatten::{
    sanitize_label, ColumnKeys, FlattenError, KeyCollision, RowFlattener,
};
use reportpage::report::ColumnDef;
use reportpage::source::{DatasetRecord, NativePage, NativeRecords, SearchCell, SearchRow};
use serde_json::json;

fn dataset_page(index: usize, labels: &[&str], rows: Vec<Vec<serde_json::Value>>) -> NativePage {
    NativePage {
        index,
        columns: labels.iter().map(|l| ColumnDef::labeled(*l)).collect(),
        records: NativeRecords::Positional(rows.into_iter().map(DatasetRecord::new).collect()),
    }
}

#[test]
fn test_sanitize_label() {
    assert_eq!(sanitize_label("Customer Name"), "customername");
    assert_eq!(sanitize_label("  Order\tTotal \n"), "ordertotal");
    assert_eq!(sanitize_label("QTY"), "qty");
}

#[test]
fn test_dataset_record_by_position() {
    let page = dataset_page(
        0,
        &["Customer Name", "Notes", "Qty"],
        vec![vec![json!("Acme Corp"), json!(null), json!(42)]],
    );
    let rows = RowFlattener::default().flatten_page(&page).unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.keys().collect::<Vec<_>>(), vec!["customername", "notes", "qty"]);
    assert_eq!(row.get("customername"), Some("Acme Corp"));
    assert_eq!(row.get("notes"), Some(""));
    assert_eq!(row.get("qty"), Some("42"));
}

#[test]
fn test_search_row_prefers_text() {
    let columns = vec![
        ColumnDef::named("status").with_label("Status"),
        ColumnDef::named("amount").with_label("Amount"),
        ColumnDef::named("memo").with_label("Memo"),
    ];
    let row = SearchRow::default()
        .with_cell("status", SearchCell::text("Open").with_value("1"))
        .with_cell("amount", SearchCell::value("5"));
    let page = NativePage {
        index: 0,
        columns,
        records: NativeRecords::Paired(vec![row]),
    };

    let rows = RowFlattener::default().flatten_page(&page).unwrap();
    assert_eq!(rows[0].get("status"), Some("Open"));
    assert_eq!(rows[0].get("amount"), Some("5"));
    assert_eq!(rows[0].get("memo"), Some(""));
}

#[test]
fn test_joined_search_column() {
    let column = ColumnDef::named("email").with_label("Customer Email").with_join("customer");
    let row = SearchRow::default().with_cell("customer.email", SearchCell::text("a@b.c"));
    let page = NativePage {
        index: 0,
        columns: vec![column],
        records: NativeRecords::Paired(vec![row]),
    };

    let rows = RowFlattener::default().flatten_page(&page).unwrap();
    assert_eq!(rows[0].get("customeremail"), Some("a@b.c"));
}

#[test]
fn test_same_field_summary_columns_keep_their_own_values() {
    let columns = vec![
        ColumnDef::named("amount").with_label("Total Amount").with_summary("SUM"),
        ColumnDef::named("amount").with_label("Max Amount").with_summary("MAX"),
    ];
    let row = SearchRow::default()
        .with_cell(columns[0].cell_ref(), SearchCell::value("100"))
        .with_cell(columns[1].cell_ref(), SearchCell::value("40"));
    let page = NativePage {
        index: 0,
        columns,
        records: NativeRecords::Paired(vec![row]),
    };

    let rows = RowFlattener::default().flatten_page(&page).unwrap();
    assert_eq!(
        rows[0].iter().collect::<Vec<_>>(),
        vec![("totalamount", "100"), ("maxamount", "40")]
    );
}

#[test]
fn test_formula_columns_keep_their_own_values() {
    let columns = vec![
        ColumnDef::named("formulatext").with_label("First").with_formula("{firstname}"),
        ColumnDef::named("formulatext").with_label("Last").with_formula("{lastname}"),
    ];
    let row = SearchRow::default()
        .with_cell("formulatext:{firstname}", SearchCell::text("Ada"))
        .with_cell("formulatext:{lastname}", SearchCell::text("Lovelace"));
    let page = NativePage {
        index: 0,
        columns,
        records: NativeRecords::Paired(vec![row]),
    };

    let rows = RowFlattener::default().flatten_page(&page).unwrap();
    assert_eq!(rows[0].get("first"), Some("Ada"));
    assert_eq!(rows[0].get("last"), Some("Lovelace"));
}

#[test]
fn test_keys_from_first_page_are_reused() {
    let mut flattener = RowFlattener::new(KeyCollision::Overwrite);
    let first = dataset_page(0, &["Id"], vec![vec![json!(1)]]);
    let second = dataset_page(1, &["Something Else"], vec![vec![json!(2)]]);

    flattener.flatten_page(&first).unwrap();
    let rows = flattener.flatten_page(&second).unwrap();

    assert_eq!(rows[0].get("id"), Some("2"));
    assert_eq!(rows[0].get("somethingelse"), None);
}

#[test]
fn test_short_and_long_records() {
    let page = dataset_page(
        0,
        &["A", "B"],
        vec![vec![json!("x")], vec![json!("p"), json!("q"), json!("r")]],
    );
    let rows = RowFlattener::default().flatten_page(&page).unwrap();

    assert_eq!(rows[0].get("b"), Some(""));
    assert_eq!(rows[1].len(), 2);
    assert_eq!(rows[1].get("b"), Some("q"));
}

#[test]
fn test_colliding_labels_overwrite() {
    let page = dataset_page(
        0,
        &["Order Date", "Other", "order date"],
        vec![vec![json!("first"), json!("o"), json!("second")]],
    );
    let rows = RowFlattener::new(KeyCollision::Overwrite)
        .flatten_page(&page)
        .unwrap();

    assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["orderdate", "other"]);
    assert_eq!(rows[0].get("orderdate"), Some("second"));
}

#[test]
fn test_colliding_labels_rejected() {
    let columns = vec![ColumnDef::labeled("Order Date"), ColumnDef::labeled("OrderDate")];
    let err = ColumnKeys::build(&columns, KeyCollision::Reject).unwrap_err();

    assert!(matches!(
        err,
        FlattenError::DuplicateColumnKey { ref key, .. } if key == "orderdate"
    ));
}

#[test]
fn test_flat_row_serializes_in_column_order() {
    let page = dataset_page(
        0,
        &["Zeta", "Alpha"],
        vec![vec![json!("z"), json!(1.5)]],
    );
    let rows = RowFlattener::default().flatten_page(&page).unwrap();

    insta::assert_snapshot!(
        serde_json::to_string(&rows[0]).unwrap(),
        @r#"{"zeta":"z","alpha":"1.5"}"#
    );
}
