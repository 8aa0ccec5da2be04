//! Row flattening: native records to uniform string-keyed rows.
//!
//! Column labels are sanitised into [`ColumnKey`]s once per request, from the
//! first page's schema, and reused for every row that follows. Dataset records
//! map by position; search rows map by column, preferring the display text
//! over the raw value.
//!
//! Nothing here performs I/O or logs.

mod row;

pub use row::FlatRow;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::report::ColumnDef;
use crate::source::{DatasetRecord, NativePage, NativeRecords, SearchCell, SearchRow};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Errors raised while building column keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    #[error("columns '{first}' and '{second}' both map to key '{key}'")]
    DuplicateColumnKey {
        key: String,
        first: String,
        second: String,
    },
}

/// What to do when two column labels sanitise to the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCollision {
    /// Keep one key at the first column's position; the later column's value
    /// replaces the earlier one in every row.
    #[default]
    Overwrite,
    /// Fail key construction.
    Reject,
}

/// A sanitised column label: lower-cased with all whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey(String);

impl ColumnKey {
    pub fn from_label(label: &str) -> Self {
        Self(sanitize_label(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ColumnKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lower-case `label` and strip every whitespace run.
pub fn sanitize_label(label: &str) -> String {
    WHITESPACE.replace_all(&label.to_lowercase(), "").into_owned()
}

/// Positional column keys paired with the columns they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKeys {
    keys: Vec<ColumnKey>,
    columns: Vec<ColumnDef>,
}

impl ColumnKeys {
    /// Build keys for `columns` in order.
    pub fn build(columns: &[ColumnDef], collision: KeyCollision) -> Result<Self, FlattenError> {
        let mut keys: Vec<ColumnKey> = Vec::with_capacity(columns.len());
        for column in columns {
            let key = ColumnKey::from_label(column.display_label());
            if collision == KeyCollision::Reject {
                if let Some(pos) = keys.iter().position(|k| *k == key) {
                    return Err(FlattenError::DuplicateColumnKey {
                        key: key.0,
                        first: columns[pos].display_label().to_string(),
                        second: column.display_label().to_string(),
                    });
                }
            }
            keys.push(key);
        }
        Ok(Self {
            keys,
            columns: columns.to_vec(),
        })
    }

    pub fn keys(&self) -> &[ColumnKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &ColumnDef)> {
        self.keys.iter().zip(self.columns.iter())
    }
}

/// Render a raw value as a row string. `null` becomes `""`.
pub fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolve a search cell: text if non-empty, else raw value, else `""`.
pub fn resolve_search_cell(cell: Option<&SearchCell>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    if let Some(text) = cell.text.as_deref().filter(|t| !t.is_empty()) {
        return text.to_string();
    }
    cell.value.as_ref().map(render_value).unwrap_or_default()
}

/// Flatten a dataset record by position.
///
/// Records shorter than the schema are padded with `""`; values beyond the
/// schema are dropped.
pub fn flatten_dataset_record(keys: &ColumnKeys, record: &DatasetRecord) -> FlatRow {
    let mut row = FlatRow::with_capacity(keys.len());
    for (index, key) in keys.keys().iter().enumerate() {
        let value = record.values.get(index).map(render_value).unwrap_or_default();
        row.insert(key.as_str(), value);
    }
    row
}

/// Flatten a search row by column.
pub fn flatten_search_row(keys: &ColumnKeys, record: &SearchRow) -> FlatRow {
    let mut row = FlatRow::with_capacity(keys.len());
    for (key, column) in keys.iter() {
        row.insert(key.as_str(), resolve_search_cell(record.cell(column)));
    }
    row
}

/// Flattens successive native pages of one report.
///
/// Keys are captured from the first page flattened and reused for all later
/// pages.
#[derive(Debug, Clone, Default)]
pub struct RowFlattener {
    collision: KeyCollision,
    keys: Option<ColumnKeys>,
}

impl RowFlattener {
    pub fn new(collision: KeyCollision) -> Self {
        Self {
            collision,
            keys: None,
        }
    }

    /// Keys in use, once the first page has been seen.
    pub fn keys(&self) -> Option<&ColumnKeys> {
        self.keys.as_ref()
    }

    pub fn flatten_page(&mut self, page: &NativePage) -> Result<Vec<FlatRow>, FlattenError> {
        let keys = match self.keys.take() {
            Some(keys) => keys,
            None => ColumnKeys::build(&page.columns, self.collision)?,
        };

        let rows = match &page.records {
            NativeRecords::Positional(records) => records
                .iter()
                .map(|r| flatten_dataset_record(&keys, r))
                .collect(),
            NativeRecords::Paired(records) => records
                .iter()
                .map(|r| flatten_search_row(&keys, r))
                .collect(),
        };

        self.keys = Some(keys);
        Ok(rows)
    }
}
