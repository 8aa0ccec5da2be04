//! Report identity and classification.
//!
//! A report id carries its kind in its naming convention: saved search ids
//! contain `customsearch`, dataset ids contain `custdataset`. The kind is
//! resolved exactly once, at request entry, by [`ReportKind::classify`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id substring that marks a saved search.
pub const SEARCH_ID_MARKER: &str = "customsearch";

/// Id substring that marks a dataset.
pub const DATASET_ID_MARKER: &str = "custdataset";

/// The two supported report shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Columnar dataset: positional value arrays plus a per-page column schema.
    Dataset,
    /// Saved search: display/raw value pairs over a fixed column list.
    Search,
}

impl ReportKind {
    /// Classify a report id by its naming convention.
    ///
    /// The search marker is checked first, so an id containing both markers
    /// is a search. Returns `None` when neither marker is present.
    pub fn classify(report_id: &str) -> Option<Self> {
        if report_id.contains(SEARCH_ID_MARKER) {
            Some(Self::Search)
        } else if report_id.contains(DATASET_ID_MARKER) {
            Some(Self::Dataset)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified report id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportRef {
    pub id: String,
    pub kind: ReportKind,
}

impl ReportRef {
    /// Classify `id`, returning `None` if it matches neither convention.
    pub fn parse(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let kind = ReportKind::classify(&id)?;
        Some(Self { id, kind })
    }
}

impl fmt::Display for ReportRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

/// One column as described by the report store.
///
/// Datasets describe columns per fetched page; searches describe them once on
/// the report definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Stable column identifier (field id or search column name).
    #[serde(default)]
    pub name: Option<String>,
    /// Human-facing label.
    #[serde(default)]
    pub label: Option<String>,
    /// Join path for search columns drawn from a related record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
    /// Summary function for grouped search columns, e.g. `SUM` or `MAX`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Formula expression for formula search columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl ColumnDef {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.join = Some(join.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// The text a column key is derived from: label, then name, then `column`.
    pub fn display_label(&self) -> &str {
        non_empty(self.label.as_deref())
            .or_else(|| non_empty(self.name.as_deref()))
            .unwrap_or("column")
    }

    /// Identifier search rows use to address this column's cell.
    ///
    /// Built from the name (or label when the store supplied no name), then
    /// `join.` prefix, `:formula` suffix and `SUMMARY(...)` wrapper as present:
    /// `SUM(customer.amount)`, `formulatext:{a}||{b}`. Two columns over the
    /// same field address different cells unless every attribute matches.
    pub fn cell_ref(&self) -> String {
        let name = non_empty(self.name.as_deref())
            .or_else(|| non_empty(self.label.as_deref()))
            .unwrap_or("column");
        let mut cell = match non_empty(self.join.as_deref()) {
            Some(join) => format!("{}.{}", join, name),
            None => name.to_string(),
        };
        if let Some(formula) = non_empty(self.formula.as_deref()) {
            cell = format!("{}:{}", cell, formula);
        }
        match non_empty(self.summary.as_deref()) {
            Some(summary) => format!("{}({})", summary, cell),
            None => cell,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// A report as loaded from the store for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub id: String,
    pub kind: ReportKind,
    /// Dataset name or search title.
    pub name: String,
    /// Dataset type or search record type.
    pub report_type: String,
    /// Static columns. Populated for searches; datasets leave this empty and
    /// describe columns on each fetched page instead.
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}
