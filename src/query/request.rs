//! Request parameters and their validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

use super::error::QueryError;

/// Report id parameter.
pub const PARAM_REPORT_ID: &str = "analyticsreportid";
/// Output page index parameter (data queries only).
pub const PARAM_PAGE_INDEX: &str = "pageindex";
/// Output page size parameter, in native pages.
pub const PARAM_PAGES_TO_LOAD: &str = "pagestoload";

/// Which query is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOperation {
    Metadata,
    Data,
}

impl fmt::Display for QueryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metadata => f.write_str("metadata"),
            Self::Data => f.write_str("data"),
        }
    }
}

/// The flat key/value map a request arrives as.
///
/// Values may be JSON numbers or strings; query strings always produce
/// strings. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestParams {
    #[serde(default)]
    pub analyticsreportid: Option<serde_json::Value>,
    #[serde(default)]
    pub pageindex: Option<serde_json::Value>,
    #[serde(default)]
    pub pagestoload: Option<serde_json::Value>,
}

impl RequestParams {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            analyticsreportid: Some(serde_json::Value::String(report_id.into())),
            ..Self::default()
        }
    }

    pub fn with_page_index(mut self, page_index: impl Into<serde_json::Value>) -> Self {
        self.pageindex = Some(page_index.into());
        self
    }

    pub fn with_pages_to_load(mut self, pages_to_load: impl Into<serde_json::Value>) -> Self {
        self.pagestoload = Some(pages_to_load.into());
        self
    }

    /// Build from a transport's string key/value pairs, e.g. a query string.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = Some(serde_json::Value::String(value.to_string()));
            match key {
                PARAM_REPORT_ID => params.analyticsreportid = value,
                PARAM_PAGE_INDEX => params.pageindex = value,
                PARAM_PAGES_TO_LOAD => params.pagestoload = value,
                _ => {}
            }
        }
        params
    }

    /// The report id, if one was supplied, for diagnostics.
    pub fn report_id(&self) -> Option<String> {
        self.analyticsreportid
            .as_ref()
            .and_then(text_param)
    }
}

/// A validated metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    pub report_id: String,
    pub pages_to_load: NonZeroUsize,
}

impl MetadataRequest {
    pub fn from_params(params: &RequestParams) -> Result<Self, QueryError> {
        let report_id = required_report_id(params)?;
        let pages_to_load = required_pages_to_load(params)?;
        Ok(Self {
            report_id,
            pages_to_load,
        })
    }
}

/// A validated data query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
    pub report_id: String,
    pub page_index: usize,
    pub pages_to_load: NonZeroUsize,
}

impl DataRequest {
    pub fn from_params(params: &RequestParams) -> Result<Self, QueryError> {
        let report_id = required_report_id(params)?;
        let page_index = parse_count(PARAM_PAGE_INDEX, params.pageindex.as_ref())?
            .ok_or(QueryError::MissingParameter(PARAM_PAGE_INDEX))?;
        let pages_to_load = required_pages_to_load(params)?;
        Ok(Self {
            report_id,
            page_index,
            pages_to_load,
        })
    }
}

fn required_report_id(params: &RequestParams) -> Result<String, QueryError> {
    params
        .report_id()
        .ok_or(QueryError::MissingParameter(PARAM_REPORT_ID))
}

fn required_pages_to_load(params: &RequestParams) -> Result<NonZeroUsize, QueryError> {
    let raw = params.pagestoload.as_ref();
    let count = parse_count(PARAM_PAGES_TO_LOAD, raw)?
        .ok_or(QueryError::MissingParameter(PARAM_PAGES_TO_LOAD))?;
    NonZeroUsize::new(count).ok_or_else(|| QueryError::InvalidParameter {
        name: PARAM_PAGES_TO_LOAD,
        value: count.to_string(),
        expected: "a positive integer",
    })
}

/// Non-empty trimmed string form of a parameter.
fn text_param(value: &serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Parse a non-negative integer parameter.
///
/// Absent, `null` and blank values are missing (`Ok(None)`); anything else
/// that is not a non-negative integer is invalid.
fn parse_count(
    name: &'static str,
    value: Option<&serde_json::Value>,
) -> Result<Option<usize>, QueryError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let invalid = |shown: String| QueryError::InvalidParameter {
        name,
        value: shown,
        expected: "a non-negative integer",
    };
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(n.to_string())),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<usize>()
                .map(Some)
                .map_err(|_| invalid(trimmed.to_string()))
        }
        other => Err(invalid(other.to_string())),
    }
}
