//! Wire types exchanged with the analysis backend.
//!
//! Field names follow the backend's JSON (`basic_info.rows`, `numeric_stats`,
//! `report_type`, ...). Everything optional on the wire defaults so a leaner
//! backend still decodes. The backend writes NaN and infinity as `null`, so
//! every numeric summary field is optional. Stats are posted back on generate
//! and chat, so fields this client does not model are carried in `extra`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dataset statistics produced once per successful analyze call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Stats {
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub numeric_stats: BTreeMap<String, NumericSummary>,
    /// Pair label (e.g. `"views vs earnings"`) to coefficient in `[-1, 1]`.
    #[serde(default)]
    pub correlation: BTreeMap<String, f64>,
    /// Sections such as `categorical_stats`, round-tripped untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BasicInfo {
    #[serde(rename = "rows")]
    pub row_count: u64,
    #[serde(rename = "columns", default)]
    pub column_names: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub missing_values: BTreeMap<String, u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NumericSummary {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stats {
    pub fn column_count(&self) -> usize {
        self.basic_info.column_names.len()
    }

    /// Correlation pairs ordered by absolute strength, strongest first.
    pub fn strongest_correlations(&self) -> Vec<(&str, f64)> {
        let mut pairs: Vec<(&str, f64)> = self
            .correlation
            .iter()
            .map(|(label, value)| (label.as_str(), *value))
            .collect();
        pairs.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        pairs
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Correlation,
    Distribution,
    Category,
}

/// A chart artifact rendered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plot {
    #[serde(rename = "type")]
    pub kind: PlotKind,
    pub title: String,
    /// Opaque image location, embedded verbatim into the report.
    #[serde(alias = "file")]
    pub url: String,
}

impl Plot {
    pub fn new(kind: PlotKind, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A table file picked by the user, uploaded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        let lower = self.name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            "text/csv"
        } else if lower.ends_with(".json") {
            "application/json"
        } else if lower.ends_with(".xlsx") {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        } else if lower.ends_with(".xls") {
            "application/vnd.ms-excel"
        } else {
            "application/octet-stream"
        }
    }
}

/// File-picker `accept` filter. Format validation itself happens server side.
pub const ACCEPTED_UPLOAD_EXTENSIONS: &str = ".csv,.xlsx,.xls,.json";

/// Successful analyze payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub stats: Stats,
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub plots: Vec<Plot>,
    #[serde(default)]
    pub preview: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub stats: &'a Stats,
    pub instruction: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    pub report: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub stats: &'a Stats,
    pub history: &'a [Message],
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
