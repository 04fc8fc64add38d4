use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Spreadsheet,
    DelimitedText,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Spreadsheet => "spreadsheet",
            SourceKind::DelimitedText => "delimited_text",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceKind::Spreadsheet),
            "tsv" | "tab" | "txt" | "csv" => Some(SourceKind::DelimitedText),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell as it appeared in the export. Spreadsheet cells keep their
/// numeric and boolean types; delimited text only ever yields `Text` or `Empty`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(trimmed.to_string())
        }
    }

    /// Blank strings and the literal `nan` left behind by some exports count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
            }
            RawValue::Number(value) => value.is_nan(),
            RawValue::Bool(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        if self.is_empty() {
            return None;
        }
        match self {
            RawValue::Empty => None,
            RawValue::Text(text) => Some(Cow::Borrowed(text.trim())),
            RawValue::Bool(value) => Some(Cow::Owned(value.to_string())),
            RawValue::Number(value) => Some(Cow::Owned(format_number(*value))),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One exported row, keyed by the header text of the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    values: BTreeMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, header: &str) -> Option<&RawValue> {
        self.values.get(header)
    }

    /// Returns the value under `header` only when it holds something.
    pub fn non_empty(&self, header: &str) -> Option<&RawValue> {
        self.values.get(header).filter(|value| !value.is_empty())
    }

    pub fn insert(&mut self, header: impl Into<String>, value: RawValue) {
        self.values.insert(header.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(RawValue::is_empty)
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(header, value)| (header.into(), value))
            .collect();
        Self { values }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// Everything read from one yearly export. Rows are shared snapshots so that
/// downstream records can keep a reference to their originating row.
#[derive(Debug, Clone)]
pub struct RawYearTable {
    pub year: i32,
    pub source_file: String,
    pub source_kind: SourceKind,
    pub headers: Vec<String>,
    pub rows: Vec<Arc<RawRow>>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl RawYearTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
