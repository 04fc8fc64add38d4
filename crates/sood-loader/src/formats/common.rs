use std::collections::HashSet;
use std::path::Path;

use crate::model::{RawRow, RawValue, SkippedRow};

const UTF8_BOM: char = '\u{feff}';

pub(crate) fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Trims header cells, names blank ones after their position and suffixes
/// repeated names (`Q1`, `Q1 (2)`, `Q1 (3)`). A suffixed name is checked
/// against every header already emitted, so headers are unique keys.
pub(crate) fn clean_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let raw: Vec<String> = raw
        .into_iter()
        .map(|value| value.as_ref().trim().trim_start_matches(UTF8_BOM).trim().to_string())
        .collect();
    // Names that appear verbatim are reserved so a suffix never shadows them.
    let reserved: HashSet<&str> = raw
        .iter()
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .collect();
    let mut emitted: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (idx, trimmed) in raw.iter().enumerate() {
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.clone()
        };

        let mut header = base.clone();
        let mut n = 2;
        while emitted.contains(&header) || (header != base && reserved.contains(header.as_str())) {
            header = format!("{base} ({n})");
            n += 1;
        }
        emitted.insert(header.clone());
        headers.push(header);
    }

    headers
}

pub(crate) fn build_row(headers: &[String], values: Vec<RawValue>) -> RawRow {
    let mut row = RawRow::new();
    let mut values = values.into_iter();
    for header in headers {
        row.insert(header.clone(), values.next().unwrap_or_default());
    }
    row
}

/// Places one data row under the headers. Short rows are padded; a row with
/// values past the last header, or with no values at all, is skipped.
pub(crate) fn fit_row(
    headers: &[String],
    line: usize,
    values: Vec<RawValue>,
) -> Result<RawRow, SkippedRow> {
    let overflow = values.iter().skip(headers.len()).any(|value| !value.is_empty());
    if overflow {
        return Err(SkippedRow {
            line,
            reason: format!(
                "expected at most {} fields but found {}",
                headers.len(),
                values.len()
            ),
        });
    }

    let row = build_row(headers, values);
    if row.is_empty() {
        return Err(SkippedRow {
            line,
            reason: "row contained no values".to_string(),
        });
    }
    Ok(row)
}
