use std::path::Path;
use std::sync::Arc;

use calamine::{open_workbook_auto, Data, Reader};

use crate::errors::LoaderError;
use crate::model::{RawValue, RawYearTable, SourceKind};
use crate::registry::SourceLoader;

use super::{clean_headers, file_extension, file_name, fit_row};

/// Reads the first worksheet of a workbook; its first row holds the headers.
pub struct SpreadsheetLoader;

impl Default for SpreadsheetLoader {
    fn default() -> Self {
        Self
    }
}

impl SpreadsheetLoader {
    const NAME: &'static str = "SPREADSHEET";
    const EXTENSIONS: &'static [&'static str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

    fn check_extension(path: &Path) -> Result<(), LoaderError> {
        match file_extension(path) {
            Some(ext) if Self::EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            Some(ext) => Err(LoaderError::FormatMismatch {
                loader: Self::NAME,
                reason: format!("extension '.{ext}' is not a spreadsheet"),
            }),
            None => Err(LoaderError::FormatMismatch {
                loader: Self::NAME,
                reason: "file has no extension".to_string(),
            }),
        }
    }

    fn cell_value(cell: &Data) -> RawValue {
        match cell {
            Data::Empty | Data::Error(_) => RawValue::Empty,
            Data::String(text) => RawValue::from_text(text),
            Data::Float(value) => RawValue::Number(*value),
            Data::Int(value) => RawValue::Number(*value as f64),
            Data::Bool(value) => RawValue::Bool(*value),
            other => RawValue::from_text(&other.to_string()),
        }
    }

    fn cell_header(cell: &Data) -> String {
        match cell {
            Data::Empty | Data::Error(_) => String::new(),
            Data::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

impl SourceLoader for SpreadsheetLoader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn load(&self, path: &Path, year: i32) -> Result<RawYearTable, LoaderError> {
        Self::check_extension(path)?;

        let mut workbook = open_workbook_auto(path).map_err(|err| LoaderError::Spreadsheet {
            loader: Self::NAME,
            source: err,
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoaderError::MissingHeader {
                loader: Self::NAME,
                path: path.to_path_buf(),
            })?
            .map_err(|err| LoaderError::Spreadsheet {
                loader: Self::NAME,
                source: err,
            })?;

        let mut sheet_rows = range.rows();
        let header = sheet_rows.next().ok_or_else(|| LoaderError::MissingHeader {
            loader: Self::NAME,
            path: path.to_path_buf(),
        })?;
        if header.iter().all(|cell| Self::cell_header(cell).trim().is_empty()) {
            return Err(LoaderError::MissingHeader {
                loader: Self::NAME,
                path: path.to_path_buf(),
            });
        }
        let headers = clean_headers(header.iter().map(Self::cell_header));

        let mut rows = Vec::new();
        let mut skipped_rows = Vec::new();

        for (row_idx, cells) in sheet_rows.enumerate() {
            let line = row_idx + 2;
            let values: Vec<RawValue> = cells.iter().map(Self::cell_value).collect();
            let row = match fit_row(&headers, line, values) {
                Ok(row) => row,
                Err(skipped) => {
                    skipped_rows.push(skipped);
                    continue;
                }
            };
            rows.push(Arc::new(row));
        }

        if rows.is_empty() {
            return Err(LoaderError::EmptyData { loader: Self::NAME });
        }

        Ok(RawYearTable {
            year,
            source_file: file_name(path),
            source_kind: SourceKind::Spreadsheet,
            headers,
            rows,
            skipped_rows,
        })
    }
}
