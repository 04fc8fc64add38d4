use std::fs;
use std::path::Path;
use std::sync::Arc;

use encoding_rs::UTF_8;

use crate::errors::LoaderError;
use crate::model::{RawValue, RawYearTable, SkippedRow, SourceKind};
use crate::registry::SourceLoader;

use super::{clean_headers, file_extension, file_name, fit_row};

/// Reads delimited text exports. The first line holds the headers; every
/// following line is one response.
pub struct DelimitedTextLoader {
    name: &'static str,
    delimiter: u8,
    extensions: &'static [&'static str],
}

impl DelimitedTextLoader {
    pub fn tab() -> Self {
        Self {
            name: "TAB_DELIMITED",
            delimiter: b'\t',
            extensions: &["tsv", "tab", "txt"],
        }
    }

    pub fn comma() -> Self {
        Self {
            name: "COMMA_DELIMITED",
            delimiter: b',',
            extensions: &["csv"],
        }
    }

    fn check_extension(&self, path: &Path) -> Result<(), LoaderError> {
        match file_extension(path) {
            Some(ext) if self.extensions.contains(&ext.as_str()) => Ok(()),
            Some(ext) => Err(LoaderError::FormatMismatch {
                loader: self.name,
                reason: format!("extension '.{ext}' is not delimited text"),
            }),
            None => Err(LoaderError::FormatMismatch {
                loader: self.name,
                reason: "file has no extension".to_string(),
            }),
        }
    }

    /// Parses already-decoded file content. Exposed so fixtures and callers
    /// holding the text in memory do not need to go through the file system.
    pub fn parse_content(
        &self,
        content: &str,
        source_file: &str,
        year: i32,
    ) -> Result<RawYearTable, LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let header = records
            .next()
            .ok_or_else(|| LoaderError::MissingHeader {
                loader: self.name,
                path: source_file.into(),
            })?
            .map_err(|err| LoaderError::Csv {
                loader: self.name,
                source: err,
            })?;
        if header.iter().all(|cell| cell.trim().is_empty()) {
            return Err(LoaderError::MissingHeader {
                loader: self.name,
                path: source_file.into(),
            });
        }
        let headers = clean_headers(header.iter());

        let mut rows = Vec::new();
        let mut skipped_rows = Vec::new();

        for (row_idx, record) in records.enumerate() {
            let line = row_idx + 2; // header occupies line 1

            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    skipped_rows.push(SkippedRow {
                        line,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let values: Vec<RawValue> = record.iter().map(RawValue::from_text).collect();
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
            return Err(LoaderError::EmptyData { loader: self.name });
        }

        Ok(RawYearTable {
            year,
            source_file: source_file.to_string(),
            source_kind: SourceKind::DelimitedText,
            headers,
            rows,
            skipped_rows,
        })
    }
}

impl SourceLoader for DelimitedTextLoader {
    fn name(&self) -> &'static str {
        self.name
    }

    fn load(&self, path: &Path, year: i32) -> Result<RawYearTable, LoaderError> {
        self.check_extension(path)?;
        let bytes = fs::read(path).map_err(|err| LoaderError::Io {
            loader: self.name,
            path: path.to_path_buf(),
            source: err,
        })?;
        let content = decode_text(&bytes);
        self.parse_content(&content, &file_name(path), year)
    }
}

/// Survey platforms export tab-delimited text as UTF-16 LE more often than not.
/// A byte-order mark selects UTF-8 or UTF-16; without one the bytes are read
/// as UTF-8 with malformed sequences replaced.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let (content, _, _) = UTF_8.decode(bytes);
    content.into_owned()
}
