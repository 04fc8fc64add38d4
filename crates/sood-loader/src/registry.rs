use std::path::Path;

use crate::errors::{LoaderAttempt, LoaderError};
use crate::formats::{DelimitedTextLoader, SpreadsheetLoader};
use crate::model::RawYearTable;

pub trait SourceLoader {
    fn name(&self) -> &'static str;
    fn load(&self, path: &Path, year: i32) -> Result<RawYearTable, LoaderError>;
}

pub fn load_source_file(path: &Path, year: i32) -> Result<RawYearTable, LoaderError> {
    let spreadsheet = SpreadsheetLoader;
    let tab_delimited = DelimitedTextLoader::tab();
    let comma_delimited = DelimitedTextLoader::comma();
    let loaders: [&dyn SourceLoader; 3] = [&spreadsheet, &tab_delimited, &comma_delimited];
    load_with_loaders(path, year, &loaders)
}

pub fn load_with_loaders(
    path: &Path,
    year: i32,
    loaders: &[&dyn SourceLoader],
) -> Result<RawYearTable, LoaderError> {
    let mut attempts = Vec::new();

    for loader in loaders {
        match loader.load(path, year) {
            Ok(table) => return Ok(table),
            Err(LoaderError::FormatMismatch { reason, .. }) => {
                attempts.push(LoaderAttempt::new(loader.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(LoaderError::NoMatchingLoader {
        path: path.to_path_buf(),
        attempts,
    })
}
