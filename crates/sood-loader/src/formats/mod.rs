mod common;
mod delimited;
mod spreadsheet;

pub use delimited::DelimitedTextLoader;
pub use spreadsheet::SpreadsheetLoader;

pub(crate) use common::{clean_headers, file_extension, file_name, fit_row};
#[cfg(test)]
pub(crate) use delimited::decode_text;
