pub mod errors;
pub mod formats;
pub mod model;
mod registry;
mod year;

pub use errors::{LoaderAttempt, LoaderError};
pub use model::{RawRow, RawValue, RawYearTable, SkippedRow, SourceKind};
pub use registry::{load_source_file, load_with_loaders, SourceLoader};
pub use year::year_from_filename;

#[cfg(test)]
mod tests;
