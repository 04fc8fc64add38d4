use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::LoaderError;

static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])(20\d{2})(?:[^0-9]|$)").expect("valid year regex"));

/// Exports published without a survey year in their file name.
const HISTORICAL_EXCEPTIONS: [(&str, i32); 2] = [
    ("open_data_survey_raw_responses", 2019),
    ("state_of_open_data_full_dataset", 2022),
];

/// Derives the survey year from an export's file name: the two historical
/// exceptions first, then the first standalone `20xx` token.
pub fn year_from_filename(file_name: &str) -> Result<i32, LoaderError> {
    let normalized: String = file_name
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();

    if let Some((_, year)) = HISTORICAL_EXCEPTIONS
        .iter()
        .find(|(marker, _)| normalized.contains(marker))
    {
        return Ok(*year);
    }

    YEAR_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .ok_or_else(|| LoaderError::UnknownYear {
            file: file_name.to_string(),
        })
}
