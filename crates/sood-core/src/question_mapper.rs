use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalogue::{Category, ResponseType, CATALOGUE};

/// Header discovery only trusts containment when the shorter side is at least
/// this long, so short codes like `Q2.1` never latch onto unrelated questions.
const MIN_DISCOVERY_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMapping {
    pub semantic_id: String,
    pub category: Category,
    pub field: String,
    pub question_text: String,
    pub response_type: ResponseType,
    /// Curated spellings first, then those discovered in loaded headers. A
    /// spelling ending in `*` matches every header with that prefix.
    pub year_headers: BTreeMap<i32, Vec<String>>,
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub response_scale: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl QuestionMapping {
    pub fn years_available(&self) -> Vec<i32> {
        self.year_headers
            .iter()
            .filter(|(_, headers)| !headers.is_empty())
            .map(|(year, _)| *year)
            .collect()
    }

    pub fn headers_for_year(&self, year: i32) -> &[String] {
        self.year_headers
            .get(&year)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn knows_header(&self, year: i32, header: &str) -> bool {
        self.headers_for_year(year)
            .iter()
            .any(|known| header_matches(known, header))
    }
}

/// The single cross-year mapping table: every catalogue field with the header
/// spellings known to carry it, per year, plus year-agnostic synonyms.
#[derive(Debug, Clone)]
pub struct QuestionMapper {
    mappings: Vec<QuestionMapping>,
}

impl Default for QuestionMapper {
    fn default() -> Self {
        Self::seeded()
    }
}

impl QuestionMapper {
    /// Mapper holding only the hand-curated catalogue entries.
    pub fn seeded() -> Self {
        let mappings = CATALOGUE
            .iter()
            .map(|spec| {
                let mut year_headers: BTreeMap<i32, Vec<String>> = BTreeMap::new();
                for (year, header) in spec.year_headers {
                    year_headers
                        .entry(*year)
                        .or_default()
                        .push((*header).to_string());
                }
                QuestionMapping {
                    semantic_id: spec.semantic_id(),
                    category: spec.category,
                    field: spec.id.to_string(),
                    question_text: spec.question.to_string(),
                    response_type: spec.response_type,
                    year_headers,
                    synonyms: spec.synonyms.iter().map(|s| s.to_string()).collect(),
                    response_scale: spec.response_scale.iter().map(|s| s.to_string()).collect(),
                    selection_option: spec.selection_option.map(str::to_string),
                    notes: spec.notes.map(str::to_string),
                }
            })
            .collect();
        Self { mappings }
    }

    pub fn mappings(&self) -> &[QuestionMapping] {
        &self.mappings
    }

    pub fn mapping(&self, category: Category, field: &str) -> Option<&QuestionMapping> {
        self.mappings
            .iter()
            .find(|m| m.category == category && m.field == field)
    }

    /// Registers headers of a loaded year that spell out a catalogue question
    /// (or one of its synonyms). Returns how many new spellings were recorded.
    pub fn observe<S: AsRef<str>>(&mut self, year: i32, headers: &[S]) -> usize {
        let mut discovered = 0;

        for header in headers {
            let header = header.as_ref();
            let normalized = normalize(header);
            if normalized.is_empty() {
                continue;
            }
            if self.mappings.iter().any(|m| m.knows_header(year, header)) {
                continue;
            }

            let hit = self.mappings.iter_mut().find(|mapping| {
                std::iter::once(mapping.question_text.as_str())
                    .chain(mapping.synonyms.iter().map(String::as_str))
                    .any(|known| discovery_match(&normalized, &normalize(known)))
            });

            if let Some(mapping) = hit {
                mapping
                    .year_headers
                    .entry(year)
                    .or_default()
                    .push(header.to_string());
                discovered += 1;
            }
        }

        discovered
    }

    /// Ordered header spellings to try for a field in a given year:
    /// year-specific spellings first, then the year-agnostic synonyms.
    pub fn candidates(&self, category: Category, field: &str, year: i32) -> Vec<&str> {
        let Some(mapping) = self.mapping(category, field) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = Vec::new();
        for header in mapping
            .headers_for_year(year)
            .iter()
            .chain(mapping.synonyms.iter())
        {
            if !out.contains(&header.as_str()) {
                out.push(header);
            }
        }
        out
    }

    /// Resolves an arbitrary header to the mapping it most likely expresses in
    /// `year`. Exact normalized matches win over prefix patterns, which win
    /// over containment.
    pub fn find_best_match(&self, header: &str, year: i32) -> Option<&QuestionMapping> {
        let query = normalize(header);
        if query.is_empty() {
            return None;
        }

        let registered = |mapping: &QuestionMapping| -> Vec<String> {
            mapping
                .headers_for_year(year)
                .iter()
                .chain(mapping.synonyms.iter())
                .filter(|h| !h.ends_with('*'))
                .map(|h| normalize(h))
                .filter(|h| !h.is_empty())
                .collect()
        };

        self.mappings
            .iter()
            .find(|mapping| registered(mapping).iter().any(|known| *known == query))
            .or_else(|| {
                self.mappings.iter().find(|mapping| {
                    mapping
                        .headers_for_year(year)
                        .iter()
                        .any(|known| known.ends_with('*') && header_matches(known, header))
                })
            })
            .or_else(|| {
                self.mappings.iter().find(|mapping| {
                    registered(mapping)
                        .iter()
                        .any(|known| known.contains(&query) || query.contains(known.as_str()))
                })
            })
    }

    pub fn questions_for_year(&self, year: i32) -> Vec<&QuestionMapping> {
        self.mappings
            .iter()
            .filter(|m| !m.headers_for_year(year).is_empty())
            .collect()
    }

    pub fn longitudinal_questions(&self, min_years: usize) -> Vec<&QuestionMapping> {
        self.mappings
            .iter()
            .filter(|m| m.years_available().len() >= min_years)
            .collect()
    }

    /// Attitude questions asked in at least three survey years.
    pub fn core_trend_questions(&self) -> Vec<&QuestionMapping> {
        self.mappings
            .iter()
            .filter(|m| m.category == Category::Attitudes && m.years_available().len() >= 3)
            .collect()
    }

    /// `semantic id -> year -> header`, using the first known spelling per year.
    pub fn column_mapping(&self) -> BTreeMap<String, BTreeMap<i32, String>> {
        self.mappings
            .iter()
            .map(|mapping| {
                let per_year = mapping
                    .year_headers
                    .iter()
                    .filter_map(|(year, headers)| headers.first().map(|h| (*year, h.clone())))
                    .collect();
                (mapping.semantic_id.clone(), per_year)
            })
            .collect()
    }
}

/// Lowercases, drops everything that is not alphanumeric or whitespace, and
/// collapses runs of whitespace.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `header` is the spelling `known`, or starts with it when `known` is
/// a `prefix*` pattern.
pub fn header_matches(known: &str, header: &str) -> bool {
    match known.strip_suffix('*') {
        Some(prefix) => header.starts_with(prefix),
        None => known == header,
    }
}

fn discovery_match(header: &str, known: &str) -> bool {
    if known.is_empty() {
        return false;
    }
    let shorter = header.len().min(known.len());
    shorter >= MIN_DISCOVERY_LEN && (header.contains(known) || known.contains(header))
}
