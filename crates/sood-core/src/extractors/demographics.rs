use sood_loader::RawValue;

use crate::catalogue::{Category, FieldSpec};
use crate::model::ResponseValue;

use super::CategoryExtractor;

/// Demographic fields are kept as text; the first non-empty cell wins.
pub struct DemographicExtractor;

impl CategoryExtractor for DemographicExtractor {
    fn category(&self) -> Category {
        Category::Demographics
    }

    fn convert(&self, _spec: &FieldSpec, value: &RawValue) -> Option<ResponseValue> {
        let text = value.as_text()?;
        let text = text.trim();
        (!text.is_empty()).then(|| ResponseValue::Text(text.to_string()))
    }

    fn convert_option(&self, _selected: bool) -> Option<ResponseValue> {
        None
    }
}

struct Term {
    canonical: &'static str,
    /// Whole-value spellings, compared ignoring ASCII case.
    aliases: &'static [&'static str],
    /// Lowercase fragments; the first term with a fragment inside the value wins.
    patterns: &'static [&'static str],
}

struct Vocabulary {
    field: &'static str,
    terms: &'static [Term],
}

impl Vocabulary {
    fn standardize(&self, value: &str) -> Option<&'static str> {
        let exact = self.terms.iter().find(|term| {
            term.canonical.eq_ignore_ascii_case(value)
                || term.aliases.iter().any(|a| a.eq_ignore_ascii_case(value))
        });
        if let Some(term) = exact {
            return Some(term.canonical);
        }

        let lowered = value.to_lowercase();
        self.terms
            .iter()
            .find(|term| term.patterns.iter().any(|p| lowered.contains(p)))
            .map(|term| term.canonical)
    }
}

const JOB_TITLE: Vocabulary = Vocabulary {
    field: "jobTitle",
    terms: &[
        Term {
            canonical: "Associate Professor",
            aliases: &["Reader", "Senior Lecturer"],
            patterns: &["associate professor"],
        },
        Term {
            canonical: "Assistant Professor",
            aliases: &[],
            patterns: &["assistant professor"],
        },
        Term {
            canonical: "Postdoc",
            aliases: &["Post-doc", "Postdoctoral researcher"],
            patterns: &["postdoc", "post-doc", "post doc"],
        },
        Term {
            canonical: "PhD Student",
            aliases: &["PhD candidate", "Doctoral student"],
            patterns: &["phd", "doctoral", "graduate student"],
        },
        Term {
            canonical: "Professor",
            aliases: &["Full professor", "Prof"],
            patterns: &["professor"],
        },
        Term {
            canonical: "Lecturer",
            aliases: &[],
            patterns: &["lecturer"],
        },
        Term {
            canonical: "Librarian",
            aliases: &[],
            patterns: &["librarian", "library"],
        },
        Term {
            canonical: "Research Scientist",
            aliases: &["Researcher", "Scientist"],
            patterns: &["research scientist", "researcher", "scientist"],
        },
        Term {
            canonical: "Other",
            aliases: &["Other (please specify)"],
            patterns: &[],
        },
    ],
};

const RESEARCH_AREA: Vocabulary = Vocabulary {
    field: "researchArea",
    terms: &[
        Term {
            canonical: "Biology",
            aliases: &["Life sciences", "Biological sciences"],
            patterns: &["biolog", "life science"],
        },
        Term {
            canonical: "Medicine",
            aliases: &["Medical sciences", "Health sciences"],
            patterns: &["medic", "health", "clinical"],
        },
        Term {
            canonical: "Chemistry",
            aliases: &[],
            patterns: &["chemi"],
        },
        Term {
            canonical: "Physics",
            aliases: &["Astronomy"],
            patterns: &["physic", "astronom"],
        },
        Term {
            canonical: "Earth and Environmental Sciences",
            aliases: &["Earth sciences", "Environmental sciences"],
            patterns: &["earth", "environment", "geo"],
        },
        Term {
            canonical: "Computer Science",
            aliases: &["Computing"],
            patterns: &["computer", "computing", "informatics"],
        },
        Term {
            canonical: "Engineering",
            aliases: &["Technology"],
            patterns: &["engineering"],
        },
        Term {
            canonical: "Mathematics",
            aliases: &["Maths", "Math", "Statistics"],
            patterns: &["mathemat"],
        },
        Term {
            canonical: "Social Sciences",
            aliases: &["Economics", "Psychology"],
            patterns: &["social", "econom", "psycholog"],
        },
        Term {
            canonical: "Humanities",
            aliases: &["Arts", "History"],
            patterns: &["humanit"],
        },
        Term {
            canonical: "Other",
            aliases: &["Other (please specify)"],
            patterns: &[],
        },
    ],
};

const ORGANIZATION_TYPE: Vocabulary = Vocabulary {
    field: "organizationType",
    terms: &[
        Term {
            canonical: "Medical school",
            aliases: &["Hospital", "Medical school or hospital"],
            patterns: &["medical school", "hospital"],
        },
        Term {
            canonical: "University",
            aliases: &["College", "Higher education"],
            patterns: &["universit", "college", "higher education"],
        },
        Term {
            canonical: "Research institution",
            aliases: &["Research institute", "Research centre", "Research center"],
            patterns: &["research institut", "research cent", "institute"],
        },
        Term {
            canonical: "Government",
            aliases: &["Government agency"],
            patterns: &["government", "ministry", "agency"],
        },
        Term {
            canonical: "Private company",
            aliases: &["Industry", "Corporate", "Commercial"],
            patterns: &["company", "corporat", "industry", "commercial"],
        },
        Term {
            canonical: "Other",
            aliases: &["Other (please specify)"],
            patterns: &[],
        },
    ],
};

const PUBLICATION_HISTORY: Vocabulary = Vocabulary {
    field: "publicationHistory",
    terms: &[
        Term {
            canonical: "Within the last year",
            aliases: &["In the last year", "Less than a year ago"],
            patterns: &["within the last year", "last 12 months", "less than a year"],
        },
        Term {
            canonical: "1-2 years ago",
            aliases: &["1 to 2 years ago", "One to two years ago"],
            patterns: &["1-2 year", "1 - 2 year", "1 to 2 year"],
        },
        Term {
            canonical: "3-5 years ago",
            aliases: &["3 to 5 years ago", "Three to five years ago"],
            patterns: &["3-5 year", "3 - 5 year", "3 to 5 year"],
        },
        Term {
            canonical: "More than 5 years ago",
            aliases: &["Over 5 years ago", "More than five years ago"],
            patterns: &["more than 5", "more than five", "over 5"],
        },
        Term {
            canonical: "Never",
            aliases: &["I have never published"],
            patterns: &["never"],
        },
    ],
};

const COUNTRY: Vocabulary = Vocabulary {
    field: "country",
    terms: &[
        Term {
            canonical: "United States",
            aliases: &["USA", "US", "U.S.", "U.S.A.", "America", "United States of America"],
            patterns: &["united states"],
        },
        Term {
            canonical: "United Kingdom",
            aliases: &["UK", "U.K.", "Great Britain", "Britain", "England", "Scotland", "Wales"],
            patterns: &["united kingdom"],
        },
        Term {
            canonical: "China",
            aliases: &["PRC", "People's Republic of China"],
            patterns: &[],
        },
        Term {
            canonical: "Germany",
            aliases: &["Deutschland"],
            patterns: &[],
        },
    ],
};

const VOCABULARIES: [&Vocabulary; 5] = [
    &JOB_TITLE,
    &RESEARCH_AREA,
    &ORGANIZATION_TYPE,
    &PUBLICATION_HISTORY,
    &COUNTRY,
];

/// Maps a demographic answer onto the canonical vocabulary of its field.
/// Values that match nothing are kept as trimmed; blank values yield `None`.
pub fn standardize_demographic(field: &str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let canonical = VOCABULARIES
        .iter()
        .find(|vocabulary| vocabulary.field == field)
        .and_then(|vocabulary| vocabulary.standardize(trimmed));
    Some(canonical.unwrap_or(trimmed).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_titles_collapse_onto_canonical_labels() {
        assert_eq!(
            standardize_demographic("jobTitle", "Assistant Professor of Biology").as_deref(),
            Some("Assistant Professor")
        );
        assert_eq!(
            standardize_demographic("jobTitle", "postdoctoral research fellow").as_deref(),
            Some("Postdoc")
        );
        assert_eq!(standardize_demographic("jobTitle", " Prof ").as_deref(), Some("Professor"));
    }

    #[test]
    fn short_country_codes_only_match_whole_values() {
        assert_eq!(standardize_demographic("country", "us").as_deref(), Some("United States"));
        assert_eq!(standardize_demographic("country", "Russia").as_deref(), Some("Russia"));
    }

    #[test]
    fn canonical_values_are_fixed_points() {
        for vocabulary in VOCABULARIES {
            for term in vocabulary.terms {
                assert_eq!(
                    standardize_demographic(vocabulary.field, term.canonical).as_deref(),
                    Some(term.canonical),
                    "{} / {}",
                    vocabulary.field,
                    term.canonical
                );
            }
        }
    }

    #[test]
    fn blank_values_are_dropped() {
        assert_eq!(standardize_demographic("researchArea", "   "), None);
    }
}
