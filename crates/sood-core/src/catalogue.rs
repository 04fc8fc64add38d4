//! The hand-curated field catalogue: every semantic field the harmonized
//! schema knows about, grouped by category, with the header spellings observed
//! for it across survey years.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Demographics,
    Attitudes,
    Motivations,
    Barriers,
    FairAwareness,
    InstitutionalSupport,
}

/// How absent values of a category are treated by the harmonizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImputationPolicy {
    Preserve,
    Median,
    Mode,
}

/// The value shape every field of a category must have once harmonized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Likert,
    Boolean,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Demographics,
        Category::Attitudes,
        Category::Motivations,
        Category::Barriers,
        Category::FairAwareness,
        Category::InstitutionalSupport,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Demographics => "demographics",
            Category::Attitudes => "attitudes",
            Category::Motivations => "motivations",
            Category::Barriers => "barriers",
            Category::FairAwareness => "fairAwareness",
            Category::InstitutionalSupport => "institutionalSupport",
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            Category::Demographics => ValueKind::Text,
            Category::InstitutionalSupport => ValueKind::Boolean,
            Category::Attitudes
            | Category::Motivations
            | Category::Barriers
            | Category::FairAwareness => ValueKind::Likert,
        }
    }

    pub fn imputation_policy(&self) -> ImputationPolicy {
        match self {
            Category::Demographics | Category::FairAwareness => ImputationPolicy::Preserve,
            Category::Attitudes | Category::Motivations | Category::Barriers => {
                ImputationPolicy::Median
            }
            Category::InstitutionalSupport => ImputationPolicy::Mode,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        CATALOGUE.iter().filter(move |spec| spec.category == *self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Likert,
    MultipleChoice,
    Boolean,
    Numeric,
    Text,
}

#[derive(Debug)]
pub struct FieldSpec {
    pub id: &'static str,
    pub category: Category,
    pub question: &'static str,
    pub response_type: ResponseType,
    /// Question codes used by a specific year's export, e.g. `(2022, "Q2.11_2")`.
    pub year_headers: &'static [(i32, &'static str)],
    /// Year-agnostic spellings, tried in order after the year-specific codes.
    pub synonyms: &'static [&'static str],
    /// Answer labels. Ordinal scales run from the lowest to the highest point;
    /// other question types list their options as asked.
    pub response_scale: &'static [&'static str],
    /// Label of this field's option when a year asked it as one column per
    /// option of a multi-select question (`Q2.3_*`).
    pub selection_option: Option<&'static str>,
    pub notes: Option<&'static str>,
}

impl FieldSpec {
    /// `category.field`, the column name used in exports and statistics.
    pub fn semantic_id(&self) -> String {
        format!("{}.{}", self.category.key(), self.id)
    }

    /// The response scale when it can be read as evenly spaced scale points.
    pub fn ordinal_scale(&self) -> &'static [&'static str] {
        match self.response_type {
            ResponseType::Likert => self.response_scale,
            _ => &[],
        }
    }
}

pub const AGREEMENT_5: &[&str] = &[
    "Strongly disagree",
    "Somewhat disagree",
    "Neutral",
    "Somewhat agree",
    "Strongly agree",
];
pub const AGREEMENT_5_ALT: &[&str] = &[
    "Strongly disagree",
    "Somewhat disagree",
    "Neutral / No opinion",
    "Somewhat agree",
    "Strongly agree",
];
pub const SUPPORT_5: &[&str] = &[
    "Strongly oppose",
    "Somewhat oppose",
    "Neutral",
    "Somewhat support",
    "Strongly support",
];
pub const YES_NO_DONT_KNOW: &[&str] = &["No", "Don't know", "Yes"];
pub const YES_NO_UNSURE: &[&str] = &["No", "Unsure", "Yes"];
pub const YES_NO: &[&str] = &["Yes", "No"];
pub const IMPORTANCE_5: &[&str] = &[
    "Not at all important",
    "Slightly important",
    "Moderately important",
    "Very important",
    "Extremely important",
];
pub const EFFORT_4: &[&str] = &["No effort", "Little effort", "Some effort", "A lot of effort"];
pub const BARRIER_5: &[&str] = &[
    "Not a barrier",
    "Minor barrier",
    "Moderate barrier",
    "Significant barrier",
    "Major barrier",
];
pub const CREDIT_3: &[&str] = &["No, too little credit", "Yes", "No, too much credit"];
pub const FAMILIARITY_3: &[&str] = &[
    "I am familiar with the data principles",
    "I have previously heard of the data principles but I am not familiar with them",
    "I have never heard of the data principles before now",
];
pub const FAMILIARITY_5: &[&str] = &[
    "Not at all familiar",
    "Slightly familiar",
    "Somewhat familiar",
    "Moderately familiar",
    "Extremely familiar",
];
pub const MOTIVATION_OPTIONS_2017: &[&str] = &[
    "Institution requirement",
    "Funder requirement",
    "Transparency",
    "Credit",
    "Other",
];

/// `(canonical, variant)` pairs of scales that differ only in wording.
pub const SCALE_VARIANTS: &[(&[&str], &[&str])] = &[
    (AGREEMENT_5, AGREEMENT_5_ALT),
    (YES_NO_DONT_KNOW, YES_NO_UNSURE),
];

/// Maps `response` from `source_scale` onto the label at the same position in
/// `target_scale`. Anything not on the source scale is returned unchanged.
pub fn harmonize_response_scale(response: &str, source_scale: &[&str], target_scale: &[&str]) -> String {
    let trimmed = response.trim();
    source_scale
        .iter()
        .position(|label| label.eq_ignore_ascii_case(trimmed))
        .and_then(|idx| target_scale.get(idx))
        .map(|label| label.to_string())
        .unwrap_or_else(|| response.to_string())
}

pub fn field(category: Category, id: &str) -> Option<&'static FieldSpec> {
    CATALOGUE
        .iter()
        .find(|spec| spec.category == category && spec.id == id)
}

pub fn total_field_count() -> usize {
    CATALOGUE.len()
}

use Category::{Attitudes, Barriers, Demographics, FairAwareness, InstitutionalSupport, Motivations};

pub static CATALOGUE: &[FieldSpec] = &[
    // --- demographics ---
    FieldSpec {
        id: "jobTitle",
        category: Demographics,
        question: "Which of the following job titles best applies to you?",
        response_type: ResponseType::MultipleChoice,
        year_headers: &[
            (2017, "Q10.5"),
            (2019, "Q6.5"),
            (2022, "Q2.6"),
            (2023, "Q2.6"),
            (2024, "Q7"),
        ],
        synonyms: &["Job title", "Job Title", "JobTitle", "Position", "Role"],
        response_scale: &["Professor", "Associate Professor", "Research Scientist", "PhD Student", "Postdoc", "Other"],
        selection_option: None,
        notes: Some("Response categories vary by year but can be harmonized"),
    },
    FieldSpec {
        id: "researchArea",
        category: Demographics,
        question: "Which of the following best describes your primary area of interest?",
        response_type: ResponseType::MultipleChoice,
        year_headers: &[(2021, "Q2.4"), (2022, "Q2.7"), (2023, "Q2.7"), (2024, "Q8")],
        synonyms: &[
            "Research area",
            "Primary area of interest",
            "Subject area",
            "Discipline",
            "Field of research",
        ],
        response_scale: &["Medicine", "Engineering", "Physics", "Biology", "Other"],
        selection_option: None,
        notes: Some("Consistent categories with some variation"),
    },
    FieldSpec {
        id: "organizationType",
        category: Demographics,
        question: "Which type of organisation do you work in?",
        response_type: ResponseType::MultipleChoice,
        year_headers: &[(2022, "Q2.4"), (2023, "Q2.4"), (2024, "Q5")],
        synonyms: &["Organisation type", "Organization type", "Institution type"],
        response_scale: &["University", "Research institution", "Medical school", "Private company", "Other"],
        selection_option: None,
        notes: Some("Institutional context indicator"),
    },
    FieldSpec {
        id: "publicationHistory",
        category: Demographics,
        question: "When was the last occasion that you published or submitted a manuscript to a journal?",
        response_type: ResponseType::MultipleChoice,
        year_headers: &[(2021, "Q2.1"), (2022, "Q2.3"), (2023, "Q2.1"), (2024, "Q4")],
        synonyms: &["Last publication", "Publication history"],
        response_scale: &[
            "Within the last year",
            "1-2 years ago",
            "3-5 years ago",
            "More than 5 years ago",
            "Never",
        ],
        selection_option: None,
        notes: Some("Indicator of research activity level"),
    },
    FieldSpec {
        id: "country",
        category: Demographics,
        question: "In which country do you currently work?",
        response_type: ResponseType::Text,
        year_headers: &[],
        synonyms: &["Country", "Country of residence", "Location"],
        response_scale: &[],
        selection_option: None,
        notes: None,
    },
    // --- attitudes ---
    FieldSpec {
        id: "openAccess",
        category: Attitudes,
        question: "Making research articles open access should be common scholarly practice",
        response_type: ResponseType::Likert,
        year_headers: &[
            (2021, "Q2.7_1"),
            (2022, "Q2.11_1"),
            (2023, "Q2.10.a"),
            (2024, "Q12_1"),
        ],
        synonyms: &["Open access attitude", "Attitude - Open access"],
        response_scale: AGREEMENT_5,
        selection_option: None,
        notes: Some("Highest consistency across years - core trend indicator"),
    },
    FieldSpec {
        id: "openData",
        category: Attitudes,
        question: "Making research data openly available should be common scholarly practice",
        response_type: ResponseType::Likert,
        year_headers: &[
            (2021, "Q2.7_2"),
            (2022, "Q2.11_2"),
            (2023, "Q2.10.b"),
            (2024, "Q12_2"),
        ],
        synonyms: &["Open data attitude", "Attitude - Open data"],
        response_scale: AGREEMENT_5,
        selection_option: None,
        notes: Some("Core data sharing attitude - primary outcome measure"),
    },
    FieldSpec {
        id: "openPeerReview",
        category: Attitudes,
        question: "Making peer review open should be common scholarly practice",
        response_type: ResponseType::Likert,
        year_headers: &[(2022, "Q2.11_3"), (2023, "Q2.10.c"), (2024, "Q12_3")],
        synonyms: &["Open peer review attitude", "Attitude - Open peer review"],
        response_scale: AGREEMENT_5,
        selection_option: None,
        notes: Some("Introduced in 2022"),
    },
    FieldSpec {
        id: "preprinting",
        category: Attitudes,
        question: "Preprinting should be common scholarly practice",
        response_type: ResponseType::Likert,
        year_headers: &[(2022, "Q2.11_4"), (2023, "Q2.10.d"), (2024, "Q12_4")],
        synonyms: &["Preprinting attitude", "Attitude - Preprinting"],
        response_scale: AGREEMENT_5,
        selection_option: None,
        notes: Some("Introduced in 2022 - tracks preprint adoption attitudes"),
    },
    FieldSpec {
        id: "nationalMandate",
        category: Attitudes,
        question: "How supportive would you be of a national mandate for making primary research data openly available?",
        response_type: ResponseType::Likert,
        year_headers: &[(2019, "Q2.3")],
        synonyms: &["National mandate support", "Support for a national mandate"],
        response_scale: SUPPORT_5,
        selection_option: None,
        notes: Some("Policy attitude indicator"),
    },
    FieldSpec {
        id: "funderMandate",
        category: Attitudes,
        question: "Should funders make the sharing of research data part of their requirements for awarding grants?",
        response_type: ResponseType::Likert,
        year_headers: &[(2019, "Q2.2")],
        synonyms: &["Funder mandate support", "Support for funder data mandates"],
        response_scale: YES_NO_DONT_KNOW,
        selection_option: None,
        notes: Some("Policy question asked on a three-point scale in 2019"),
    },
    // --- motivations ---
    FieldSpec {
        id: "funderRequirement",
        category: Motivations,
        question: "How important is a funder requirement in motivating you to share your data?",
        response_type: ResponseType::Likert,
        year_headers: &[(2017, "Q2.3_*")],
        synonyms: &["Motivation - Funder requirement", "Funder requirement"],
        response_scale: IMPORTANCE_5,
        selection_option: Some("Funder requirement"),
        notes: None,
    },
    FieldSpec {
        id: "institutionRequirement",
        category: Motivations,
        question: "How important is an institutional requirement in motivating you to share your data?",
        response_type: ResponseType::Likert,
        year_headers: &[(2017, "Q2.3_*")],
        synonyms: &["Motivation - Institution requirement", "Institution requirement"],
        response_scale: IMPORTANCE_5,
        selection_option: Some("Institution requirement"),
        notes: None,
    },
    FieldSpec {
        id: "journalRequirement",
        category: Motivations,
        question: "How important is a journal or publisher requirement in motivating you to share your data?",
        response_type: ResponseType::Likert,
        year_headers: &[],
        synonyms: &["Motivation - Journal requirement", "Journal requirement"],
        response_scale: IMPORTANCE_5,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "increasedCitations",
        category: Motivations,
        question: "How important is increased citation of your research in motivating you to share your data?",
        response_type: ResponseType::Likert,
        year_headers: &[(2017, "Q2.3_*")],
        synonyms: &["Motivation - Increased citations", "Increased citations", "Credit"],
        response_scale: IMPORTANCE_5,
        selection_option: Some("Credit"),
        notes: None,
    },
    FieldSpec {
        id: "transparency",
        category: Motivations,
        question: "How important is transparency and reuse in motivating you to share your data?",
        response_type: ResponseType::Likert,
        year_headers: &[(2017, "Q2.3_*")],
        synonyms: &["Motivation - Transparency", "Transparency", "Public benefit"],
        response_scale: IMPORTANCE_5,
        selection_option: Some("Transparency"),
        notes: None,
    },
    // --- barriers ---
    FieldSpec {
        id: "effortRequired",
        category: Barriers,
        question: "How much effort is typically required to make your data re-usable by others?",
        response_type: ResponseType::Likert,
        year_headers: &[(2017, "Q2.5")],
        synonyms: &["Effort required", "Barrier - Effort"],
        response_scale: EFFORT_4,
        selection_option: None,
        notes: Some("Barrier assessment - effort required"),
    },
    FieldSpec {
        id: "lackOfTime",
        category: Barriers,
        question: "How much of a barrier is lack of time to sharing your data?",
        response_type: ResponseType::Likert,
        year_headers: &[],
        synonyms: &["Barrier - Lack of time", "Lack of time", "Time constraints"],
        response_scale: BARRIER_5,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "misuseConcerns",
        category: Barriers,
        question: "How much of a barrier are concerns about misuse of your data?",
        response_type: ResponseType::Likert,
        year_headers: &[],
        synonyms: &["Barrier - Concerns about misuse", "Concerns about misuse", "Misuse concerns"],
        response_scale: BARRIER_5,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "licensingUncertainty",
        category: Barriers,
        question: "How much of a barrier is uncertainty about copyright and licensing?",
        response_type: ResponseType::Likert,
        year_headers: &[],
        synonyms: &[
            "Barrier - Unsure about copyright and licensing",
            "Copyright and licensing",
            "Licensing uncertainty",
        ],
        response_scale: BARRIER_5,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "lackOfCredit",
        category: Barriers,
        question: "Do you think researchers currently get sufficient credit for sharing data?",
        response_type: ResponseType::MultipleChoice,
        year_headers: &[(2019, "Q2.4"), (2022, "Q3.2")],
        synonyms: &["Credit for sharing", "Barrier - Lack of credit"],
        response_scale: CREDIT_3,
        selection_option: None,
        notes: Some("Important motivational factor"),
    },
    // --- FAIR awareness ---
    FieldSpec {
        id: "fairPrinciples",
        category: FairAwareness,
        question: "How familiar are you with FAIR data principles (Findable, Accessible, Interoperable, Reusable)?",
        response_type: ResponseType::MultipleChoice,
        year_headers: &[(2022, "Q3.1_1"), (2023, "Q2.11.a")],
        synonyms: &["FAIR awareness", "Familiarity with FAIR principles"],
        response_scale: FAMILIARITY_3,
        selection_option: None,
        notes: Some("Key knowledge indicator for data management"),
    },
    FieldSpec {
        id: "carePrinciples",
        category: FairAwareness,
        question: "How familiar are you with CARE principles for Indigenous Data Governance?",
        response_type: ResponseType::MultipleChoice,
        year_headers: &[(2022, "Q3.1_2")],
        synonyms: &["CARE awareness", "Familiarity with CARE principles"],
        response_scale: FAMILIARITY_3,
        selection_option: None,
        notes: Some("Ethical data governance awareness"),
    },
    FieldSpec {
        id: "persistentIdentifiers",
        category: FairAwareness,
        question: "How familiar are you with persistent identifiers such as DOIs?",
        response_type: ResponseType::Likert,
        year_headers: &[],
        synonyms: &["Familiarity with persistent identifiers", "PID awareness"],
        response_scale: FAMILIARITY_5,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "metadataStandards",
        category: FairAwareness,
        question: "How familiar are you with metadata standards in your field?",
        response_type: ResponseType::Likert,
        year_headers: &[],
        synonyms: &["Familiarity with metadata standards", "Metadata standards awareness"],
        response_scale: FAMILIARITY_5,
        selection_option: None,
        notes: None,
    },
    // --- institutional support ---
    FieldSpec {
        id: "policyExists",
        category: InstitutionalSupport,
        question: "Does your institution have a data sharing policy?",
        response_type: ResponseType::Boolean,
        year_headers: &[],
        synonyms: &["Institutional data policy", "Policy exists", "Data policy"],
        response_scale: YES_NO,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "repositoryAvailable",
        category: InstitutionalSupport,
        question: "Does your institution provide a data repository?",
        response_type: ResponseType::Boolean,
        year_headers: &[],
        synonyms: &["Institutional repository", "Repository available"],
        response_scale: YES_NO,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "trainingProvided",
        category: InstitutionalSupport,
        question: "Have you received training on research data management?",
        response_type: ResponseType::Boolean,
        year_headers: &[],
        synonyms: &["Data management training", "Training provided"],
        response_scale: YES_NO,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "fundingAvailable",
        category: InstitutionalSupport,
        question: "Is funding available to cover the costs of sharing your data?",
        response_type: ResponseType::Boolean,
        year_headers: &[],
        synonyms: &["Funding for data sharing", "Funding available"],
        response_scale: YES_NO,
        selection_option: None,
        notes: None,
    },
    FieldSpec {
        id: "dataStewardSupport",
        category: InstitutionalSupport,
        question: "Does your institution provide data steward support?",
        response_type: ResponseType::Boolean,
        year_headers: &[],
        synonyms: &["Data steward support", "Research data support"],
        response_scale: YES_NO,
        selection_option: None,
        notes: None,
    },
];
