//! Student profile field declarations, grouped by wizard step.

use crate::forms::{FieldKind, FieldSpec};

const YEAR: FieldKind = FieldKind::Integer { min: 1950, max: 2100 };
const COUNT: FieldKind = FieldKind::Integer { min: 0, max: 100 };
const CGPA: FieldKind = FieldKind::Decimal { min: 0.0, max: 10.0 };
const PERCENT: FieldKind = FieldKind::Decimal { min: 0.0, max: 100.0 };

/// Every profile field, in wizard order. All are required.
pub const PROFILE_FIELDS: &[FieldSpec] = &[
    // Basic Info
    FieldSpec::new("first_name", "First Name", FieldKind::Text),
    FieldSpec::new("last_name", "Last Name", FieldKind::Text),
    FieldSpec::new("roll_no", "Roll Number", FieldKind::Text),
    FieldSpec::new("department_id", "Department ID", FieldKind::Text),
    FieldSpec::new("graduation_year", "Graduation Year", YEAR),
    // Academic
    FieldSpec::new("cgpa", "CGPA", CGPA),
    FieldSpec::new("tenth_percentage", "10th Percentage", PERCENT),
    FieldSpec::new("twelfth_percentage", "12th Percentage", PERCENT),
    // Backlogs
    FieldSpec::new("active_backlogs", "Active Backlogs", COUNT),
    FieldSpec::new("total_backlogs", "Total Backlogs", COUNT),
    // Resume & Links
    FieldSpec::new("linkedin_url", "LinkedIn URL", FieldKind::Url),
    FieldSpec::new("github_url", "GitHub URL", FieldKind::Url),
    FieldSpec::new("portfolio_url", "Portfolio URL", FieldKind::Url),
];

/// Wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileStep {
    BasicInfo,
    Academic,
    Backlogs,
    ResumeLinks,
}

impl ProfileStep {
    pub const ALL: [ProfileStep; 4] = [
        Self::BasicInfo,
        Self::Academic,
        Self::Backlogs,
        Self::ResumeLinks,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Self::BasicInfo => 0,
            Self::Academic => 1,
            Self::Backlogs => 2,
            Self::ResumeLinks => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Academic => "Academic",
            Self::Backlogs => "Backlogs",
            Self::ResumeLinks => "Resume & Links",
        }
    }

    /// Range of `PROFILE_FIELDS` shown on this step
    pub fn field_range(&self) -> std::ops::Range<usize> {
        match self {
            Self::BasicInfo => 0..5,
            Self::Academic => 5..8,
            Self::Backlogs => 8..10,
            Self::ResumeLinks => 10..13,
        }
    }

    /// Whether the résumé picker lives on this step
    pub fn has_resume(&self) -> bool {
        matches!(self, Self::ResumeLinks)
    }
}
