//! Submission payload: the read-only shape the backend expects, built once at
//! final submit from the form's string values.

use serde::Serialize;

use crate::forms::validation::{self, RESUME_KEY};
use crate::forms::{FieldKind, FormValues, ResumeRef, ValidationReport, Violation};

/// Status flag the profile endpoint expects on a completed profile.
pub const PLACEMENT_STATUS: &str = "placed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub first_name: String,
    pub last_name: String,
    pub roll_no: String,
    pub department_id: String,
    pub graduation_year: i64,
    pub cgpa: f64,
    pub active_backlogs: i64,
    pub total_backlogs: i64,
    pub tenth_percentage: f64,
    pub twelfth_percentage: f64,
    pub linkedin_url: String,
    pub github_url: String,
    pub portfolio_url: String,
    pub resume_url: String,
    pub placement_status: String,
    pub is_profile_complete: bool,
}

/// Full gate check: every declared field plus the résumé.
pub fn validate_profile(values: &FormValues, resume: Option<&ResumeRef>) -> ValidationReport {
    let mut report = values.validate();
    if resume.is_none() {
        report.insert(RESUME_KEY, "Resume", Violation::MissingResume);
    }
    report
}

impl SubmissionPayload {
    /// Validate and coerce. Numeric fields become JSON numbers here, never at
    /// input time; input that would coerce to NaN is rejected instead.
    pub fn build(
        values: &FormValues,
        resume: Option<&ResumeRef>,
    ) -> Result<Self, ValidationReport> {
        let report = validate_profile(values, resume);
        if !report.is_valid() {
            return Err(report);
        }

        let mut coercer = Coercer {
            values,
            report: ValidationReport::default(),
        };

        let payload = Self {
            first_name: coercer.text("first_name"),
            last_name: coercer.text("last_name"),
            roll_no: coercer.text("roll_no"),
            department_id: coercer.text("department_id"),
            graduation_year: coercer.integer("graduation_year"),
            cgpa: coercer.decimal("cgpa"),
            active_backlogs: coercer.integer("active_backlogs"),
            total_backlogs: coercer.integer("total_backlogs"),
            tenth_percentage: coercer.decimal("tenth_percentage"),
            twelfth_percentage: coercer.decimal("twelfth_percentage"),
            linkedin_url: coercer.text("linkedin_url"),
            github_url: coercer.text("github_url"),
            portfolio_url: coercer.text("portfolio_url"),
            resume_url: resume.map(|r| r.file_name.clone()).unwrap_or_default(),
            placement_status: PLACEMENT_STATUS.to_string(),
            is_profile_complete: true,
        };

        if coercer.report.is_valid() {
            Ok(payload)
        } else {
            Err(coercer.report)
        }
    }
}

/// Pulls typed values out of a form, recording anything that does not fit.
struct Coercer<'a> {
    values: &'a FormValues,
    report: ValidationReport,
}

impl Coercer<'_> {
    fn raw(&mut self, name: &'static str) -> Option<(&'static str, FieldKind, String)> {
        let values = self.values;
        let spec = values.index_of(name).and_then(|i| values.specs().get(i));
        match (spec, values.get(name)) {
            (Some(spec), Some(value)) => Some((spec.label, spec.kind, value.trim().to_string())),
            _ => {
                self.report.insert(name, name, Violation::Missing);
                None
            }
        }
    }

    fn text(&mut self, name: &'static str) -> String {
        self.raw(name).map(|(_, _, value)| value).unwrap_or_default()
    }

    fn integer(&mut self, name: &'static str) -> i64 {
        let Some((label, kind, value)) = self.raw(name) else {
            return 0;
        };
        let (min, max) = match kind {
            FieldKind::Integer { min, max } => (min, max),
            _ => (i64::MIN, i64::MAX),
        };
        match validation::parse_integer(&value, min, max) {
            Ok(n) => n,
            Err(violation) => {
                self.report.insert(name, label, violation);
                0
            }
        }
    }

    fn decimal(&mut self, name: &'static str) -> f64 {
        let Some((label, kind, value)) = self.raw(name) else {
            return 0.0;
        };
        let (min, max) = match kind {
            FieldKind::Decimal { min, max } => (min, max),
            _ => (f64::MIN, f64::MAX),
        };
        match validation::parse_decimal(&value, min, max) {
            Ok(n) => n,
            Err(violation) => {
                self.report.insert(name, label, violation);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tests_support::{filled_values, sample_resume};

    #[test]
    fn test_build_coerces_numbers() {
        let payload = SubmissionPayload::build(&filled_values(), Some(&sample_resume())).unwrap();
        assert_eq!(payload.graduation_year, 2024);
        assert_eq!(payload.cgpa, 8.7);
        assert_eq!(payload.active_backlogs, 0);
        assert_eq!(payload.total_backlogs, 1);
        assert_eq!(payload.tenth_percentage, 91.2);
        assert_eq!(payload.resume_url, "asha_rao.pdf");
        assert_eq!(payload.placement_status, "placed");
        assert!(payload.is_profile_complete);
    }

    #[test]
    fn test_graduation_year_serializes_as_number() {
        let payload = SubmissionPayload::build(&filled_values(), Some(&sample_resume())).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["graduation_year"], serde_json::json!(2024));
        assert!(json["graduation_year"].is_number());
        assert!(json["cgpa"].is_f64());
        assert_eq!(json["resume_url"], "asha_rao.pdf");
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut values = filled_values();
        values.set("first_name", "  Asha ").unwrap();
        let payload = SubmissionPayload::build(&values, Some(&sample_resume())).unwrap();
        assert_eq!(payload.first_name, "Asha");
    }

    #[test]
    fn test_nan_cgpa_is_rejected_not_passed_through() {
        let mut values = filled_values();
        values.set("cgpa", "abc").unwrap();
        let report = SubmissionPayload::build(&values, Some(&sample_resume())).unwrap_err();
        assert_eq!(report.get("cgpa"), Some(&Violation::NotANumber));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_missing_resume_rejected() {
        let report = SubmissionPayload::build(&filled_values(), None).unwrap_err();
        assert_eq!(report.get(RESUME_KEY), Some(&Violation::MissingResume));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_each_empty_field_rejected() {
        for spec in crate::profile::PROFILE_FIELDS {
            let mut values = filled_values();
            values.set(spec.name, "").unwrap();
            let report = SubmissionPayload::build(&values, Some(&sample_resume())).unwrap_err();
            assert_eq!(
                report.get(spec.name),
                Some(&Violation::Missing),
                "{} should be required",
                spec.name
            );
        }
    }
}
