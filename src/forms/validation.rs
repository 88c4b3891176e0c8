//! Field Validation
//!
//! Produces a per-field report. Screens show a single aggregate message but
//! the report keeps every violation so callers can inspect them individually.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use super::{FieldKind, FormValues};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+\.[^\s]+$").expect("valid url regex"));

/// Report key used for the résumé requirement.
pub const RESUME_KEY: &str = "resume";

pub const MSG_FILL_ALL: &str = "Please fill all fields before submitting!";
pub const MSG_UPLOAD_RESUME: &str = "Please upload your resume!";

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Missing,
    NotANumber,
    NotAWholeNumber,
    OutOfRange { min: f64, max: f64 },
    InvalidEmail,
    InvalidUrl,
    MissingResume,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "is required"),
            Self::NotANumber => write!(f, "must be a number"),
            Self::NotAWholeNumber => write!(f, "must be a whole number"),
            Self::OutOfRange { min, max } => write!(f, "must be between {} and {}", min, max),
            Self::InvalidEmail => write!(f, "must be a valid email address"),
            Self::InvalidUrl => write!(f, "must be an http(s) URL"),
            Self::MissingResume => write!(f, "must be uploaded"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    violations: BTreeMap<&'static str, (&'static str, Violation)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.violations.get(field).map(|(_, v)| v)
    }

    pub fn insert(&mut self, field: &'static str, label: &'static str, violation: Violation) {
        self.violations.insert(field, (label, violation));
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.keys().copied()
    }

    /// One message for the whole form. Missing fields win over a missing
    /// résumé, which wins over format problems.
    pub fn summary(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        let any = |wanted: &Violation| self.violations.values().any(|(_, v)| v == wanted);
        if any(&Violation::Missing) {
            return Some(MSG_FILL_ALL.to_string());
        }
        if any(&Violation::MissingResume) {
            return Some(MSG_UPLOAD_RESUME.to_string());
        }
        self.violations
            .values()
            .next()
            .map(|(label, violation)| format!("{} {}", label, violation))
    }
}

pub fn validate(values: &FormValues) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (spec, raw) in values.iter() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            report.insert(spec.name, spec.label, Violation::Missing);
            continue;
        }

        let outcome = match spec.kind {
            FieldKind::Text | FieldKind::Password => Ok(()),
            FieldKind::Email => check_email(trimmed),
            FieldKind::Url => check_url(trimmed),
            FieldKind::Integer { min, max } => parse_integer(trimmed, min, max).map(|_| ()),
            FieldKind::Decimal { min, max } => parse_decimal(trimmed, min, max).map(|_| ()),
        };

        if let Err(violation) = outcome {
            report.insert(spec.name, spec.label, violation);
        }
    }

    report
}

fn check_email(value: &str) -> Result<(), Violation> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(Violation::InvalidEmail)
    }
}

fn check_url(value: &str) -> Result<(), Violation> {
    if URL_RE.is_match(value) {
        Ok(())
    } else {
        Err(Violation::InvalidUrl)
    }
}

/// Parse a whole number. Accepts forms like "2024" and "2024.0".
pub fn parse_integer(raw: &str, min: i64, max: i64) -> Result<i64, Violation> {
    let number: f64 = raw.trim().parse().map_err(|_| Violation::NotANumber)?;
    if !number.is_finite() {
        return Err(Violation::NotANumber);
    }
    if number.fract() != 0.0 {
        return Err(Violation::NotAWholeNumber);
    }
    if number < min as f64 || number > max as f64 {
        return Err(Violation::OutOfRange {
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(number as i64)
}

/// Parse a finite decimal. "NaN" and "inf" are rejected.
pub fn parse_decimal(raw: &str, min: f64, max: f64) -> Result<f64, Violation> {
    let number: f64 = raw.trim().parse().map_err(|_| Violation::NotANumber)?;
    if !number.is_finite() {
        return Err(Violation::NotANumber);
    }
    if number < min || number > max {
        return Err(Violation::OutOfRange { min, max });
    }
    Ok(number)
}
