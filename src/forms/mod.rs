//! Form State
//!
//! Per-screen form storage: declared fields, their current string values,
//! structured validation, and the submission-in-flight guard.

pub mod resume;
pub mod validation;

pub use resume::{ResumeError, ResumeRef, ACCEPTED_RESUME_EXTENSIONS};
pub use validation::{ValidationReport, Violation};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown form field: {0}")]
    UnknownField(String),
}

/// How a field's raw text is interpreted when validated or submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Url,
    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },
    /// Finite decimal within an inclusive range
    Decimal { min: f64, max: f64 },
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer { .. } | Self::Decimal { .. })
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Password)
    }
}

/// Static description of one form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Wire name, also the key in validation reports
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }
}

/// Field values for one screen, in declaration order.
#[derive(Debug, Clone)]
pub struct FormValues {
    specs: &'static [FieldSpec],
    values: Vec<String>,
}

impl FormValues {
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            specs,
            values: vec![String::new(); specs.len()],
        }
    }

    pub fn specs(&self) -> &'static [FieldSpec] {
        self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.name == name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        self.values[idx] = value.into();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|idx| self.values[idx].as_str())
    }

    pub fn value_at(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).map(String::as_str)
    }

    /// Append a typed character to the field at `idx`.
    pub fn push_char(&mut self, idx: usize, c: char) {
        if let Some(value) = self.values.get_mut(idx) {
            value.push(c);
        }
    }

    /// Append pasted text to the field at `idx`.
    pub fn push_str(&mut self, idx: usize, s: &str) {
        if let Some(value) = self.values.get_mut(idx) {
            value.push_str(s);
        }
    }

    /// Remove the last character of the field at `idx`.
    pub fn pop_char(&mut self, idx: usize) {
        if let Some(value) = self.values.get_mut(idx) {
            value.pop();
        }
    }

    /// Clear every value.
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(String::clear);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldSpec, &str)> {
        self.specs.iter().zip(self.values.iter().map(String::as_str))
    }

    pub fn validate(&self) -> ValidationReport {
        validation::validate(self)
    }
}

/// The only concurrency guard: one outstanding request per form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InFlight(bool);

impl InFlight {
    /// Claim the slot. Returns false if a request is already outstanding.
    pub fn try_begin(&mut self) -> bool {
        if self.0 {
            return false;
        }
        self.0 = true;
        true
    }

    pub fn finish(&mut self) {
        self.0 = false;
    }

    pub fn is_active(&self) -> bool {
        self.0
    }
}
