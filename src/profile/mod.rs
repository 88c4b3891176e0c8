//! Student Profile Wizard
//!
//! Four-step profile form: field values, the step controller, the résumé
//! selection and the submission gate. The gate is the only place validation
//! runs; moving between steps never checks anything.

pub mod fields;
pub mod import;
pub mod payload;
pub mod wizard;

pub use fields::{PROFILE_FIELDS, ProfileStep};
pub use import::{load_profile_file, parse_profile};
pub use payload::{SubmissionPayload, validate_profile};
pub use wizard::WizardController;

use std::time::Duration;

use crate::api::{ApiError, PlacementBackend};
use crate::forms::{FormValues, InFlight, ResumeError, ResumeRef, ValidationReport};
use crate::navigation::{Notice, Outcome, Route};
use crate::session::Session;

pub const MSG_PROFILE_DONE: &str = "Profile Completed Successfully";
pub const MSG_PROFILE_FAILED: &str = "Error submitting profile";
pub const MSG_LOGIN_FIRST: &str = "Please log in before submitting your profile";

/// Why a submit click did not produce a request
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRejection {
    /// A request is already outstanding; the click is ignored.
    InFlight,
    Invalid(ValidationReport),
    NotAuthenticated,
}

impl SubmitRejection {
    /// Notice to show, if any. Repeated clicks are silently dropped.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::InFlight => None,
            Self::Invalid(report) => report.summary().map(Notice::error),
            Self::NotAuthenticated => Some(Notice::error(MSG_LOGIN_FIRST)),
        }
    }
}

/// Everything needed to issue the profile request
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub token: String,
    pub payload: SubmissionPayload,
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub wizard: WizardController,
    pub values: FormValues,
    resume: Option<ResumeRef>,
    in_flight: InFlight,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileForm {
    pub fn new() -> Self {
        Self {
            wizard: WizardController::default(),
            values: FormValues::new(PROFILE_FIELDS),
            resume: None,
            in_flight: InFlight::default(),
        }
    }

    /// Back to a blank form on step one.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn current_step(&self) -> Option<ProfileStep> {
        self.wizard.current_step()
    }

    pub fn resume(&self) -> Option<&ResumeRef> {
        self.resume.as_ref()
    }

    pub fn select_resume(&mut self, input: &str) -> Result<&ResumeRef, ResumeError> {
        let resume = ResumeRef::from_path(input)?;
        Ok(self.resume.insert(resume))
    }

    /// Attach already-inspected résumé metadata.
    pub fn set_resume(&mut self, resume: ResumeRef) {
        self.resume = Some(resume);
    }

    pub fn clear_resume(&mut self) {
        self.resume = None;
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn validate(&self) -> ValidationReport {
        validate_profile(&self.values, self.resume.as_ref())
    }

    /// The submission gate. On success the form is marked in flight and the
    /// caller must issue exactly one request and then call [`Self::complete`].
    pub fn begin_submit(&mut self, token: Option<&str>) -> Result<SubmitRequest, SubmitRejection> {
        if self.in_flight.is_active() {
            tracing::debug!("Profile submit ignored: request already in flight");
            return Err(SubmitRejection::InFlight);
        }

        let payload = SubmissionPayload::build(&self.values, self.resume.as_ref())
            .map_err(SubmitRejection::Invalid)?;

        let token = match token {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Err(SubmitRejection::NotAuthenticated),
        };

        self.in_flight.try_begin();
        Ok(SubmitRequest { token, payload })
    }

    /// Apply the backend's answer and clear the in-flight flag.
    pub fn complete(&mut self, result: &Result<(), ApiError>) -> Outcome {
        self.in_flight.finish();
        match result {
            Ok(()) => {
                tracing::info!("Profile submitted");
                Outcome::succeeded(MSG_PROFILE_DONE, Route::Dashboard, Duration::ZERO)
            }
            Err(e) => {
                tracing::error!(code = e.code().as_str(), "Profile submission failed: {}", e);
                Outcome::failed(MSG_PROFILE_FAILED)
            }
        }
    }

    /// Gate, send and complete in one go (used outside the interactive UI).
    pub async fn submit(
        &mut self,
        backend: &dyn PlacementBackend,
        session: &Session,
    ) -> Result<Outcome, SubmitRejection> {
        let request = self.begin_submit(session.token())?;
        let result = backend
            .submit_profile(&request.token, &request.payload)
            .await;
        Ok(self.complete(&result))
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use crate::forms::FormValues;

    pub fn filled_values() -> FormValues {
        let mut values = FormValues::new(PROFILE_FIELDS);
        for (name, value) in [
            ("first_name", "Asha"),
            ("last_name", "Rao"),
            ("roll_no", "CS21B042"),
            ("department_id", "CSE"),
            ("graduation_year", "2024"),
            ("cgpa", "8.7"),
            ("tenth_percentage", "91.2"),
            ("twelfth_percentage", "88"),
            ("active_backlogs", "0"),
            ("total_backlogs", "1"),
            ("linkedin_url", "https://linkedin.com/in/asharao"),
            ("github_url", "https://github.com/asharao"),
            ("portfolio_url", "https://asharao.dev"),
        ] {
            values.set(name, value).unwrap_or_default();
        }
        values
    }

    pub fn sample_resume() -> ResumeRef {
        ResumeRef {
            path: std::path::PathBuf::from("/tmp/asha_rao.pdf"),
            file_name: "asha_rao.pdf".to_string(),
            size_bytes: 1024,
        }
    }

    pub fn sample_payload() -> SubmissionPayload {
        SubmissionPayload::build(&filled_values(), Some(&sample_resume()))
            .unwrap_or_else(|report| panic!("sample payload invalid: {:?}", report))
    }

    /// A complete form with a résumé attached, ready to submit.
    pub fn ready_form() -> ProfileForm {
        let mut form = ProfileForm::new();
        form.values = filled_values();
        form.set_resume(sample_resume());
        form
    }
}
