//! Login and registration forms.
//!
//! Each form owns its field values, selected role and in-flight guard.
//! `begin_submit` produces the request to send; `complete` applies the
//! backend's answer and says where to go next.

use std::time::Duration;

use crate::api::{ApiError, LoginRequest, LoginResponse, PlacementBackend, RegisterRequest, Role};
use crate::forms::{FieldKind, FieldSpec, FormValues, InFlight, ValidationReport};
use crate::navigation::{Notice, Outcome, Route};
use crate::session::Session;

pub const MSG_LOGIN_OK: &str = "Login Successful";
pub const MSG_LOGIN_FAILED: &str = "Invalid email or password";
pub const MSG_REGISTER_OK: &str = "Registration Successful";
pub const MSG_REGISTER_FAILED: &str = "Registration Failed";

pub const LOGIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("email", "Email", FieldKind::Email),
    FieldSpec::new("password", "Password", FieldKind::Password),
];

pub const REGISTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("first_name", "First Name", FieldKind::Text),
    FieldSpec::new("last_name", "Last Name", FieldKind::Text),
    FieldSpec::new("email", "Email", FieldKind::Email),
    FieldSpec::new("password", "Password", FieldKind::Password),
];

/// Why a login or registration click did not produce a request
#[derive(Debug, Clone, PartialEq)]
pub enum AuthRejection {
    InFlight,
    Invalid(ValidationReport),
}

impl AuthRejection {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::InFlight => None,
            Self::Invalid(report) => report.summary().map(Notice::error),
        }
    }
}

fn value(values: &FormValues, name: &str) -> String {
    values.get(name).unwrap_or_default().trim().to_string()
}

fn checked(values: &FormValues, in_flight: &mut InFlight) -> Result<(), AuthRejection> {
    if in_flight.is_active() {
        tracing::debug!("Submit ignored: request already in flight");
        return Err(AuthRejection::InFlight);
    }
    let report = values.validate();
    if !report.is_valid() {
        return Err(AuthRejection::Invalid(report));
    }
    in_flight.try_begin();
    Ok(())
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub values: FormValues,
    /// Shown on the screen only; login does not send it.
    pub role: Role,
    in_flight: InFlight,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            values: FormValues::new(LOGIN_FIELDS),
            role: Role::default(),
            in_flight: InFlight::default(),
        }
    }

    pub fn with_credentials(email: &str, password: &str) -> Self {
        let mut form = Self::new();
        form.values.push_str(0, email);
        form.values.push_str(1, password);
        form
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn begin_submit(&mut self) -> Result<LoginRequest, AuthRejection> {
        checked(&self.values, &mut self.in_flight)?;
        Ok(LoginRequest {
            email: value(&self.values, "email"),
            // Passwords are sent as typed.
            password: self.values.get("password").unwrap_or_default().to_string(),
        })
    }

    /// Store the token (if the backend sent one) and schedule the dashboard.
    pub fn complete(
        &mut self,
        result: Result<LoginResponse, ApiError>,
        session: &mut Session,
        delay: Duration,
    ) -> Outcome {
        self.in_flight.finish();
        match result {
            Ok(response) => {
                match response.access_token.filter(|t| !t.is_empty()) {
                    Some(token) => {
                        if let Err(e) = session.set_token(token) {
                            tracing::warn!("Could not persist session: {}", e);
                        }
                    }
                    None => tracing::warn!("Login succeeded but no access_token was returned"),
                }
                self.values.reset();
                Outcome::succeeded(MSG_LOGIN_OK, Route::Dashboard, delay)
            }
            Err(e) => {
                tracing::warn!(code = e.code().as_str(), "Login failed: {}", e);
                Outcome::failed(e.message().unwrap_or(MSG_LOGIN_FAILED))
            }
        }
    }

    pub async fn submit(
        &mut self,
        backend: &dyn PlacementBackend,
        session: &mut Session,
        delay: Duration,
    ) -> Result<Outcome, AuthRejection> {
        let request = self.begin_submit()?;
        let result = backend.login(&request).await;
        Ok(self.complete(result, session, delay))
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub values: FormValues,
    pub role: Role,
    in_flight: InFlight,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            values: FormValues::new(REGISTER_FIELDS),
            role: Role::default(),
            in_flight: InFlight::default(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn begin_submit(&mut self) -> Result<RegisterRequest, AuthRejection> {
        checked(&self.values, &mut self.in_flight)?;
        Ok(RegisterRequest {
            first_name: value(&self.values, "first_name"),
            last_name: value(&self.values, "last_name"),
            email: value(&self.values, "email"),
            password: self.values.get("password").unwrap_or_default().to_string(),
            role: self.role,
        })
    }

    /// Students continue to their profile, admins to the login screen.
    pub fn complete(&mut self, role: Role, result: Result<(), ApiError>, delay: Duration) -> Outcome {
        self.in_flight.finish();
        match result {
            Ok(()) => {
                tracing::info!("Registered new {} account", role);
                self.values.reset();
                let next = match role {
                    Role::Student => Route::Profile,
                    Role::Admin => Route::Login,
                };
                Outcome::succeeded(MSG_REGISTER_OK, next, delay)
            }
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                Outcome::failed(e.message().unwrap_or(MSG_REGISTER_FAILED))
            }
        }
    }

    pub async fn submit(
        &mut self,
        backend: &dyn PlacementBackend,
        delay: Duration,
    ) -> Result<Outcome, AuthRejection> {
        let request = self.begin_submit()?;
        let role = request.role;
        let result = backend.register(&request).await;
        Ok(self.complete(role, result, delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, MockPlacementBackend};
    use crate::forms::Violation;
    use rstest::rstest;

    const DELAY: Duration = Duration::from_millis(1800);

    fn filled_registration(role: Role) -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.values.set("first_name", "Asha").unwrap();
        form.values.set("last_name", "Rao").unwrap();
        form.values.set("email", "asha@college.edu").unwrap();
        form.values.set("password", "secret").unwrap();
        form.role = role;
        form
    }

    #[tokio::test]
    async fn test_login_stores_token_and_schedules_dashboard() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body(r#"{"access_token": "T1"}"#)
            .create_async()
            .await;
        let api = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();

        let mut session = Session::new();
        let mut form = LoginForm::with_credentials("a@b.com", "x");
        let outcome = form.submit(&api, &mut session, DELAY).await.unwrap();

        mock.assert_async().await;
        assert_eq!(session.token(), Some("T1"));
        assert_eq!(outcome.notice, Notice::success(MSG_LOGIN_OK));
        assert_eq!(outcome.navigate, Some((Route::Dashboard, DELAY)));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_login_unauthorized_stores_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .create_async()
            .await;
        let api = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();

        let mut session = Session::new();
        let mut form = LoginForm::with_credentials("a@b.com", "x");
        let outcome = form.submit(&api, &mut session, DELAY).await.unwrap();

        assert!(session.token().is_none());
        assert_eq!(outcome.notice, Notice::error(MSG_LOGIN_FAILED));
        assert!(outcome.navigate.is_none());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_login_surfaces_backend_detail() {
        let mut form = LoginForm::with_credentials("a@b.com", "x");
        form.begin_submit().unwrap();
        let outcome = form.complete(
            Err(ApiError::Status {
                status: 403,
                message: Some("Account disabled".to_string()),
            }),
            &mut Session::new(),
            DELAY,
        );
        assert_eq!(outcome.notice.text, "Account disabled");
    }

    #[test]
    fn test_login_success_without_token_still_navigates() {
        let mut session = Session::new();
        let mut form = LoginForm::with_credentials("a@b.com", "x");
        form.begin_submit().unwrap();
        let outcome = form.complete(Ok(LoginResponse::default()), &mut session, DELAY);
        assert!(session.token().is_none());
        assert_eq!(outcome.navigate, Some((Route::Dashboard, DELAY)));
    }

    #[rstest]
    #[case("", "x", "email")]
    #[case("not-an-email", "x", "email")]
    #[case("a@b.com", "", "password")]
    fn test_login_rejected_locally(#[case] email: &str, #[case] password: &str, #[case] field: &str) {
        let mut form = LoginForm::with_credentials(email, password);
        match form.begin_submit() {
            Err(AuthRejection::Invalid(report)) => assert!(report.get(field).is_some()),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_login_double_click_ignored() {
        let mut form = LoginForm::with_credentials("a@b.com", "x");
        assert!(form.begin_submit().is_ok());
        assert_eq!(form.begin_submit().unwrap_err(), AuthRejection::InFlight);
    }

    #[rstest]
    #[case(Role::Student, Route::Profile)]
    #[case(Role::Admin, Route::Login)]
    #[tokio::test]
    async fn test_registration_routes_by_role(#[case] role: Role, #[case] next: Route) {
        let mut backend = MockPlacementBackend::new();
        backend
            .expect_register()
            .withf(move |req| req.role == role && req.email == "asha@college.edu")
            .times(1)
            .returning(|_| Ok(()));

        let delay = Duration::from_millis(2000);
        let mut form = filled_registration(role);
        let outcome = form.submit(&backend, delay).await.unwrap();

        assert_eq!(outcome.notice, Notice::success(MSG_REGISTER_OK));
        assert_eq!(outcome.navigate, Some((next, delay)));
        assert_eq!(form.values.get("email"), Some(""));
    }

    #[tokio::test]
    async fn test_registration_failure_keeps_values() {
        let mut backend = MockPlacementBackend::new();
        backend.expect_register().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 400,
                message: Some("Email already registered".to_string()),
            })
        });

        let mut form = filled_registration(Role::Student);
        let outcome = form.submit(&backend, DELAY).await.unwrap();

        assert_eq!(outcome.notice, Notice::error("Email already registered"));
        assert_eq!(form.values.get("email"), Some("asha@college.edu"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_registration_generic_failure_message() {
        let mut form = filled_registration(Role::Student);
        form.begin_submit().unwrap();
        let outcome = form.complete(Role::Student, Err(ApiError::Timeout), DELAY);
        assert_eq!(outcome.notice.text, MSG_REGISTER_FAILED);
    }

    #[tokio::test]
    async fn test_registration_incomplete_sends_nothing() {
        let mut backend = MockPlacementBackend::new();
        backend.expect_register().times(0);

        let mut form = filled_registration(Role::Student);
        form.values.set("last_name", "   ").unwrap();
        let rejection = form.submit(&backend, DELAY).await.unwrap_err();
        match rejection {
            AuthRejection::Invalid(report) => {
                assert_eq!(report.get("last_name"), Some(&Violation::Missing))
            }
            other => panic!("unexpected rejection: {:?}", other),
        }
    }
}
