//! Screens, user notices, and delayed navigation.

use std::time::{Duration, Instant};

/// The five screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Register,
    Login,
    Profile,
    Dashboard,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Register => "Create Account",
            Self::Login => "Login",
            Self::Profile => "Complete Student Profile",
            Self::Dashboard => "Placement Tracking Dashboard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A message shown to the user until dismissed or replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// What a finished submission asks the front-end to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub notice: Notice,
    /// Destination and how long to wait before going there
    pub navigate: Option<(Route, Duration)>,
}

impl Outcome {
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            notice: Notice::error(text),
            navigate: None,
        }
    }

    pub fn succeeded(text: impl Into<String>, route: Route, delay: Duration) -> Self {
        Self {
            notice: Notice::success(text),
            navigate: Some((route, delay)),
        }
    }
}

/// A navigation waiting for its delay to pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingNavigation {
    pub route: Route,
    pub due: Instant,
}

impl PendingNavigation {
    pub fn after(route: Route, delay: Duration, now: Instant) -> Self {
        Self {
            route,
            due: now + delay,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}
