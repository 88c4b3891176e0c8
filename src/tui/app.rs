//! TUI Application State
//!
//! Owns the active screen, the session and the backend handle. Requests run
//! in spawned tasks and report back through the event channel; every state
//! change happens here, on the UI task.

use super::events::{EventHandler, TuiEvent, keys};
use super::screens::{
    DashboardScreen, LoginScreen, ProfileScreen, RegisterScreen, ScreenAction, handle_welcome_key,
};
use crate::api::PlacementBackend;
use crate::config::UiConfig;
use crate::navigation::{Notice, Outcome, PendingNavigation, Route};
use crate::session::Session;
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct App {
    pub route: Route,
    pub login: LoginScreen,
    pub register: RegisterScreen,
    pub profile: ProfileScreen,
    pub dashboard: DashboardScreen,
    pub session: Session,
    pub notice: Option<Notice>,
    pub pending: Option<PendingNavigation>,
    pub should_quit: bool,

    /// Bumped on every navigation; results from an older visit are stale.
    visit: u64,
    ui: UiConfig,
    backend: Arc<dyn PlacementBackend>,
    event_handler: EventHandler,
}

impl App {
    pub fn new(backend: Arc<dyn PlacementBackend>, session: Session, ui: UiConfig) -> Self {
        let route = if session.is_authenticated() {
            Route::Dashboard
        } else {
            Route::Welcome
        };

        Self {
            route,
            login: LoginScreen::default(),
            register: RegisterScreen::default(),
            profile: ProfileScreen::default(),
            dashboard: DashboardScreen::default(),
            session,
            notice: None,
            pending: None,
            should_quit: false,
            visit: 0,
            ui,
            backend,
            event_handler: EventHandler::new(),
        }
    }

    pub fn event_sender(&self) -> tokio::sync::mpsc::UnboundedSender<TuiEvent> {
        self.event_handler.sender()
    }

    pub async fn next_event(&mut self) -> Option<TuiEvent> {
        self.event_handler.next().await
    }

    /// Leave the current screen. The destination starts from a blank state
    /// and any scheduled navigation is dropped.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigate {:?} -> {:?}", self.route, route);
        self.visit = self.visit.wrapping_add(1);
        self.route = route;
        self.notice = None;
        self.pending = None;
        match route {
            Route::Welcome => {}
            Route::Login => self.login = LoginScreen::default(),
            Route::Register => self.register = RegisterScreen::default(),
            Route::Profile => self.profile = ProfileScreen::default(),
            Route::Dashboard => self.dashboard = DashboardScreen::default(),
        }
    }

    /// Handle an event
    pub async fn handle_event(&mut self, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key) => self.handle_key_event(key),
            TuiEvent::Paste(text) => self.handle_paste(&text),
            TuiEvent::Tick => self.handle_tick(Instant::now()),
            TuiEvent::Resize(_, _) => {}
            TuiEvent::Quit => self.should_quit = true,
            TuiEvent::LoginFinished { visit, result } => {
                if self.is_current(visit, Route::Login) {
                    let outcome = self.login.form.complete(
                        result,
                        &mut self.session,
                        Duration::from_millis(self.ui.login_redirect_ms),
                    );
                    self.apply_outcome(outcome);
                }
            }
            TuiEvent::RegisterFinished {
                visit,
                role,
                result,
            } => {
                if self.is_current(visit, Route::Register) {
                    let outcome = self.register.form.complete(
                        role,
                        result,
                        Duration::from_millis(self.ui.register_redirect_ms),
                    );
                    self.apply_outcome(outcome);
                }
            }
            TuiEvent::ProfileSubmitted { visit, result } => {
                if self.is_current(visit, Route::Profile) {
                    let outcome = self.profile.form.complete(&result);
                    self.apply_outcome(outcome);
                }
            }
        }
        Ok(())
    }

    fn is_current(&self, visit: u64, route: Route) -> bool {
        let current = self.visit == visit && self.route == route;
        if !current {
            tracing::debug!("Discarding result for {:?}: screen no longer active", route);
        }
        current
    }

    fn handle_tick(&mut self, now: Instant) {
        if let Some(pending) = self.pending
            && pending.is_due(now)
        {
            // Keep the success notice visible across the redirect
            let notice = self.notice.take();
            self.navigate(pending.route);
            self.notice = notice;
        }
    }

    fn handle_key_event(&mut self, event: KeyEvent) {
        if keys::is_quit(&event) {
            self.should_quit = true;
            return;
        }

        let action = match self.route {
            Route::Welcome => handle_welcome_key(&event),
            Route::Login => self.login.handle_key(&event),
            Route::Register => self.register.handle_key(&event),
            Route::Profile => self.profile.handle_key(&event),
            Route::Dashboard => self.dashboard.handle_key(&event),
        };
        self.apply_action(action);
    }

    fn handle_paste(&mut self, text: &str) {
        match self.route {
            Route::Login => {
                let idx = self.login.focus;
                self.login.form.values.push_str(idx, text);
            }
            Route::Register => {
                let idx = self.register.focus;
                self.register.form.values.push_str(idx, text);
            }
            Route::Profile => self.profile.paste(text),
            Route::Dashboard if self.dashboard.editing_resume => {
                self.dashboard.resume_input.push_str(text)
            }
            _ => {}
        }
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Navigate(route) => self.navigate(route),
            ScreenAction::Notify(notice) => self.notice = Some(notice),
            ScreenAction::SubmitLogin => self.submit_login(),
            ScreenAction::SubmitRegister => self.submit_register(),
            ScreenAction::SubmitProfile => self.submit_profile(),
            ScreenAction::Logout => self.logout(),
            ScreenAction::Quit => self.should_quit = true,
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome.navigate {
            Some((route, delay)) if delay.is_zero() => {
                self.navigate(route);
                self.notice = Some(outcome.notice);
            }
            Some((route, delay)) => {
                self.notice = Some(outcome.notice);
                self.pending = Some(PendingNavigation::after(route, delay, Instant::now()));
            }
            None => self.notice = Some(outcome.notice),
        }
    }

    fn submit_login(&mut self) {
        let request = match self.login.form.begin_submit() {
            Ok(request) => request,
            Err(rejection) => {
                if let Some(notice) = rejection.notice() {
                    self.notice = Some(notice);
                }
                return;
            }
        };

        self.notice = Some(Notice::info("Logging in..."));
        let backend = Arc::clone(&self.backend);
        let tx = self.event_sender();
        let visit = self.visit;
        tokio::spawn(async move {
            let result = backend.login(&request).await;
            let _ = tx.send(TuiEvent::LoginFinished { visit, result });
        });
    }

    fn submit_register(&mut self) {
        let request = match self.register.form.begin_submit() {
            Ok(request) => request,
            Err(rejection) => {
                if let Some(notice) = rejection.notice() {
                    self.notice = Some(notice);
                }
                return;
            }
        };

        self.notice = Some(Notice::info("Creating account..."));
        let backend = Arc::clone(&self.backend);
        let tx = self.event_sender();
        let visit = self.visit;
        tokio::spawn(async move {
            let role = request.role;
            let result = backend.register(&request).await;
            let _ = tx.send(TuiEvent::RegisterFinished {
                visit,
                role,
                result,
            });
        });
    }

    fn submit_profile(&mut self) {
        let request = match self.profile.form.begin_submit(self.session.token()) {
            Ok(request) => request,
            Err(rejection) => {
                if let Some(notice) = rejection.notice() {
                    self.notice = Some(notice);
                }
                return;
            }
        };

        self.notice = Some(Notice::info("Submitting profile..."));
        let backend = Arc::clone(&self.backend);
        let tx = self.event_sender();
        let visit = self.visit;
        tokio::spawn(async move {
            let result = backend
                .submit_profile(&request.token, &request.payload)
                .await;
            let _ = tx.send(TuiEvent::ProfileSubmitted { visit, result });
        });
    }

    fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!("Failed to clear session: {}", e);
        }
        self.navigate(Route::Welcome);
        self.notice = Some(Notice::info("Logged out"));
    }
}
