//! Per-screen state and key handling.
//!
//! Screens only mutate their own state; anything that needs the backend, the
//! session or navigation is returned as a [`ScreenAction`] for the app.

use crossterm::event::KeyEvent;
use std::ops::Range;

use super::events::keys;
use crate::auth::{LoginForm, RegistrationForm};
use crate::dashboard::{AtsPanel, DashboardData};
use crate::forms::FormValues;
use crate::navigation::{Notice, Route};
use crate::profile::ProfileForm;

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    None,
    Navigate(Route),
    Notify(Notice),
    SubmitLogin,
    SubmitRegister,
    SubmitProfile,
    Logout,
    Quit,
}

/// Shared text-entry handling: field focus within `range`, typing, deleting.
/// Returns true if the key was consumed.
fn edit_fields(
    values: &mut FormValues,
    focus: &mut usize,
    range: Range<usize>,
    event: &KeyEvent,
) -> bool {
    let len = range.len();
    if len == 0 {
        return false;
    }
    if keys::is_next_field(event) {
        *focus = (*focus + 1) % len;
    } else if keys::is_prev_field(event) {
        *focus = (*focus + len - 1) % len;
    } else if keys::is_backspace(event) {
        values.pop_char(range.start + *focus);
    } else if let Some(c) = keys::typed_char(event) {
        values.push_char(range.start + *focus, c);
    } else {
        return false;
    }
    true
}

pub fn handle_welcome_key(event: &KeyEvent) -> ScreenAction {
    if keys::is_enter(event) {
        ScreenAction::Navigate(Route::Register)
    } else if keys::is_shortcut(event, 'l') {
        ScreenAction::Navigate(Route::Login)
    } else if keys::is_shortcut(event, 'q') || keys::is_cancel(event) {
        ScreenAction::Quit
    } else {
        ScreenAction::None
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    pub form: LoginForm,
    pub focus: usize,
}

impl LoginScreen {
    pub fn handle_key(&mut self, event: &KeyEvent) -> ScreenAction {
        use crossterm::event::KeyCode;

        if keys::is_cancel(event) {
            return ScreenAction::Navigate(Route::Welcome);
        }
        if event.code == KeyCode::F(2) {
            return ScreenAction::Navigate(Route::Register);
        }
        if keys::is_toggle(event) {
            self.form.role = self.form.role.toggled();
            return ScreenAction::None;
        }
        if keys::is_enter(event) {
            return ScreenAction::SubmitLogin;
        }
        let range = 0..self.form.values.len();
        edit_fields(&mut self.form.values, &mut self.focus, range, event);
        ScreenAction::None
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterScreen {
    pub form: RegistrationForm,
    pub focus: usize,
}

impl RegisterScreen {
    pub fn handle_key(&mut self, event: &KeyEvent) -> ScreenAction {
        use crossterm::event::KeyCode;

        if keys::is_cancel(event) {
            return ScreenAction::Navigate(Route::Welcome);
        }
        if event.code == KeyCode::F(2) {
            return ScreenAction::Navigate(Route::Login);
        }
        if keys::is_toggle(event) {
            self.form.role = self.form.role.toggled();
            return ScreenAction::None;
        }
        if keys::is_enter(event) {
            return ScreenAction::SubmitRegister;
        }
        let range = 0..self.form.values.len();
        edit_fields(&mut self.form.values, &mut self.focus, range, event);
        ScreenAction::None
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileScreen {
    pub form: ProfileForm,
    /// Focus within the current step; the résumé input is the last slot on
    /// the final step.
    pub focus: usize,
    pub resume_input: String,
}

impl ProfileScreen {
    fn field_range(&self) -> Range<usize> {
        self.form
            .current_step()
            .map_or(0..0, |step| step.field_range())
    }

    fn has_resume_slot(&self) -> bool {
        self.form.current_step().is_some_and(|step| step.has_resume())
    }

    fn slot_count(&self) -> usize {
        self.field_range().len() + usize::from(self.has_resume_slot())
    }

    pub fn on_resume_input(&self) -> bool {
        self.has_resume_slot() && self.focus == self.field_range().len()
    }

    /// Global index into `PROFILE_FIELDS` of the focused field, if any.
    pub fn focused_field(&self) -> Option<usize> {
        let range = self.field_range();
        (self.focus < range.len()).then(|| range.start + self.focus)
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> ScreenAction {
        if let Some(step) = keys::step_jump(event) {
            if self.form.wizard.jump_to(step) {
                self.focus = 0;
            }
            return ScreenAction::None;
        }
        if keys::is_cancel(event) {
            if self.form.wizard.retreat() {
                self.focus = 0;
            }
            return ScreenAction::None;
        }
        if keys::is_next_field(event) {
            self.focus = (self.focus + 1) % self.slot_count();
            return ScreenAction::None;
        }
        if keys::is_prev_field(event) {
            let slots = self.slot_count();
            self.focus = (self.focus + slots - 1) % slots;
            return ScreenAction::None;
        }

        if self.on_resume_input() {
            return self.handle_resume_key(event);
        }

        if keys::is_enter(event) {
            if self.form.wizard.is_final_step() {
                return ScreenAction::SubmitProfile;
            }
            self.form.wizard.advance();
            self.focus = 0;
            return ScreenAction::None;
        }

        if let Some(idx) = self.focused_field() {
            if keys::is_backspace(event) {
                self.form.values.pop_char(idx);
            } else if let Some(c) = keys::typed_char(event) {
                self.form.values.push_char(idx, c);
            }
        }
        ScreenAction::None
    }

    fn handle_resume_key(&mut self, event: &KeyEvent) -> ScreenAction {
        if keys::is_enter(event) {
            // Enter on an empty picker falls through to submit
            if self.resume_input.trim().is_empty() {
                return ScreenAction::SubmitProfile;
            }
            return match self.form.select_resume(&self.resume_input) {
                Ok(resume) => {
                    let text = format!("Selected {}", resume.file_name);
                    self.resume_input.clear();
                    ScreenAction::Notify(Notice::info(text))
                }
                Err(e) => ScreenAction::Notify(Notice::error(e.to_string())),
            };
        }
        if keys::is_backspace(event) {
            self.resume_input.pop();
        } else if let Some(c) = keys::typed_char(event) {
            self.resume_input.push(c);
        }
        ScreenAction::None
    }

    pub fn paste(&mut self, text: &str) {
        if self.on_resume_input() {
            self.resume_input.push_str(text);
        } else if let Some(idx) = self.focused_field() {
            self.form.values.push_str(idx, text);
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardScreen {
    pub data: DashboardData,
    pub ats: AtsPanel,
    pub resume_input: String,
    pub editing_resume: bool,
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self {
            data: DashboardData::sample(),
            ats: AtsPanel::default(),
            resume_input: String::new(),
            editing_resume: false,
        }
    }
}

impl DashboardScreen {
    pub fn handle_key(&mut self, event: &KeyEvent) -> ScreenAction {
        if self.editing_resume {
            return self.handle_resume_key(event);
        }

        if keys::is_shortcut(event, 'u') {
            self.editing_resume = true;
            ScreenAction::None
        } else if keys::is_shortcut(event, 'a') {
            match self.ats.check() {
                Ok(report) => ScreenAction::Notify(Notice::success(format!(
                    "ATS Score: {}%",
                    report.score
                ))),
                Err(msg) => ScreenAction::Notify(Notice::error(msg)),
            }
        } else if keys::is_shortcut(event, 'p') {
            ScreenAction::Navigate(Route::Profile)
        } else if keys::is_shortcut(event, 'o') {
            ScreenAction::Logout
        } else if keys::is_shortcut(event, 'q') {
            ScreenAction::Quit
        } else {
            ScreenAction::None
        }
    }

    fn handle_resume_key(&mut self, event: &KeyEvent) -> ScreenAction {
        if keys::is_cancel(event) {
            self.editing_resume = false;
        } else if keys::is_enter(event) {
            let action = match self.ats.select_resume(&self.resume_input) {
                Ok(resume) => {
                    ScreenAction::Notify(Notice::info(format!("Selected {}", resume.file_name)))
                }
                Err(e) => return ScreenAction::Notify(Notice::error(e.to_string())),
            };
            self.resume_input.clear();
            self.editing_resume = false;
            return action;
        } else if keys::is_backspace(event) {
            self.resume_input.pop();
        } else if let Some(c) = keys::typed_char(event) {
            self.resume_input.push(c);
        }
        ScreenAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::profile::ProfileStep;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_str<F: FnMut(&KeyEvent) -> ScreenAction>(mut handle: F, text: &str) {
        for c in text.chars() {
            handle(&key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_welcome_keys() {
        assert_eq!(
            handle_welcome_key(&key(KeyCode::Enter)),
            ScreenAction::Navigate(Route::Register)
        );
        assert_eq!(
            handle_welcome_key(&key(KeyCode::Char('l'))),
            ScreenAction::Navigate(Route::Login)
        );
        assert_eq!(handle_welcome_key(&key(KeyCode::Char('q'))), ScreenAction::Quit);
    }

    #[test]
    fn test_login_typing_and_focus() {
        let mut screen = LoginScreen::default();
        type_str(|k| screen.handle_key(k), "a@b.com");
        screen.handle_key(&key(KeyCode::Tab));
        type_str(|k| screen.handle_key(k), "xy");
        screen.handle_key(&key(KeyCode::Backspace));

        assert_eq!(screen.form.values.get("email"), Some("a@b.com"));
        assert_eq!(screen.form.values.get("password"), Some("x"));
        assert_eq!(screen.handle_key(&key(KeyCode::Enter)), ScreenAction::SubmitLogin);
    }

    #[test]
    fn test_register_role_toggle_and_link() {
        let mut screen = RegisterScreen::default();
        assert_eq!(screen.form.role, Role::Student);
        screen.handle_key(&key(KeyCode::Right));
        assert_eq!(screen.form.role, Role::Admin);
        assert_eq!(
            screen.handle_key(&key(KeyCode::F(2))),
            ScreenAction::Navigate(Route::Login)
        );
    }

    #[test]
    fn test_focus_wraps() {
        let mut screen = RegisterScreen::default();
        screen.handle_key(&key(KeyCode::BackTab));
        assert_eq!(screen.focus, 3);
        screen.handle_key(&key(KeyCode::Tab));
        assert_eq!(screen.focus, 0);
    }

    #[test]
    fn test_profile_enter_advances_without_validation() {
        let mut screen = ProfileScreen::default();
        assert_eq!(screen.handle_key(&key(KeyCode::Enter)), ScreenAction::None);
        assert_eq!(screen.form.current_step(), Some(ProfileStep::Academic));
        screen.handle_key(&key(KeyCode::Esc));
        assert_eq!(screen.form.current_step(), Some(ProfileStep::BasicInfo));
    }

    #[test]
    fn test_profile_typing_lands_in_step_field() {
        let mut screen = ProfileScreen::default();
        screen.handle_key(&key(KeyCode::F(2)));
        screen.handle_key(&key(KeyCode::Tab));
        type_str(|k| screen.handle_key(k), "91.5");
        assert_eq!(screen.form.values.get("tenth_percentage"), Some("91.5"));
    }

    #[test]
    fn test_profile_final_step_submits() {
        let mut screen = ProfileScreen::default();
        screen.handle_key(&key(KeyCode::F(4)));
        assert_eq!(screen.handle_key(&key(KeyCode::Enter)), ScreenAction::SubmitProfile);
    }

    #[test]
    fn test_profile_resume_slot_only_on_last_step() {
        let mut screen = ProfileScreen::default();
        for _ in 0..5 {
            screen.handle_key(&key(KeyCode::Tab));
        }
        assert!(!screen.on_resume_input());
        assert_eq!(screen.focus, 0);

        screen.handle_key(&key(KeyCode::F(4)));
        screen.handle_key(&key(KeyCode::BackTab));
        assert!(screen.on_resume_input());
        assert_eq!(screen.focused_field(), None);
    }

    #[test]
    fn test_profile_resume_selection_error_is_notice() {
        let mut screen = ProfileScreen::default();
        screen.handle_key(&key(KeyCode::F(4)));
        screen.handle_key(&key(KeyCode::BackTab));
        screen.paste("/no/such/cv.pdf");
        match screen.handle_key(&key(KeyCode::Enter)) {
            ScreenAction::Notify(notice) => assert!(notice.is_error()),
            other => panic!("unexpected action: {:?}", other),
        }
        assert!(screen.form.resume().is_none());
    }

    #[test]
    fn test_dashboard_ats_requires_resume() {
        let mut screen = DashboardScreen::default();
        assert_eq!(
            screen.handle_key(&key(KeyCode::Char('a'))),
            ScreenAction::Notify(Notice::error("Please upload resume first"))
        );
        assert_eq!(screen.handle_key(&key(KeyCode::Char('o'))), ScreenAction::Logout);
    }

    #[test]
    fn test_dashboard_resume_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, b"cv").unwrap();

        let mut screen = DashboardScreen::default();
        screen.handle_key(&key(KeyCode::Char('u')));
        assert!(screen.editing_resume);
        type_str(|k| screen.handle_key(k), path.to_str().unwrap());
        screen.handle_key(&key(KeyCode::Enter));
        assert!(!screen.editing_resume);

        match screen.handle_key(&key(KeyCode::Char('a'))) {
            ScreenAction::Notify(notice) => assert_eq!(notice.text, "ATS Score: 78%"),
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
