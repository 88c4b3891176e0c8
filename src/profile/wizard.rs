//! Wizard Controller
//!
//! Tracks the current step of the profile wizard. Progress is always derived
//! from the step index; it is never stored.

use super::fields::ProfileStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardController {
    current: usize,
    total: usize,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(ProfileStep::ALL.len())
    }
}

impl WizardController {
    /// A wizard with `total` steps (at least one).
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The profile step at the current index; `None` past the last
    /// profile step when the wizard was built with more steps.
    pub fn current_step(&self) -> Option<ProfileStep> {
        ProfileStep::from_index(self.current)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn last_index(&self) -> usize {
        self.total - 1
    }

    /// Move forward one step. No-op on the final step.
    pub fn advance(&mut self) -> bool {
        if self.current >= self.last_index() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back one step. No-op on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Direct selection of any step, without validation.
    /// Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }
        self.current = index;
        true
    }

    pub fn is_first_step(&self) -> bool {
        self.current == 0
    }

    pub fn is_final_step(&self) -> bool {
        self.current == self.last_index()
    }

    /// `(current + 1) / total * 100`
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.total as f64 * 100.0
    }

    /// Integer percentage for gauges
    pub fn progress_percent(&self) -> u16 {
        self.progress().round() as u16
    }

    pub fn step_label(&self) -> String {
        format!("Step {} of {}", self.current + 1, self.total)
    }
}
