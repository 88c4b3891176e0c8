//! TUI Event System
//!
//! Terminal input, ticks, and the results of backend requests all arrive on
//! one channel so that every state change happens on the UI task.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::{ApiError, LoginResponse, Role};

/// Events that can occur in the TUI
#[derive(Debug)]
pub enum TuiEvent {
    /// User pressed a key
    Key(KeyEvent),

    /// User pasted text
    Paste(String),

    /// Terminal was resized
    Resize(u16, u16),

    /// Tick event for delayed navigation
    Tick,

    /// Login request finished; `visit` identifies the screen that sent it
    LoginFinished {
        visit: u64,
        result: Result<LoginResponse, ApiError>,
    },

    /// Registration request finished
    RegisterFinished {
        visit: u64,
        role: Role,
        result: Result<(), ApiError>,
    },

    /// Profile submission finished
    ProfileSubmitted {
        visit: u64,
        result: Result<(), ApiError>,
    },

    /// Request to quit
    Quit,
}

/// Event handler for the TUI
pub struct EventHandler {
    tx: mpsc::UnboundedSender<TuiEvent>,
    rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Get a sender for sending events
    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available)
    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }

    /// Try to receive the next event without blocking
    pub fn try_next(&mut self) -> Option<TuiEvent> {
        self.rx.try_recv().ok()
    }

    /// Start listening for terminal events
    ///
    /// Uses crossterm's async EventStream so that request tasks are never
    /// starved by a blocking poll.
    pub fn start_terminal_listener(tx: mpsc::UnboundedSender<TuiEvent>) {
        use crossterm::event::{Event, EventStream, KeyEventKind};
        use futures::StreamExt;

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let tick_interval = std::time::Duration::from_millis(100);

            loop {
                let event = tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(event)) => Some(event),
                            Some(Err(_)) => None,
                            None => break,
                        }
                    }
                    _ = tokio::time::sleep(tick_interval) => None,
                };

                let closed = match event {
                    // Only key presses; releases would double every keystroke
                    Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        tx.send(TuiEvent::Key(key)).is_err()
                    }
                    Some(Event::Resize(w, h)) => tx.send(TuiEvent::Resize(w, h)).is_err(),
                    Some(Event::Paste(text)) => tx.send(TuiEvent::Paste(text)).is_err(),
                    _ => false,
                };
                if closed || tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to check if a key event matches
pub fn key_matches(event: &KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    event.code == code && event.modifiers == modifiers
}

/// Common key bindings
pub mod keys {
    use super::*;

    /// Ctrl+C - Quit
    pub fn is_quit(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    /// Escape - Back
    pub fn is_cancel(event: &KeyEvent) -> bool {
        event.code == KeyCode::Esc
    }

    /// Enter - Confirm/Submit
    pub fn is_enter(event: &KeyEvent) -> bool {
        event.code == KeyCode::Enter && event.modifiers.is_empty()
    }

    /// Tab or Down - next field
    pub fn is_next_field(event: &KeyEvent) -> bool {
        matches!(event.code, KeyCode::Tab | KeyCode::Down)
    }

    /// Shift+Tab or Up - previous field
    pub fn is_prev_field(event: &KeyEvent) -> bool {
        matches!(event.code, KeyCode::BackTab | KeyCode::Up)
    }

    /// Left/Right - toggle a two-way selector
    pub fn is_toggle(event: &KeyEvent) -> bool {
        matches!(event.code, KeyCode::Left | KeyCode::Right) && event.modifiers.is_empty()
    }

    pub fn is_backspace(event: &KeyEvent) -> bool {
        event.code == KeyCode::Backspace
    }

    /// F1..F4 - jump to a wizard step (zero-based)
    pub fn step_jump(event: &KeyEvent) -> Option<usize> {
        match event.code {
            KeyCode::F(n @ 1..=9) => Some(n as usize - 1),
            _ => None,
        }
    }

    /// A printable character typed without Ctrl/Alt
    pub fn typed_char(event: &KeyEvent) -> Option<char> {
        match event.code {
            KeyCode::Char(c)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// A bare letter shortcut, case-insensitive
    pub fn is_shortcut(event: &KeyEvent, letter: char) -> bool {
        matches!(typed_char(event), Some(c) if c.eq_ignore_ascii_case(&letter))
    }
}
