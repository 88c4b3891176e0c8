//! Placement Hub - campus placement tracking client
//!
//! Terminal client for a placement office backend: students register, log
//! in, fill a four-step profile with a résumé, and follow their applications
//! on a dashboard.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive mode
//! placement-hub
//!
//! # Non-interactive
//! placement-hub login --email asha@college.edu
//! placement-hub profile --file profile.toml --resume ~/cv.pdf
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod logging;
pub mod navigation;
pub mod profile;
pub mod session;
pub mod tui;

// Re-export commonly used types
pub use error::{ErrorCode, PlacementError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
