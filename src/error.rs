//! Error Types
//!
//! Top-level error type for the library. Each subsystem owns a narrower error
//! enum; this module folds them together and classifies them with an
//! [`ErrorCode`] so front-ends can decide how to present a failure.

use thiserror::Error;

use crate::api::ApiError;
use crate::forms::{FormError, ResumeError};
use crate::session::SessionError;

/// Coarse classification of a failure, used for user-facing notices and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Local form validation rejected the input; nothing was sent.
    Validation,
    /// The backend answered with a non-success status.
    Backend,
    /// The backend could not be reached or did not answer in time.
    Network,
    /// No usable session token, or the session file could not be handled.
    Session,
    /// Configuration could not be loaded or is invalid.
    Config,
    /// Local filesystem failure.
    Io,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Backend => "backend",
            Self::Network => "network",
            Self::Session => "session",
            Self::Config => "config",
            Self::Io => "io",
        }
    }
}

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Resume(#[from] ResumeError),

    #[error("invalid profile file {path:?}: {message}")]
    ProfileFile {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacementError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Api(err) => err.code(),
            Self::Form(_) | Self::Resume(_) | Self::ProfileFile { .. } => ErrorCode::Validation,
            Self::Session(_) => ErrorCode::Session,
            Self::Io(_) => ErrorCode::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlacementError>;
