//! Résumé selection. Only local metadata is captured; no bytes leave the machine.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ACCEPTED_RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("no file at {0:?}")]
    NotFound(PathBuf),

    #[error("{0:?} is not a regular file")]
    NotAFile(PathBuf),

    #[error("unsupported resume type {0:?} (expected .pdf, .doc or .docx)")]
    UnsupportedType(String),

    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRef {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

impl ResumeRef {
    /// Inspect a résumé for the profile form (.pdf, .doc, .docx only).
    pub fn from_path(input: &str) -> Result<Self, ResumeError> {
        let path = expand_home(input.trim());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_RESUME_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ResumeError::UnsupportedType(extension));
        }
        Self::inspect_path(path)
    }

    /// Inspect any file (the dashboard ATS check accepts every type).
    pub fn inspect(input: &str) -> Result<Self, ResumeError> {
        Self::inspect_path(expand_home(input.trim()))
    }

    fn inspect_path(path: PathBuf) -> Result<Self, ResumeError> {
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResumeError::NotFound(path));
            }
            Err(source) => return Err(ResumeError::Io { path, source }),
        };
        if !metadata.is_file() {
            return Err(ResumeError::NotAFile(path));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!("Selected resume {} ({} bytes)", file_name, metadata.len());
        Ok(Self {
            file_name,
            size_bytes: metadata.len(),
            path,
        })
    }
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    Path::new(input).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Resume.PDF");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let resume = ResumeRef::from_path(path.to_str().unwrap()).unwrap();
        assert_eq!(resume.file_name, "Resume.PDF");
        assert_eq!(resume.size_bytes, 8);
    }

    #[test]
    fn test_rejects_other_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, b"hi").unwrap();

        let err = ResumeRef::from_path(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ResumeError::UnsupportedType(ext) if ext == "txt"));

        // the dashboard is less picky
        assert!(ResumeRef::inspect(path.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pdf");
        let err = ResumeRef::from_path(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ResumeError::NotFound(_)));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folder.pdf");
        std::fs::create_dir(&path).unwrap();
        let err = ResumeRef::from_path(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ResumeError::NotAFile(_)));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/cv.pdf"), home.join("cv.pdf"));
        }
        assert_eq!(expand_home("/tmp/cv.pdf"), PathBuf::from("/tmp/cv.pdf"));
    }
}
