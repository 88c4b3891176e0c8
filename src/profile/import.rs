//! Profile values from a TOML file, for non-interactive submission.
//!
//! ```toml
//! first_name = "Asha"
//! graduation_year = 2024
//! cgpa = 8.7
//! ```
//!
//! Numbers are accepted as TOML numbers or strings; either way they end up
//! as form text and go through the normal submission gate.

use std::path::Path;

use crate::error::{PlacementError, Result};
use crate::forms::FormValues;

use super::PROFILE_FIELDS;

pub fn load_profile_file(path: &Path) -> Result<FormValues> {
    let contents = std::fs::read_to_string(path)?;
    parse_profile(&contents).map_err(|err| match err {
        PlacementError::ProfileFile { message, .. } => PlacementError::ProfileFile {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

pub fn parse_profile(contents: &str) -> Result<FormValues> {
    let invalid = |message: String| PlacementError::ProfileFile {
        path: Default::default(),
        message,
    };

    let table: toml::Table = toml::from_str(contents).map_err(|e| invalid(e.to_string()))?;
    let mut values = FormValues::new(PROFILE_FIELDS);

    for (name, value) in table {
        let text = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(n) => n.to_string(),
            toml::Value::Float(x) => x.to_string(),
            other => {
                return Err(invalid(format!(
                    "{} must be a string or number, got {}",
                    name,
                    other.type_str()
                )));
            }
        };
        values.set(&name, text)?;
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::profile::SubmissionPayload;
    use crate::profile::tests_support::sample_resume;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PROFILE: &str = r#"
first_name = "Asha"
last_name = "Rao"
roll_no = "CS21B042"
department_id = "CSE"
graduation_year = 2024
cgpa = 8.7
tenth_percentage = "91.2"
twelfth_percentage = 88
active_backlogs = 0
total_backlogs = 1
linkedin_url = "https://linkedin.com/in/asharao"
github_url = "https://github.com/asharao"
portfolio_url = "https://asharao.dev"
"#;

    #[test]
    fn test_parse_full_profile() {
        let values = parse_profile(PROFILE).unwrap();
        assert_eq!(values.get("graduation_year"), Some("2024"));
        assert_eq!(values.get("cgpa"), Some("8.7"));

        let payload = SubmissionPayload::build(&values, Some(&sample_resume())).unwrap();
        assert_eq!(payload.twelfth_percentage, 88.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_profile("nickname = \"ash\"").unwrap_err();
        assert!(matches!(err, PlacementError::Form(_)));
    }

    #[test]
    fn test_wrong_value_type_rejected() {
        let err = parse_profile("cgpa = true").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
        assert!(err.to_string().contains("cgpa"));
    }

    #[test]
    fn test_load_from_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "first_name = [").unwrap();

        match load_profile_file(file.path()).unwrap_err() {
            PlacementError::ProfileFile { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io() {
        let err = load_profile_file(Path::new("/no/such/profile.toml")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Io);
    }
}
