//! Dashboard data and the résumé ATS check.
//!
//! Everything here is mocked client-side; no endpoint backs the dashboard.

use crate::forms::{ResumeError, ResumeRef};

pub const MSG_UPLOAD_FIRST: &str = "Please upload resume first";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRow {
    pub company: &'static str,
    pub role: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interview {
    pub company: &'static str,
    pub round: &'static str,
    pub date: &'static str,
    pub time: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub stats: Vec<StatCard>,
    pub applications: Vec<ApplicationRow>,
    pub interviews: Vec<Interview>,
}

impl DashboardData {
    pub fn sample() -> Self {
        Self {
            stats: vec![
                StatCard { label: "Companies", value: 24 },
                StatCard { label: "Applied Jobs", value: 6 },
                StatCard { label: "Interviews", value: 2 },
                StatCard { label: "Active Processes", value: 3 },
            ],
            applications: vec![
                ApplicationRow {
                    company: "TCS",
                    role: "Software Developer",
                    status: "Technical Round",
                },
                ApplicationRow {
                    company: "Infosys",
                    role: "System Analyst",
                    status: "Assessment Completed",
                },
            ],
            interviews: vec![
                Interview {
                    company: "TCS",
                    round: "Technical Round",
                    date: "15 Feb 2026",
                    time: "10:00 AM",
                },
                Interview {
                    company: "Wipro",
                    round: "HR Round",
                    date: "18 Feb 2026",
                    time: "2:00 PM",
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtsReport {
    pub score: u8,
    pub matched: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

impl AtsReport {
    fn mocked() -> Self {
        Self {
            score: 78,
            matched: vec!["Java", "SQL"],
            missing: vec!["React", "Docker"],
        }
    }
}

/// Résumé picker plus the last ATS report.
#[derive(Debug, Clone, Default)]
pub struct AtsPanel {
    resume: Option<ResumeRef>,
    report: Option<AtsReport>,
}

impl AtsPanel {
    pub fn resume(&self) -> Option<&ResumeRef> {
        self.resume.as_ref()
    }

    pub fn report(&self) -> Option<&AtsReport> {
        self.report.as_ref()
    }

    /// Choose a résumé of any type. A previous report no longer applies.
    pub fn select_resume(&mut self, input: &str) -> Result<&ResumeRef, ResumeError> {
        let resume = ResumeRef::inspect(input)?;
        self.report = None;
        Ok(self.resume.insert(resume))
    }

    pub fn check(&mut self) -> Result<&AtsReport, &'static str> {
        let Some(resume) = &self.resume else {
            return Err(MSG_UPLOAD_FIRST);
        };
        tracing::debug!("ATS check for {}", resume.file_name);
        Ok(self.report.insert(AtsReport::mocked()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data() {
        let data = DashboardData::sample();
        let values: Vec<u32> = data.stats.iter().map(|s| s.value).collect();
        assert_eq!(values, [24, 6, 2, 3]);
        assert_eq!(data.applications[1].company, "Infosys");
        assert_eq!(data.interviews[1].time, "2:00 PM");
    }

    #[test]
    fn test_check_requires_resume() {
        let mut panel = AtsPanel::default();
        assert_eq!(panel.check(), Err(MSG_UPLOAD_FIRST));
        assert!(panel.report().is_none());
    }

    #[test]
    fn test_check_and_reselect() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("resume.txt");
        let second = dir.path().join("resume.pdf");
        std::fs::write(&first, b"plain").unwrap();
        std::fs::write(&second, b"%PDF").unwrap();

        let mut panel = AtsPanel::default();
        panel.select_resume(first.to_str().unwrap()).unwrap();
        let report = panel.check().unwrap();
        assert_eq!(report.score, 78);
        assert_eq!(report.missing, ["React", "Docker"]);

        panel.select_resume(second.to_str().unwrap()).unwrap();
        assert!(panel.report().is_none());
        assert_eq!(panel.resume().map(|r| r.file_name.as_str()), Some("resume.pdf"));
    }

    #[test]
    fn test_missing_file_keeps_previous_state() {
        let mut panel = AtsPanel::default();
        assert!(panel.select_resume("/definitely/not/here.pdf").is_err());
        assert!(panel.resume().is_none());
    }
}
