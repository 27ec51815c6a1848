//! One report run: fetch, classify, aggregate, emit.
//!
//! Runs share nothing but the configuration. Each builds its own client
//! and fetches its own contact set, so a failed run leaves earlier output
//! on disk untouched and produces no file of its own.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};

use crate::classify::classify_batch;
use crate::client::{EcosendClient, Transport};
use crate::config::Config;
use crate::emit::{emit, ReportFormat};
use crate::error::Result;
use crate::report::{render_text, ReportKind};

pub struct ReportRunner {
    config: Config,
    format: ReportFormat,
    echo: bool,
}

impl ReportRunner {
    pub fn new(config: Config, format: ReportFormat) -> Self {
        Self {
            config,
            format,
            echo: true,
        }
    }

    /// Skip printing each table to stdout.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn faculty_activity(&self) -> Result<PathBuf> {
        self.generate(ReportKind::FacultyActivity)
    }

    pub fn membership_breakdown(&self) -> Result<PathBuf> {
        self.generate(ReportKind::MembershipBreakdown)
    }

    pub fn hub_activity(&self) -> Result<PathBuf> {
        self.generate(ReportKind::HubActivity)
    }

    pub fn uos_activity(&self) -> Result<PathBuf> {
        self.generate(ReportKind::UosActivity)
    }

    pub fn generate(&self, kind: ReportKind) -> Result<PathBuf> {
        let client = EcosendClient::from_config(&self.config)?;
        self.generate_with(&client, kind, Utc::now())
    }

    pub fn generate_with<T: Transport>(
        &self,
        client: &EcosendClient<T>,
        kind: ReportKind,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        log::info!("Fetching all contacts from Ecosend for {}...", kind.title());
        let contacts = client.fetch_all_contacts(None)?;
        log::info!("Retrieved {} contacts.", contacts.len());

        let classified = classify_batch(&contacts, now);
        let active = classified.iter().filter(|c| c.is_active()).count();
        log::info!("Found {active} active contacts (last 90 days).");

        let table = kind.build(&classified);
        if self.echo {
            println!("{}", render_text(kind.title(), &table));
        }

        let date = now.with_timezone(&Local).date_naive();
        emit(&table, &self.config.output_dir, date, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::ScriptedTransport;
    use crate::error::ReportError;
    use chrono::TimeZone;
    use serde_json::json;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            credentials: None,
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            output_dir: dir.to_path_buf(),
        }
    }

    fn people() -> serde_json::Value {
        json!({"list": [
            {"email": "a@example.com", "smart_groups": ["fah-faculty-of-arts-humanities"], "last_seen": "2026-05-30T00:00:00Z"},
            {"email": "b@example.com", "smart_groups": ["fah-faculty-of-arts-humanities"], "engaged_at": "2025-01-01T00:00:00Z"},
            {"email": "c@example.com", "smart_groups": ["fah-faculty-of-arts-humanities"], "last_seen": "not a date"},
            {"email": "", "smart_groups": ["fah-faculty-of-arts-humanities"]}
        ]})
    }

    #[test]
    fn generates_faculty_report_from_fetched_contacts() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ReportRunner::new(config(dir.path()), ReportFormat::Csv).quiet();
        let client = EcosendClient::new(ScriptedTransport::new(vec![Ok(people())]));
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();

        let path = runner
            .generate_with(&client, ReportKind::FacultyActivity, now)
            .unwrap();

        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_faculty_activity.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("Faculty,Total Members,Active Members,Active %")
        );
        assert_eq!(
            lines.next(),
            Some("FAH (Faculty of Arts & Humanities),3,1,33.33%")
        );
    }

    #[test]
    fn transport_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ReportRunner::new(config(dir.path()), ReportFormat::Csv).quiet();
        let client = EcosendClient::new(ScriptedTransport::new(vec![Err(ReportError::Status {
            endpoint: "people".to_string(),
            status: reqwest::StatusCode::UNAUTHORIZED,
        })]));

        let result = runner.generate_with(&client, ReportKind::UosActivity, Utc::now());
        assert!(matches!(result, Err(ReportError::Status { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_credentials_fail_each_report() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ReportRunner::new(config(dir.path()), ReportFormat::Csv).quiet();

        assert!(matches!(
            runner.faculty_activity(),
            Err(ReportError::MissingCredentials(_))
        ));
        assert!(matches!(
            runner.membership_breakdown(),
            Err(ReportError::MissingCredentials(_))
        ));
        assert!(matches!(
            runner.hub_activity(),
            Err(ReportError::MissingCredentials(_))
        ));
        assert!(matches!(
            runner.uos_activity(),
            Err(ReportError::MissingCredentials(_))
        ));
    }
}
