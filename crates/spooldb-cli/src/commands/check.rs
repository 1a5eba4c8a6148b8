//! Integrity check over the data and store trees.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use spooldb_core::AppError;
use spooldb_core::config::AppConfig;
use spooldb_service::{IntegrityChecker, IntegrityChecks, IntegrityIssue};

use crate::output::{self, OutputFormat};

/// Arguments for the check command. Without flags every check runs.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Marker files present and valid JSON
    #[arg(long)]
    pub markers: bool,

    /// Folder names match the slug of their identity field
    #[arg(long)]
    pub folder_names: bool,

    /// Purchase links reference existing store ids
    #[arg(long)]
    pub store_ids: bool,
}

impl CheckArgs {
    fn checks(&self) -> IntegrityChecks {
        IntegrityChecks::select(self.markers, self.folder_names, self.store_ids)
    }
}

/// Issue display row
#[derive(Debug, Serialize, Tabled)]
struct IssueRow {
    kind: String,
    path: String,
    message: String,
}

impl From<&IntegrityIssue> for IssueRow {
    fn from(issue: &IntegrityIssue) -> Self {
        Self {
            kind: issue.kind.to_string(),
            path: issue.path.clone(),
            message: issue.message.clone(),
        }
    }
}

/// Execute the check command; fails when any issue is found.
pub async fn execute(
    args: &CheckArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (data, stores) = super::open_roots(config);
    let report = IntegrityChecker::new(data, stores)
        .check(args.checks())
        .await?;
    debug!(checked = report.checked, issues = report.issues.len(), "Integrity check finished");

    if report.is_clean() {
        if format == OutputFormat::Json {
            output::print_item(&report, format);
        } else {
            output::print_success(&format!(
                "No issues found in {} directories",
                report.checked
            ));
        }
        return Ok(());
    }

    let rows: Vec<IssueRow> = report.issues.iter().map(IssueRow::from).collect();
    output::print_list(&rows, format);
    output::print_warning(&format!(
        "{} issue(s) in {} directories",
        report.issues.len(),
        report.checked
    ));
    Err(AppError::validation("Integrity check failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.catalog.data_root = dir.join("data").display().to_string();
        config.catalog.stores_root = dir.join("stores").display().to_string();
        config
    }

    fn write(path: std::path::PathBuf, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_clean_tree_passes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("data/Acme/brand.json"), r#"{"brand":"Acme"}"#);
        std::fs::create_dir_all(dir.path().join("stores")).unwrap();

        let args = CheckArgs {
            markers: false,
            folder_names: false,
            store_ids: false,
        };
        execute(&args, &config_for(dir.path()), OutputFormat::Json)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("data/Acme/brand.json"), r#"{"brand":"Acme Corp"}"#);
        std::fs::create_dir_all(dir.path().join("stores")).unwrap();

        let args = CheckArgs {
            markers: false,
            folder_names: true,
            store_ids: false,
        };
        let err = execute(&args, &config_for(dir.path()), OutputFormat::Table)
            .await
            .unwrap_err();
        assert_eq!(err.kind, spooldb_core::ErrorKind::Validation);
    }
}
