use serde::Serialize;

use ndr_model::{IssueReport, IssueSeverity};

/// Result of checking one document.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub file_name: String,
    /// Hex SHA-256 of the document bytes.
    pub sha256: String,
    pub error_count: usize,
    pub warning_count: usize,
    pub issues: Vec<IssueEntry>,
}

/// One issue in rule order.
#[derive(Debug, Clone, Serialize)]
pub struct IssueEntry {
    pub rule_id: &'static str,
    pub severity: IssueSeverity,
    pub message: String,
}

impl CheckReport {
    pub fn new(file_name: String, sha256: String, report: &IssueReport) -> Self {
        Self {
            file_name,
            sha256,
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            issues: report
                .issues
                .iter()
                .map(|issue| IssueEntry {
                    rule_id: issue.rule_id(),
                    severity: issue.severity(),
                    message: issue.to_string(),
                })
                .collect(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Process exit code for this report.
    pub fn exit_code(&self, warnings_as_errors: bool) -> i32 {
        if self.has_errors() || (warnings_as_errors && self.warning_count > 0) {
            1
        } else {
            0
        }
    }
}
