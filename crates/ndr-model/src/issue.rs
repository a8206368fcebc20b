//! Data-quality issue types.
//!
//! Each [`Issue`] variant carries only the data its message needs. The
//! `Display` form is the user-facing line: a severity marker followed by
//! the description.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Blocks data quality; the record should be fixed before submission.
    Error,
    /// Degraded confidence; a rule could not be evaluated.
    Warning,
}

impl IssueSeverity {
    /// Marker printed in front of every issue line.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Error => "❌",
            Self::Warning => "⚠️",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// A finding produced by the rule battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// Encounter has no ARV regimen code.
    MissingArvRegimen { visit_date: String },
    /// Encounter had no visit date.
    MissingVisitDate,
    /// Encounter precedes the ART start date.
    EncounterBeforeArtStart { visit_date: String, art_start: String },
    /// TB positive encounter in a record without any IPT regimen.
    TbWithoutIpt { visit_date: String },
    /// Lab report lacks a test identifier or collection date.
    IncompleteLabReport { visit_date: String },
    /// Regimen longer than 30 days without multi-month dispensing.
    MissingMmd { visit_date: String },
    /// Encounter ARV code differs from the ART regimen code on that date.
    ArvMismatch {
        visit_date: String,
        encounter_code: String,
        regimen_code: String,
    },
    /// Reported age is more than a year off the age derived from dates.
    AgeMismatch {
        reported_age: String,
        calculated_age: i64,
    },
    /// Date of birth, report date or reported age could not be parsed.
    AgeUnverifiable,
}

impl Issue {
    /// Rule identifier, as listed in [`crate::rules::RULES`].
    pub fn rule_id(&self) -> &'static str {
        match self {
            Issue::MissingArvRegimen { .. } => "NDR001",
            Issue::MissingVisitDate => "NDR002",
            Issue::EncounterBeforeArtStart { .. } => "NDR003",
            Issue::TbWithoutIpt { .. } => "NDR004",
            Issue::IncompleteLabReport { .. } => "NDR005",
            Issue::MissingMmd { .. } => "NDR006",
            Issue::ArvMismatch { .. } => "NDR007",
            Issue::AgeMismatch { .. } => "NDR008",
            Issue::AgeUnverifiable => "NDR009",
        }
    }

    pub fn severity(&self) -> IssueSeverity {
        match self {
            Issue::AgeUnverifiable => IssueSeverity::Warning,
            _ => IssueSeverity::Error,
        }
    }

    /// Description without the severity marker.
    pub fn description(&self) -> String {
        match self {
            Issue::MissingArvRegimen { visit_date } => {
                format!("Missing ARV regimen in encounter on {visit_date}.")
            }
            Issue::MissingVisitDate => "Missing VisitDate in an encounter.".to_string(),
            Issue::EncounterBeforeArtStart {
                visit_date,
                art_start,
            } => format!("Encounter on {visit_date} before ARTStartDate {art_start}."),
            Issue::TbWithoutIpt { visit_date } => {
                format!("TB positive on {visit_date}, but no IPT regimen found.")
            }
            Issue::IncompleteLabReport { visit_date } => {
                format!("Lab report on {visit_date} missing test ID or collection date.")
            }
            Issue::MissingMmd { visit_date } => {
                format!("Regimen on {visit_date} has duration >30 but no MMD.")
            }
            Issue::ArvMismatch {
                visit_date,
                encounter_code,
                regimen_code,
            } => format!(
                "ARV mismatch on {visit_date}: Encounter={encounter_code}, Regimen={regimen_code}"
            ),
            Issue::AgeMismatch {
                reported_age,
                calculated_age,
            } => format!(
                "Reported age {reported_age} does not match calculated age {calculated_age}."
            ),
            Issue::AgeUnverifiable => {
                "Could not validate DateOfBirth or age due to format issues.".to_string()
            }
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity().marker(), self.description())
    }
}

/// Ordered issues for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    pub issues: Vec<Issue>,
}

impl IssueReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn error_count(&self) -> usize {
        self.count(IssueSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(IssueSeverity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// User-facing lines in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    fn count(&self, severity: IssueSeverity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .count()
    }
}
