//! Consistency rules for normalized NDR records.
//!
//! [`validate`] runs the rule battery in a fixed order and returns every
//! finding in one flat list. Validation never fails.

pub mod checks;

use tracing::{debug, info_span};

use ndr_model::{Issue, IssueReport, NdrRecord};

/// Run the rule battery over a record.
pub fn validate(record: &NdrRecord) -> Vec<Issue> {
    let span = info_span!(
        "validate",
        encounters = record.encounters.len(),
        regimens = record.regimens.len(),
        labs = record.labs.len()
    );
    let _guard = span.enter();
    let issues = checks::run_all(record);
    debug!(issue_count = issues.len(), "validation complete");
    issues
}

/// Run the rule battery and wrap the findings in a report.
pub fn validate_report(record: &NdrRecord) -> IssueReport {
    IssueReport::new(validate(record))
}
