//! Lab report completeness.

use ndr_model::{Issue, NdrRecord};

pub fn check(record: &NdrRecord) -> Vec<Issue> {
    record
        .labs
        .iter()
        .filter(|(_, lab)| !lab.is_complete())
        .map(|(visit_date, _)| Issue::IncompleteLabReport {
            visit_date: visit_date.clone(),
        })
        .collect()
}
