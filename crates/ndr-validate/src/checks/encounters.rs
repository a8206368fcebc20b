//! Encounter completeness.
//!
//! Every encounter needs an ARV regimen code and a visit date. Date-less
//! encounters were collapsed into the sentinel key during extraction, so at
//! most one missing-date issue is reported.

use ndr_model::{Issue, NdrRecord, UNKNOWN_VISIT_DATE};

pub fn check(record: &NdrRecord) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (visit_date, encounter) in &record.encounters {
        if encounter.arv_code.as_deref().is_none_or(str::is_empty) {
            issues.push(Issue::MissingArvRegimen {
                visit_date: visit_date.clone(),
            });
        }
        if visit_date == UNKNOWN_VISIT_DATE {
            issues.push(Issue::MissingVisitDate);
        }
    }

    issues
}
