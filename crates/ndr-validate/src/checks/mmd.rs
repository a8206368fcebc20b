//! Multi-month dispensing requirement.
//!
//! Regimens dispensed for more than 30 days need an MMD flag. A missing
//! duration counts as zero; a duration that is not an integer is skipped.

use ndr_model::{Issue, NdrRecord, Regimen, parse_integer};

/// Longest duration, in days, that does not require MMD.
pub const MMD_THRESHOLD_DAYS: i64 = 30;

pub fn check(record: &NdrRecord) -> Vec<Issue> {
    record
        .regimens
        .iter()
        .filter(|(_, regimen)| requires_mmd(regimen) && !regimen.has_mmd())
        .map(|(visit_date, _)| Issue::MissingMmd {
            visit_date: visit_date.clone(),
        })
        .collect()
}

fn requires_mmd(regimen: &Regimen) -> bool {
    let duration = match regimen.duration.as_deref() {
        None | Some("") => Some(0),
        Some(value) => parse_integer(value),
    };
    duration.is_some_and(|days| days > MMD_THRESHOLD_DAYS)
}
