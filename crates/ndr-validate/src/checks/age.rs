//! Age consistency.
//!
//! The reported age must be within one year of the age derived from the
//! date of birth and the report date. Unlike the other checks, a value that
//! cannot be parsed is reported as a warning rather than skipped.

use ndr_model::{Issue, NdrRecord, PatientInfo, age_in_years, parse_integer, parse_ndr_date};

/// Largest accepted difference, in years, between reported and derived age.
pub const AGE_TOLERANCE_YEARS: u64 = 1;

pub fn check(record: &NdrRecord) -> Vec<Issue> {
    match compare_age(&record.patient) {
        Some(issue) => issue.into_iter().collect(),
        None => vec![Issue::AgeUnverifiable],
    }
}

/// `None` when any input is missing or malformed; `Some(None)` when the
/// ages agree.
fn compare_age(patient: &PatientInfo) -> Option<Option<Issue>> {
    let birth = parse_ndr_date(patient.date_of_birth.as_deref()?)?;
    let report = parse_ndr_date(patient.report_date.as_deref()?)?;
    let calculated_age = age_in_years(birth, report);
    let reported = patient.reported_age.as_deref()?;
    let reported_age = parse_integer(reported)?;

    if reported_age.abs_diff(calculated_age) > AGE_TOLERANCE_YEARS {
        return Some(Some(Issue::AgeMismatch {
            reported_age: reported.to_string(),
            calculated_age,
        }));
    }
    Some(None)
}
