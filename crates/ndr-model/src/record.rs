//! Normalized NDR patient record.
//!
//! The extractor builds one [`NdrRecord`] per document. Every repeated
//! entity is keyed by its literal visit-date string and stored in an
//! insertion-ordered map, so rule evaluation follows document order.
//!
//! Entities sharing a visit date collapse into one entry: the later entity
//! replaces the earlier value while the key keeps its first position.
//! Entities without a visit date all share [`UNKNOWN_VISIT_DATE`].

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};

/// Sentinel key for entities whose visit date is missing or empty.
pub const UNKNOWN_VISIT_DATE: &str = "Unknown";

/// TB status code that marks a positive screening.
pub const TB_POSITIVE: &str = "1";

/// Regimen type code that marks an antiretroviral regimen.
pub const ART_REGIMEN_TYPE: &str = "ART";

/// Substring that marks an isoniazid preventive therapy regimen code.
pub const IPT_MARKER: &str = "INH";

/// Visit-date keyed collection preserving document order.
pub type VisitMap<T> = IndexMap<String, T>;

/// Patient-level fields, kept as reported.
///
/// Values stay unparsed; the age consistency rule parses them and turns any
/// failure into a warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientInfo {
    /// `PatientDateOfBirth` from the demographics section.
    pub date_of_birth: Option<String>,
    /// `PatientAge` from the common questions section.
    pub reported_age: Option<String>,
    /// `DateOfLastReport` from the common questions section.
    pub report_date: Option<String>,
}

/// An HIV encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encounter {
    /// Prescribed ARV regimen code.
    pub arv_code: Option<String>,
    /// TB status code.
    pub tb_status: Option<String>,
}

impl Encounter {
    pub fn is_tb_positive(&self) -> bool {
        self.tb_status.as_deref() == Some(TB_POSITIVE)
    }
}

/// A prescribed regimen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regimen {
    /// Prescribed regimen code, empty when absent.
    pub code: String,
    pub type_code: Option<String>,
    /// Multi-month dispensing flag.
    pub mmd: Option<String>,
    /// Differentiated service delivery marker. Not used by any rule.
    pub dsd: Option<String>,
    /// Duration in days, unparsed.
    pub duration: Option<String>,
}

impl Regimen {
    pub fn is_art(&self) -> bool {
        self.type_code.as_deref() == Some(ART_REGIMEN_TYPE)
    }

    pub fn has_mmd(&self) -> bool {
        self.mmd.as_deref().is_some_and(|value| !value.is_empty())
    }

    /// Substring match, so any code containing `INH` counts.
    pub fn is_ipt(&self) -> bool {
        self.code.to_uppercase().contains(IPT_MARKER)
    }
}

/// A laboratory report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabReport {
    pub test_id: Option<String>,
    pub collection_date: Option<String>,
}

impl LabReport {
    pub fn is_complete(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        present(&self.test_id) && present(&self.collection_date)
    }
}

/// The normalized record consumed by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NdrRecord {
    pub patient: PatientInfo,
    pub encounters: VisitMap<Encounter>,
    pub regimens: VisitMap<Regimen>,
    pub labs: VisitMap<LabReport>,
    /// ART start date; absent when missing or not a valid `YYYY-MM-DD` date.
    pub art_start: Option<NaiveDate>,
    /// Visit dates of regimens whose code carries the IPT marker.
    pub ipt_dates: IndexSet<String>,
}

impl NdrRecord {
    /// Insert an encounter, replacing any earlier one on the same date.
    pub fn insert_encounter(&mut self, visit_date: String, encounter: Encounter) {
        self.encounters.insert(visit_date, encounter);
    }

    /// Insert a regimen, replacing any earlier one on the same date, and
    /// record the date when the regimen is an IPT regimen.
    pub fn insert_regimen(&mut self, visit_date: String, regimen: Regimen) {
        if regimen.is_ipt() {
            self.ipt_dates.insert(visit_date.clone());
        }
        self.regimens.insert(visit_date, regimen);
    }

    /// Insert a lab report, replacing any earlier one on the same date.
    pub fn insert_lab(&mut self, visit_date: String, lab: LabReport) {
        self.labs.insert(visit_date, lab);
    }

    /// Visit dates of encounters with a positive TB status, in order.
    pub fn tb_positive_dates(&self) -> Vec<&str> {
        self.encounters
            .iter()
            .filter(|(_, encounter)| encounter.is_tb_positive())
            .map(|(date, _)| date.as_str())
            .collect()
    }
}

/// Normalize a visit date, mapping missing or empty values to the sentinel.
pub fn visit_key(visit_date: Option<&str>) -> String {
    match visit_date {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => UNKNOWN_VISIT_DATE.to_string(),
    }
}
