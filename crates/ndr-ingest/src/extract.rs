//! Record extraction from an NDR document.
//!
//! Sections and repeated entities are located at any depth below the root,
//! since report versions nest them differently. Fields are read from the
//! first matching child; a missing field is an absent value, never an error.

use tracing::debug;

use ndr_model::{Encounter, LabReport, NdrRecord, Regimen, parse_ndr_date, visit_key};

use crate::error::Result;
use crate::tree::{XmlElement, parse_document};

const PATIENT_DEMOGRAPHICS: &str = "PatientDemographics";
const COMMON_QUESTIONS: &str = "CommonQuestions";
const HIV_QUESTIONS: &str = "HIVQuestions";
const REGIMEN: &str = "Regimen";
const HIV_ENCOUNTER: &str = "HIVEncounter";
const LABORATORY_REPORT: &str = "LaboratoryReport";

const VISIT_DATE: &str = "VisitDate";

/// Parse a document and extract its normalized record.
///
/// # Errors
///
/// Returns an [`crate::ExtractError`] when the document is not well-formed.
pub fn extract(document: &[u8]) -> Result<NdrRecord> {
    let root = parse_document(document)?;
    Ok(extract_record(&root))
}

/// Extract the normalized record from a parsed document.
pub fn extract_record(root: &XmlElement) -> NdrRecord {
    let mut record = NdrRecord::default();

    if let Some(demographics) = root.find_descendant(PATIENT_DEMOGRAPHICS) {
        record.patient.date_of_birth = field(demographics, "PatientDateOfBirth");
    }

    if let Some(common) = root.find_descendant(COMMON_QUESTIONS) {
        record.patient.reported_age = field(common, "PatientAge");
        record.patient.report_date = field(common, "DateOfLastReport");
    }

    if let Some(hiv) = root.find_descendant(HIV_QUESTIONS)
        && let Some(art_start) = field(hiv, "ARTStartDate")
    {
        record.art_start = parse_ndr_date(&art_start);
        if record.art_start.is_none() {
            debug!("ARTStartDate is not a YYYY-MM-DD date, ignoring it");
        }
    }

    for element in root.find_all_descendants(REGIMEN) {
        let regimen = Regimen {
            code: element
                .find_text("PrescribedRegimen/Code")
                .unwrap_or_default()
                .to_string(),
            type_code: field(element, "PrescribedRegimenTypeCode"),
            mmd: field(element, "MultiMonthDispensing"),
            dsd: field(element, "DifferentiatedServiceDelivery"),
            duration: field(element, "PrescribedRegimenDuration"),
        };
        record.insert_regimen(visit_key(element.find_text(VISIT_DATE)), regimen);
    }

    for element in root.find_all_descendants(HIV_ENCOUNTER) {
        let encounter = Encounter {
            arv_code: field(element, "ARVDrugRegimen/Code"),
            tb_status: field(element, "TBStatus"),
        };
        record.insert_encounter(visit_key(element.find_text(VISIT_DATE)), encounter);
    }

    for element in root.find_all_descendants(LABORATORY_REPORT) {
        let lab = LabReport {
            test_id: field(element, "LaboratoryTestIdentifier"),
            collection_date: field(element, "CollectionDate"),
        };
        record.insert_lab(visit_key(element.find_text(VISIT_DATE)), lab);
    }

    debug!(
        encounters = record.encounters.len(),
        regimens = record.regimens.len(),
        labs = record.labs.len(),
        ipt_dates = record.ipt_dates.len(),
        has_art_start = record.art_start.is_some(),
        "record extracted"
    );
    record
}

/// Non-empty text of the first element at `path`.
fn field(element: &XmlElement, path: &str) -> Option<String> {
    element
        .find_text(path)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
