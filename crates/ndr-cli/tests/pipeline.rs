//! Integration tests for the pipeline module.

use std::fs;
use std::path::Path;

use ndr_cli::pipeline::{
    CheckError, INVALID_FILE_TYPE_MESSAGE, PARSE_FAILURE_MESSAGE, check_document,
    check_document_messages, check_file, document_sha256,
};
use ndr_model::Issue;

const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Container>
  <IndividualReport>
    <PatientDemographics>
      <PatientDateOfBirth>2000-06-15</PatientDateOfBirth>
    </PatientDemographics>
    <Condition>
      <CommonQuestions>
        <PatientAge>23</PatientAge>
        <DateOfLastReport>2024-06-10</DateOfLastReport>
      </CommonQuestions>
      <ConditionSpecificQuestions>
        <HIVQuestions>
          <ARTStartDate>2024-02-01</ARTStartDate>
        </HIVQuestions>
      </ConditionSpecificQuestions>
      <Encounters>
        <HIVEncounter>
          <VisitDate>2024-01-15</VisitDate>
          <ARVDrugRegimen><Code>TDF+3TC+DTG</Code></ARVDrugRegimen>
          <TBStatus>0</TBStatus>
        </HIVEncounter>
        <HIVEncounter>
          <VisitDate>2024-03-01</VisitDate>
          <ARVDrugRegimen><Code>TDF+3TC+DTG</Code></ARVDrugRegimen>
          <TBStatus>1</TBStatus>
        </HIVEncounter>
      </Encounters>
      <Regimen>
        <VisitDate>2024-03-01</VisitDate>
        <PrescribedRegimen><Code>TDF+3TC+DTG</Code></PrescribedRegimen>
        <PrescribedRegimenTypeCode>ART</PrescribedRegimenTypeCode>
        <PrescribedRegimenDuration>90</PrescribedRegimenDuration>
        <MultiMonthDispensing>MMD3</MultiMonthDispensing>
      </Regimen>
      <LaboratoryReport>
        <VisitDate>2024-03-01</VisitDate>
        <LaboratoryTestIdentifier>80</LaboratoryTestIdentifier>
        <CollectionDate>2024-03-01</CollectionDate>
      </LaboratoryReport>
    </Condition>
  </IndividualReport>
</Container>
"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn check_document_reports_issues_in_rule_order() {
    let messages = check_document_messages(RECORD.as_bytes()).expect("well-formed");
    insta::assert_snapshot!(messages.join("\n"), @r"
    ❌ Encounter on 2024-01-15 before ARTStartDate 2024-02-01.
    ❌ TB positive on 2024-03-01, but no IPT regimen found.
    ");
}

#[test]
fn check_document_is_idempotent() {
    let first = check_document(RECORD.as_bytes()).expect("well-formed");
    let second = check_document(RECORD.as_bytes()).expect("well-formed");
    assert_eq!(first, second);
}

#[test]
fn malformed_document_yields_no_issue_list() {
    let truncated = &RECORD[..RECORD.len() / 2];
    assert!(check_document(truncated.as_bytes()).is_err());
}

#[test]
fn empty_container_only_warns_about_age() {
    let issues = check_document(b"<Container></Container>").expect("well-formed");
    assert_eq!(issues, vec![Issue::AgeUnverifiable]);
}

#[test]
fn check_file_builds_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(dir.path(), "record.XML", RECORD);

    let report = check_file(&path).expect("checked");

    assert_eq!(report.file_name, "record.XML");
    assert_eq!(report.sha256, document_sha256(RECORD.as_bytes()));
    assert_eq!(report.error_count, 2);
    assert_eq!(report.warning_count, 0);
    assert_eq!(report.exit_code(false), 1);

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["issues"][0]["rule_id"], "NDR003");
    assert_eq!(json["issues"][0]["severity"], "error");
    assert_eq!(json["issues"][1]["rule_id"], "NDR004");
}

#[test]
fn check_file_rejects_other_extensions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(dir.path(), "record.zip", RECORD);

    let error = check_file(&path).expect_err("rejected");
    assert!(matches!(error, CheckError::InvalidFileType { .. }));
    assert_eq!(error.to_string(), INVALID_FILE_TYPE_MESSAGE);
}

#[test]
fn check_file_reports_parse_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(dir.path(), "broken.xml", "<Container><HIVEncounter></Container>");

    let error = check_file(&path).expect_err("parse failure");
    assert!(matches!(error, CheckError::Parse(_)));
    assert_eq!(error.to_string(), PARSE_FAILURE_MESSAGE);
}

#[test]
fn check_file_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let error = check_file(&dir.path().join("absent.xml")).expect_err("missing");
    assert!(matches!(error, CheckError::Read { .. }));
    assert!(
        error
            .to_string()
            .starts_with("❌ An unexpected error occurred:")
    );
}

#[test]
fn warnings_only_report_exit_codes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(dir.path(), "empty.xml", "<Container/>");

    let report = check_file(&path).expect("checked");
    assert!(!report.has_errors());
    assert_eq!(report.warning_count, 1);
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 1);
}
