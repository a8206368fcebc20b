pub mod issue;
pub mod parse;
pub mod record;
pub mod rules;

pub use issue::{Issue, IssueReport, IssueSeverity};
pub use parse::{NDR_DATE_FORMAT, age_in_years, parse_integer, parse_ndr_date};
pub use record::{
    ART_REGIMEN_TYPE, Encounter, IPT_MARKER, LabReport, NdrRecord, PatientInfo, Regimen,
    TB_POSITIVE, UNKNOWN_VISIT_DATE, VisitMap, visit_key,
};
pub use rules::{RULES, RuleInfo, rule_info};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_report_counts() {
        let report = IssueReport::new(vec![
            Issue::MissingArvRegimen {
                visit_date: "2024-01-10".to_string(),
            },
            Issue::AgeUnverifiable,
        ]);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn every_issue_has_a_catalog_entry() {
        let issues = [
            Issue::MissingArvRegimen {
                visit_date: String::new(),
            },
            Issue::MissingVisitDate,
            Issue::EncounterBeforeArtStart {
                visit_date: String::new(),
                art_start: String::new(),
            },
            Issue::TbWithoutIpt {
                visit_date: String::new(),
            },
            Issue::IncompleteLabReport {
                visit_date: String::new(),
            },
            Issue::MissingMmd {
                visit_date: String::new(),
            },
            Issue::ArvMismatch {
                visit_date: String::new(),
                encounter_code: String::new(),
                regimen_code: String::new(),
            },
            Issue::AgeMismatch {
                reported_age: String::new(),
                calculated_age: 0,
            },
            Issue::AgeUnverifiable,
        ];
        for issue in issues {
            let info = rule_info(issue.rule_id()).expect("rule listed");
            assert_eq!(info.severity, issue.severity());
        }
        assert_eq!(RULES.len(), 9);
    }
}
