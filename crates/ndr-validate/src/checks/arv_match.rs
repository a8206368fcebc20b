//! ARV code match between an encounter and the ART regimen on its date.

use ndr_model::{Issue, NdrRecord};

pub fn check(record: &NdrRecord) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (visit_date, encounter) in &record.encounters {
        let Some(regimen) = record.regimens.get(visit_date) else {
            continue;
        };
        if !regimen.is_art() {
            continue;
        }
        let Some(encounter_code) = encounter.arv_code.as_deref().filter(|code| !code.is_empty())
        else {
            continue;
        };
        if !regimen.code.is_empty() && encounter_code != regimen.code {
            issues.push(Issue::ArvMismatch {
                visit_date: visit_date.clone(),
                encounter_code: encounter_code.to_string(),
                regimen_code: regimen.code.clone(),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use ndr_model::{Encounter, Regimen};

    use super::*;

    fn record(arv: Option<&str>, code: &str, type_code: &str) -> NdrRecord {
        let mut record = NdrRecord::default();
        record.insert_encounter(
            "2024-01-10".to_string(),
            Encounter {
                arv_code: arv.map(str::to_string),
                tb_status: None,
            },
        );
        record.insert_regimen(
            "2024-01-10".to_string(),
            Regimen {
                code: code.to_string(),
                type_code: Some(type_code.to_string()),
                ..Regimen::default()
            },
        );
        record
    }

    #[test]
    fn flags_differing_codes_on_art_regimen() {
        assert_eq!(
            check(&record(Some("TDF+3TC+DTG"), "AZT+3TC+NVP", "ART")),
            vec![Issue::ArvMismatch {
                visit_date: "2024-01-10".to_string(),
                encounter_code: "TDF+3TC+DTG".to_string(),
                regimen_code: "AZT+3TC+NVP".to_string(),
            }]
        );
    }

    #[test]
    fn ignores_matching_codes_and_non_art_regimens() {
        assert!(check(&record(Some("TDF+3TC+DTG"), "TDF+3TC+DTG", "ART")).is_empty());
        assert!(check(&record(Some("TDF+3TC+DTG"), "INH", "TB")).is_empty());
    }

    #[test]
    fn ignores_missing_codes() {
        assert!(check(&record(None, "AZT+3TC+NVP", "ART")).is_empty());
        assert!(check(&record(Some("TDF+3TC+DTG"), "", "ART")).is_empty());
    }
}
