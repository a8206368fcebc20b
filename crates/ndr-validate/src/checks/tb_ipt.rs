//! TB/IPT cross-check.
//!
//! A TB positive encounter requires an IPT regimen somewhere in the record.
//! The IPT regimen does not need to share the encounter's visit date.

use ndr_model::{Issue, NdrRecord};

pub fn check(record: &NdrRecord) -> Vec<Issue> {
    if !record.ipt_dates.is_empty() {
        return Vec::new();
    }

    record
        .tb_positive_dates()
        .into_iter()
        .map(|visit_date| Issue::TbWithoutIpt {
            visit_date: visit_date.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ndr_model::{Encounter, Regimen};

    use super::*;

    fn tb_record(statuses: &[(&str, &str)]) -> NdrRecord {
        let mut record = NdrRecord::default();
        for (date, status) in statuses {
            record.insert_encounter(
                (*date).to_string(),
                Encounter {
                    arv_code: Some("TDF+3TC+DTG".to_string()),
                    tb_status: Some((*status).to_string()),
                },
            );
        }
        record
    }

    #[test]
    fn flags_each_tb_positive_date_without_ipt() {
        let record = tb_record(&[("2024-03-01", "1"), ("2024-04-01", "0"), ("2024-05-01", "1")]);
        assert_eq!(
            check(&record),
            vec![
                Issue::TbWithoutIpt {
                    visit_date: "2024-03-01".to_string()
                },
                Issue::TbWithoutIpt {
                    visit_date: "2024-05-01".to_string()
                },
            ]
        );
    }

    #[test]
    fn ipt_on_any_date_satisfies_the_check() {
        let mut record = tb_record(&[("2024-03-01", "1")]);
        record.insert_regimen(
            "2023-01-01".to_string(),
            Regimen {
                code: "INH".to_string(),
                ..Regimen::default()
            },
        );
        assert!(check(&record).is_empty());
    }
}
