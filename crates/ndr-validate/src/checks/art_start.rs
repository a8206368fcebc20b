//! ART start ordering.
//!
//! No encounter may precede the ART start date. Encounter dates that do not
//! parse, including the sentinel key, are skipped.

use ndr_model::{Issue, NdrRecord, parse_ndr_date};

pub fn check(record: &NdrRecord) -> Vec<Issue> {
    let Some(art_start) = record.art_start else {
        return Vec::new();
    };

    record
        .encounters
        .keys()
        .filter(|visit_date| parse_ndr_date(visit_date).is_some_and(|date| date < art_start))
        .map(|visit_date| Issue::EncounterBeforeArtStart {
            visit_date: visit_date.clone(),
            art_start: art_start.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ndr_model::{Encounter, UNKNOWN_VISIT_DATE};

    use super::*;

    fn record_with(dates: &[&str], art_start: Option<NaiveDate>) -> NdrRecord {
        let mut record = NdrRecord {
            art_start,
            ..NdrRecord::default()
        };
        for date in dates {
            record.insert_encounter((*date).to_string(), Encounter::default());
        }
        record
    }

    #[test]
    fn flags_encounters_strictly_before_start() {
        let record = record_with(
            &["2024-01-15", "2024-02-01", "2024-03-01"],
            NaiveDate::from_ymd_opt(2024, 2, 1),
        );
        assert_eq!(
            check(&record),
            vec![Issue::EncounterBeforeArtStart {
                visit_date: "2024-01-15".to_string(),
                art_start: "2024-02-01".to_string(),
            }]
        );
    }

    #[test]
    fn skips_unparseable_dates() {
        let record = record_with(
            &[UNKNOWN_VISIT_DATE, "15/01/2024"],
            NaiveDate::from_ymd_opt(2024, 2, 1),
        );
        assert!(check(&record).is_empty());
    }

    #[test]
    fn no_start_date_means_no_issues() {
        let record = record_with(&["2000-01-01"], None);
        assert!(check(&record).is_empty());
    }
}
