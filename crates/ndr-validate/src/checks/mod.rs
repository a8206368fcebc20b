//! Rule check modules.
//!
//! Each module evaluates one rule over the normalized record. Checks are
//! independent and never fail: unparseable values are skipped, except in the
//! age check which reports them as a warning.

pub mod age;
pub mod art_start;
pub mod arv_match;
pub mod encounters;
pub mod labs;
pub mod mmd;
pub mod tb_ipt;

use tracing::debug;

use ndr_model::{Issue, NdrRecord};

/// Run every check in battery order.
pub fn run_all(record: &NdrRecord) -> Vec<Issue> {
    let checks: [(&str, fn(&NdrRecord) -> Vec<Issue>); 7] = [
        ("encounter completeness", encounters::check),
        ("ART start ordering", art_start::check),
        ("TB/IPT cross-check", tb_ipt::check),
        ("lab completeness", labs::check),
        ("MMD requirement", mmd::check),
        ("ARV/regimen match", arv_match::check),
        ("age consistency", age::check),
    ];

    let mut issues = Vec::new();
    for (name, check) in checks {
        let found = check(record);
        debug!(check = name, issue_count = found.len(), "check complete");
        issues.extend(found);
    }
    issues
}
