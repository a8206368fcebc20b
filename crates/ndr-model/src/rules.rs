//! Catalog of the rule battery, in evaluation order.

use serde::Serialize;

use crate::issue::IssueSeverity;

/// Description of one rule for the rules guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub id: &'static str,
    pub severity: IssueSeverity,
    pub summary: &'static str,
}

pub const RULES: &[RuleInfo] = &[
    RuleInfo {
        id: "NDR001",
        severity: IssueSeverity::Error,
        summary: "Each encounter must have an ARV regimen specified.",
    },
    RuleInfo {
        id: "NDR002",
        severity: IssueSeverity::Error,
        summary: "Each encounter must have a VisitDate.",
    },
    RuleInfo {
        id: "NDR003",
        severity: IssueSeverity::Error,
        summary: "ART start date should not be after any encounter visit dates.",
    },
    RuleInfo {
        id: "NDR004",
        severity: IssueSeverity::Error,
        summary: "If TB positive status is present, an IPT regimen must be included.",
    },
    RuleInfo {
        id: "NDR005",
        severity: IssueSeverity::Error,
        summary: "Lab reports must include test ID and collection date.",
    },
    RuleInfo {
        id: "NDR006",
        severity: IssueSeverity::Error,
        summary: "Regimens with duration greater than 30 days must have MultiMonthDispensing (MMD) specified.",
    },
    RuleInfo {
        id: "NDR007",
        severity: IssueSeverity::Error,
        summary: "ARV codes in encounters must match the prescribed ART regimen codes.",
    },
    RuleInfo {
        id: "NDR008",
        severity: IssueSeverity::Error,
        summary: "Reported patient age must be within one year of the age derived from date of birth and report date.",
    },
    RuleInfo {
        id: "NDR009",
        severity: IssueSeverity::Warning,
        summary: "Date of birth, report date and reported age must be parseable to check age.",
    },
];

/// Look up a rule by id.
pub fn rule_info(id: &str) -> Option<&'static RuleInfo> {
    RULES.iter().find(|rule| rule.id == id)
}
