use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use ndr_cli::pipeline::XML_EXTENSION;
use ndr_cli::types::CheckReport;
use ndr_model::{IssueSeverity, RuleInfo};

use crate::cli::ReportFormatArg;

pub fn print_report(report: &CheckReport, format: ReportFormatArg) -> Result<()> {
    match format {
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(report).context("serialize report")?;
            println!("{json}");
        }
        ReportFormatArg::Text => print_text_report(report),
    }
    Ok(())
}

fn print_text_report(report: &CheckReport) {
    println!("File: {}", report.file_name);
    println!("SHA-256: {}", report.sha256);
    if report.issues.is_empty() {
        println!("No issues found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Rule"),
        header_cell("Severity"),
        header_cell("Issue"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for (index, issue) in report.issues.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(issue.rule_id),
            severity_cell(issue.severity),
            Cell::new(&issue.message),
        ]);
    }
    println!("{table}");
    println!(
        "Errors: {}  Warnings: {}",
        report.error_count, report.warning_count
    );
}

pub fn print_rules(rules: &[RuleInfo]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Severity"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for rule in rules {
        table.add_row(vec![
            Cell::new(rule.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            severity_cell(rule.severity),
            Cell::new(rule.summary),
        ]);
    }
    println!("{table}");
    println!("The document must be well-formed XML with the .{XML_EXTENSION} extension.");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(80)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Error => Cell::new("ERROR").fg(Color::Red),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
