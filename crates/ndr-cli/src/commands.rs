use anyhow::Result;

use ndr_cli::pipeline::{CheckError, check_file};
use ndr_cli::types::CheckReport;
use ndr_model::RULES;

use crate::cli::CheckArgs;
use crate::summary::print_rules;

pub fn run_rules() -> Result<()> {
    print_rules(RULES);
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<CheckReport, CheckError> {
    check_file(&args.file)
}
