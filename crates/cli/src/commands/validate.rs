//! `lander validate`: offline audit of the built page

use std::path::PathBuf;

use clap::Args;
use lander_common::{Outcome, RunSummary};
use lander_qa::audit_build;
use serde::Serialize;

use crate::output::{print_error, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ValidateArgs {
    /// Built page to audit
    #[arg(long, default_value = "index.html")]
    pub page: PathBuf,
}

#[derive(Serialize)]
struct AuditRow<'a>(&'a Outcome);

impl TableDisplay for AuditRow<'_> {
    fn headers() -> Vec<&'static str> {
        vec!["", "Check", "Detail", "Fix"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.0.status().icon().to_string(),
            self.0.name().to_string(),
            self.0.detail().to_string(),
            self.0.fix().unwrap_or_default().to_string(),
        ]
    }
}

pub fn execute(args: ValidateArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let outcomes = audit_build(&args.page)?;
    let rows: Vec<AuditRow<'_>> = outcomes.iter().map(AuditRow).collect();
    print_list(&rows, format);

    let summary = RunSummary::from_outcomes(&outcomes);
    if matches!(format, OutputFormat::Table) {
        if summary.passed {
            print_success("VALIDATION PASSED - Ready for deployment");
        } else {
            print_error("VALIDATION FAILED - Fix errors before deployment");
        }
    }
    Ok(summary.exit_code())
}
