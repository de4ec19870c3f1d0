//! Report emitter: the JSON artifact and the console transcript

use std::path::{Path, PathBuf};

use colored::Colorize;
use lander_common::{Mode, Outcome, Report, ViewportConfig};
use tracing::info;

use crate::error::QaResult;
use crate::runner::Progress;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const BANNER_WIDTH: usize = 50;

/// Transcript lines for one outcome: the icon line, then `FIX:` if present
pub fn transcript_lines(outcome: &Outcome) -> Vec<String> {
    let mut lines = vec![format!(
        "  {} {}: {}",
        outcome.status().icon(),
        outcome.name(),
        outcome.detail()
    )];
    if let Some(fix) = outcome.fix() {
        lines.push(format!("     FIX: {}", fix));
    }
    lines
}

/// `[viewport] name: fix` for every failure, in run order
pub fn fixes_needed(outcomes: &[Outcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter(|o| o.is_fail())
        .map(|o| format!("[{}] {}: {}", o.viewport(), o.name(), o.fix().unwrap_or("-")))
        .collect()
}

fn banner_row(label: &str, value: &str) -> String {
    let value: String = value.chars().take(BANNER_WIDTH).collect();
    format!("║  {}{:<width$}║", label, value, width = BANNER_WIDTH)
}

pub struct ReportEmitter {
    path: PathBuf,
    screenshot_dir: PathBuf,
}

impl ReportEmitter {
    pub fn new(path: impl Into<PathBuf>, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            screenshot_dir: screenshot_dir.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn print_banner(&self, target: &str, mode: Mode) {
        println!();
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║  PLAYWRIGHT VISUAL QA - Landing Page                     ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("{}", banner_row("URL:  ", target));
        println!("{}", banner_row("Mode: ", &mode.to_string()));
        println!("╚══════════════════════════════════════════════════════════╝");
        println!();
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn write(&self, report: &Report) -> QaResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&self.path, json)?;
        info!("Report written to {}", self.path.display());
        Ok(())
    }

    pub fn print_summary(&self, report: &Report) {
        let summary = &report.summary;
        println!();
        println!("{}", RULE);
        println!(
            "  RESULTS: {} passed, {} failed, {} warnings ({} total)",
            summary.passes, summary.fails, summary.warns, summary.total
        );
        println!("{}", RULE);

        println!("\n  Report: {}", self.path.display());
        println!("  Screenshots: {}/", self.screenshot_dir.display());

        println!();
        if report.passed() {
            println!("  {}", "✅ QA PASSED - Ready for deployment".green().bold());
        } else {
            println!("  {}", "❌ QA FAILED - Fix issues above and re-run".red().bold());
            println!();
            println!("  FIXES NEEDED:");
            for line in fixes_needed(&report.results) {
                println!("    {}", line);
            }
        }
    }
}

/// Prints each viewport heading and outcome as it is recorded
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    viewports: usize,
}

impl Progress for ConsoleProgress {
    fn viewport_started(&mut self, viewport: &ViewportConfig) {
        if self.viewports > 0 {
            println!();
        }
        self.viewports += 1;
        println!("{}", format!("━━━ {} ━━━", viewport.heading()).bold());
    }

    fn outcome(&mut self, outcome: &Outcome) {
        for line in transcript_lines(outcome) {
            println!("{}", line);
        }
    }
}
