//! `lander qa`: browser QA run against a local build or a deployed URL

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lander_common::Mode;
use lander_qa::playwright::BrowserKind;
use lander_qa::{resolve_target, run_session, ConsoleProgress, HarnessConfig, ReportEmitter};
use tracing::debug;

#[derive(Args)]
pub struct QaArgs {
    /// Page to test; defaults to the built index.html under --root
    #[arg(long, env = "LANDER_QA_URL")]
    pub url: Option<String>,

    /// pre-deploy or post-deploy
    #[arg(long, default_value = "pre-deploy")]
    pub mode: Mode,

    /// Harness configuration file
    #[arg(long, default_value = "qa.toml")]
    pub config: PathBuf,

    /// Snapshot output directory
    #[arg(long)]
    pub screenshots: Option<PathBuf>,

    /// Report output path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Project root holding index.html
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Browser engine: chromium, firefox or webkit
    #[arg(long)]
    pub browser: Option<BrowserKind>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

impl QaArgs {
    fn harness_config(&self) -> anyhow::Result<HarnessConfig> {
        let mut config = HarnessConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;

        if let Some(dir) = &self.screenshots {
            config.screenshot_dir = dir.clone();
        }
        if let Some(path) = &self.report {
            config.report_path = path.clone();
        }
        if let Some(browser) = self.browser {
            config.browser.browser = browser;
        }
        if self.headed {
            config.browser.headless = false;
        }
        Ok(config)
    }
}

pub async fn execute(args: QaArgs) -> anyhow::Result<i32> {
    let config = args.harness_config()?;
    let target = resolve_target(args.url.as_deref(), &args.root)?;
    debug!("QA config: {:?}", config);

    let emitter = ReportEmitter::new(&config.report_path, &config.screenshot_dir);
    emitter.print_banner(&target, args.mode);

    let mut progress = ConsoleProgress::default();
    let report = run_session(&config, args.mode, &target, &mut progress).await?;

    emitter.write(&report)?;
    emitter.print_summary(&report);

    Ok(report.exit_code())
}
