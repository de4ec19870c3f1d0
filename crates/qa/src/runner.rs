//! Viewport runner and session orchestrator

use std::path::Path;

use lander_common::{Mode, Outcome, Report, Status, ViewportConfig};
use tracing::{debug, info, warn};

use crate::checks::{CheckContext, Registry};
use crate::config::HarnessConfig;
use crate::error::QaResult;
use crate::page::{Engine, Page};
use crate::playwright::Browser;
use crate::recorder::Recorder;
use crate::snapshot::SnapshotStore;

const PROBE_FIX: &str = "Re-run with --verbose and inspect the browser driver log";

/// Live observer of a session, e.g. the console transcript
pub trait Progress {
    fn viewport_started(&mut self, _viewport: &ViewportConfig) {}

    fn outcome(&mut self, _outcome: &Outcome) {}
}

/// Progress sink that ignores everything
pub struct Quiet;

impl Progress for Quiet {}

/// Runs the registry, in order, against one page
pub struct ViewportRunner<'a> {
    registry: &'a Registry,
    config: &'a HarnessConfig,
    mode: Mode,
    target: &'a str,
}

impl<'a> ViewportRunner<'a> {
    pub fn new(registry: &'a Registry, config: &'a HarnessConfig, mode: Mode, target: &'a str) -> Self {
        Self {
            registry,
            config,
            mode,
            target,
        }
    }

    /// Run every applicable check and return the viewport's outcomes.
    ///
    /// Probe errors never escape: they become an outcome named after the
    /// check. A failed prerequisite ends the run.
    pub async fn run(
        &self,
        page: &mut dyn Page,
        viewport: &ViewportConfig,
        snapshots: &mut SnapshotStore,
        progress: &mut dyn Progress,
    ) -> Vec<Outcome> {
        let mut recorder = Recorder::new(viewport.label.as_str());
        let mut cx = CheckContext::new(
            page,
            viewport,
            self.mode,
            self.target,
            self.config,
            &mut recorder,
            snapshots,
        );

        for check in self.registry.for_mode(self.mode) {
            let before = cx.recorder.len();
            debug!("[{}] {}", viewport.label, check.name());

            if let Err(e) = check.run(&mut cx).await {
                let status = check.probe_failure();
                warn!("[{}] {} probe error: {}", viewport.label, check.name(), e);
                let fix = (status == Status::Fail).then(|| PROBE_FIX.to_string());
                cx.recorder
                    .record(check.name(), status, format!("Probe error: {}", e), fix);
            }

            let recorded = cx.recorder.since(before);
            for outcome in recorded {
                progress.outcome(outcome);
            }

            if check.is_prerequisite() && recorded.iter().any(Outcome::is_fail) {
                info!(
                    "[{}] {} failed, skipping remaining checks",
                    viewport.label,
                    check.name()
                );
                break;
            }
        }

        recorder.into_outcomes()
    }
}

/// One QA session: every configured viewport, strictly in sequence, sharing
/// one browser
pub struct Session<'a> {
    config: &'a HarnessConfig,
    registry: &'a Registry,
    mode: Mode,
    target: String,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a HarnessConfig, registry: &'a Registry, mode: Mode, target: impl Into<String>) -> Self {
        Self {
            config,
            registry,
            mode,
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Run all viewports on `engine` and assemble the report. The engine is
    /// shut down whether or not the viewports completed.
    pub async fn run(
        &self,
        engine: &mut dyn Engine,
        snapshots: &mut SnapshotStore,
        progress: &mut dyn Progress,
    ) -> QaResult<Report> {
        let result = self.run_viewports(engine, snapshots, progress).await;

        if let Err(e) = engine.shutdown().await {
            warn!("Browser shutdown failed: {}", e);
        }

        let outcomes = result?;
        Ok(Report::new(
            self.target.as_str(),
            self.mode,
            outcomes,
            snapshots.inventory(),
        ))
    }

    async fn run_viewports(
        &self,
        engine: &mut dyn Engine,
        snapshots: &mut SnapshotStore,
        progress: &mut dyn Progress,
    ) -> QaResult<Vec<Outcome>> {
        let runner = ViewportRunner::new(self.registry, self.config, self.mode, &self.target);
        let mut outcomes = Vec::new();

        for viewport in &self.config.viewports {
            progress.viewport_started(viewport);
            let mut page = engine.new_page(viewport).await?;

            let recorded = runner.run(page.as_mut(), viewport, snapshots, progress).await;
            info!("[{}] {} outcome(s)", viewport.label, recorded.len());
            outcomes.extend(recorded);

            if let Err(e) = page.close().await {
                warn!("[{}] Failed to close browser context: {}", viewport.label, e);
            }
        }

        Ok(outcomes)
    }
}

/// Launch the configured browser and run a full session against `target`
pub async fn run_session(
    config: &HarnessConfig,
    mode: Mode,
    target: &str,
    progress: &mut dyn Progress,
) -> QaResult<Report> {
    let registry = Registry::standard();
    let mut snapshots = SnapshotStore::new(&config.screenshot_dir)?;
    let mut browser = Browser::launch(&config.browser).await?;

    Session::new(config, &registry, mode, target)
        .run(&mut browser, &mut snapshots, progress)
        .await
}

/// The page under test: an explicit URL, or the built `index.html` under
/// `root` as an absolute `file://` URL. A missing page is not an error here;
/// it surfaces as a `page-load` FAIL when the browser navigates to it.
pub fn resolve_target(url: Option<&str>, root: &Path) -> QaResult<String> {
    if let Some(url) = url {
        return Ok(url.to_string());
    }

    let index = root.join("index.html");
    let absolute = if index.is_absolute() {
        index
    } else {
        std::env::current_dir()?.join(index)
    };
    let absolute = absolute.canonicalize().unwrap_or(absolute);
    Ok(format!("file://{}", absolute.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_url() {
        let target = resolve_target(Some("https://example.com"), Path::new("/nonexistent")).unwrap();
        assert_eq!(target, "https://example.com");
    }

    #[test]
    fn test_resolve_local_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let target = resolve_target(None, dir.path()).unwrap();
        assert!(target.starts_with("file://"));
        assert!(target.ends_with("/index.html"));
    }

    #[test]
    fn test_resolve_missing_index_still_yields_url() {
        let dir = tempfile::tempdir().unwrap();
        let target = resolve_target(None, dir.path()).unwrap();
        assert!(target.starts_with("file:///"));
        assert!(target.ends_with("/index.html"));
    }

    #[test]
    fn test_resolve_relative_root_is_absolute() {
        let target = resolve_target(None, Path::new("no-such-site")).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            target,
            format!("file://{}", cwd.join("no-such-site").join("index.html").display())
        );
    }
}
