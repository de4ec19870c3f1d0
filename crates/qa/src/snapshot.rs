//! Snapshot artifacts
//!
//! Files are named `{label}-{width}x{height}-{region}.png`. Capturing is
//! best effort: a failed screenshot is logged and forgotten, never reported
//! as a check failure.

use std::path::{Path, PathBuf};

use lander_common::ViewportConfig;
use tracing::{debug, warn};

use crate::error::QaResult;
use crate::page::{Page, ScreenshotTarget};

pub struct SnapshotStore {
    dir: PathBuf,
    captured: Vec<String>,
}

impl SnapshotStore {
    /// Create the store, making sure the output directory exists
    pub fn new(dir: impl Into<PathBuf>) -> QaResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            captured: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(viewport: &ViewportConfig, region: &str) -> String {
        format!("{}-{}.png", viewport.snapshot_prefix(), region)
    }

    /// Capture `target` as `region`; returns whether a file was written
    pub async fn capture(
        &mut self,
        page: &mut dyn Page,
        viewport: &ViewportConfig,
        region: &str,
        target: ScreenshotTarget,
    ) -> bool {
        let name = Self::file_name(viewport, region);
        let path = self.dir.join(&name);

        match page.screenshot(&target, &path).await {
            Ok(()) => {
                debug!("Captured {}", path.display());
                if !self.captured.contains(&name) {
                    self.captured.push(name);
                }
                true
            }
            Err(e) => {
                warn!("Snapshot {} skipped: {}", name, e);
                false
            }
        }
    }

    /// Artifacts written during this session, in capture order
    pub fn inventory(&self) -> Vec<String> {
        self.captured.clone()
    }
}
