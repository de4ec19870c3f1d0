//! Check registry
//!
//! A check is one independent verification against a rendered page. It
//! records its own outcomes through the [`CheckContext`]; an error escaping
//! [`Check::run`] is a probe error, which the runner downgrades to an
//! outcome of the check's [`Check::probe_failure`] status. Only a check marked
//! as prerequisite can stop the rest of a viewport run.

use async_trait::async_trait;
use lander_common::{Mode, Status, ViewportConfig};

use crate::config::HarnessConfig;
use crate::error::QaResult;
use crate::page::{BoundingBox, Page, PageEvents, ScreenshotTarget};
use crate::recorder::Recorder;
use crate::snapshot::SnapshotStore;

mod content;
mod deploy;
mod interaction;
mod layout;
mod load;

pub use content::{ConsoleErrors, ImagesNotBroken, NoPlaceholders, RequestFailures};
pub use deploy::{classify_load_time, PageSpeed, SslCheck};
pub use interaction::{BundleSelector, CartDrawer, CtaButtons, FaqAccordion};
pub use layout::{FooterPresent, HeaderVisible, NoOverflow, ProductSection, SectionSnapshots};
pub use load::PageLoad;

#[async_trait]
pub trait Check: Send + Sync {
    /// Stable identifier, used as the primary outcome name
    fn name(&self) -> &'static str;

    /// A failed prerequisite ends the viewport run
    fn is_prerequisite(&self) -> bool {
        false
    }

    /// Status recorded when `run` returns an error
    fn probe_failure(&self) -> Status {
        Status::Warn
    }

    fn applies_to(&self, _mode: Mode) -> bool {
        true
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()>;
}

/// Everything a check may touch during one viewport run
pub struct CheckContext<'a> {
    pub page: &'a mut dyn Page,
    pub viewport: &'a ViewportConfig,
    pub mode: Mode,
    pub target: &'a str,
    pub config: &'a HarnessConfig,
    pub recorder: &'a mut Recorder,
    pub snapshots: &'a mut SnapshotStore,
    events: Option<PageEvents>,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        page: &'a mut dyn Page,
        viewport: &'a ViewportConfig,
        mode: Mode,
        target: &'a str,
        config: &'a HarnessConfig,
        recorder: &'a mut Recorder,
        snapshots: &'a mut SnapshotStore,
    ) -> Self {
        Self {
            page,
            viewport,
            mode,
            target,
            config,
            recorder,
            snapshots,
            events: None,
        }
    }

    pub fn pass(&mut self, name: &str, detail: impl Into<String>) {
        self.recorder.pass(name, detail);
    }

    pub fn fail(&mut self, name: &str, detail: impl Into<String>, fix: impl Into<String>) {
        self.recorder.fail(name, detail, fix);
    }

    pub fn warn(&mut self, name: &str, detail: impl Into<String>) {
        self.recorder.warn(name, detail);
    }

    /// Events captured since the context opened. Drained from the page on
    /// first use and shared by every later check.
    pub async fn events(&mut self) -> QaResult<&PageEvents> {
        if self.events.is_none() {
            self.events = Some(self.page.drain_events().await?);
        }
        Ok(self.events.get_or_insert_with(PageEvents::default))
    }

    /// Best-effort snapshot; failures are swallowed
    pub async fn snapshot(&mut self, region: &str, target: ScreenshotTarget) {
        self.snapshots
            .capture(&mut *self.page, self.viewport, region, target)
            .await;
    }

    /// Where the first match of `selector` stands on the page
    pub async fn region(&mut self, selector: &str) -> QaResult<Region> {
        if self.page.count(selector).await? == 0 {
            return Ok(Region::Missing);
        }
        Ok(match self.page.bounding_box(selector, 0).await? {
            Some(bounds) if bounds.height > 0.0 => Region::Rendered(bounds),
            _ => Region::Collapsed,
        })
    }
}

/// Presence and geometry of a page region
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Missing,
    /// Present but without height, or not laid out at all
    Collapsed,
    Rendered(BoundingBox),
}

/// Checks in execution order
pub struct Registry {
    checks: Vec<Box<dyn Check>>,
}

impl Registry {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// The landing page checklist
    pub fn standard() -> Self {
        Self::new()
            .with(PageLoad)
            .with(NoPlaceholders)
            .with(ConsoleErrors)
            .with(RequestFailures)
            .with(ImagesNotBroken)
            .with(HeaderVisible)
            .with(ProductSection)
            .with(CtaButtons)
            .with(FaqAccordion)
            .with(BundleSelector)
            .with(NoOverflow)
            .with(FooterPresent)
            .with(CartDrawer)
            .with(SectionSnapshots)
            .with(PageSpeed)
            .with(SslCheck)
    }

    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Checks that run in `mode`, in registration order
    pub fn for_mode(&self, mode: Mode) -> impl Iterator<Item = &dyn Check> {
        self.checks
            .iter()
            .map(|c| c.as_ref())
            .filter(move |c| c.applies_to(mode))
    }

    pub fn names(&self, mode: Mode) -> Vec<&'static str> {
        self.for_mode(mode).map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
