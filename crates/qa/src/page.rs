//! Browser page abstraction the checks run against
//!
//! Elements are addressed by selector and zero-based match index, the way
//! Playwright's `page.$$(selector)[index]` resolves them. A comma-separated
//! selector is a union matched in document order.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use lander_common::ViewportConfig;
use serde::{Deserialize, Serialize};

use crate::error::QaResult;

/// Element geometry in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Same box with its height capped at `max_height`
    pub fn clipped(&self, max_height: f64) -> Self {
        Self {
            height: self.height.min(max_height),
            ..*self
        }
    }
}

/// One `<img>` as seen by the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProbe {
    pub src: Option<String>,
    pub natural_width: u32,
    pub visible: bool,
}

impl ImageProbe {
    pub fn is_broken(&self) -> bool {
        self.natural_width == 0
    }
}

/// A sub-resource request that failed at the transport level or with an
/// HTTP error status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRequest {
    pub url: String,
    pub error: String,
}

/// Everything the page reported since the context was created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEvents {
    #[serde(default)]
    pub console_errors: Vec<String>,
    #[serde(default)]
    pub page_errors: Vec<String>,
    #[serde(default)]
    pub failed_requests: Vec<FailedRequest>,
}

impl PageEvents {
    /// Console errors followed by uncaught errors and unhandled rejections
    pub fn script_errors(&self) -> Vec<&str> {
        self.console_errors
            .iter()
            .chain(self.page_errors.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Navigation timing entry, milliseconds from navigation start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    pub load_ms: i64,
    pub dom_content_loaded_ms: i64,
}

/// What a screenshot covers
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenshotTarget {
    FullPage,
    Viewport,
    Element { selector: String, index: usize },
    Clip(BoundingBox),
}

#[async_trait]
pub trait Page: Send {
    /// Navigate and wait for network idle
    async fn goto(&mut self, url: &str, timeout: Duration) -> QaResult<()>;

    /// `textContent` of `<body>`
    async fn body_text(&mut self) -> QaResult<String>;

    /// Number of elements matching `selector`
    async fn count(&mut self, selector: &str) -> QaResult<usize>;

    /// Box of the `index`th match; `None` when missing or not rendered
    async fn bounding_box(&mut self, selector: &str, index: usize) -> QaResult<Option<BoundingBox>>;

    async fn is_visible(&mut self, selector: &str, index: usize) -> QaResult<bool>;

    async fn click(&mut self, selector: &str, index: usize) -> QaResult<()>;

    async fn wait(&mut self, duration: Duration) -> QaResult<()>;

    async fn images(&mut self, selector: &str) -> QaResult<Vec<ImageProbe>>;

    /// `document.body.scrollWidth`
    async fn scroll_width(&mut self) -> QaResult<u32>;

    async fn navigation_timing(&mut self) -> QaResult<Option<NavigationTiming>>;

    async fn screenshot(&mut self, target: &ScreenshotTarget, path: &Path) -> QaResult<()>;

    /// Take the captured console, page-error and request-failure events,
    /// leaving the buffers empty
    async fn drain_events(&mut self) -> QaResult<PageEvents>;

    /// Close the isolated context backing this page
    async fn close(&mut self) -> QaResult<()>;
}

/// A browser able to open one isolated context per viewport
#[async_trait]
pub trait Engine: Send {
    async fn new_page(&mut self, viewport: &ViewportConfig) -> QaResult<Box<dyn Page>>;

    /// Release the browser; called exactly once at the end of a session
    async fn shutdown(&mut self) -> QaResult<()>;
}
