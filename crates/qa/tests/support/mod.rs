//! Scripted in-memory browser for driving the runner without Playwright

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lander_common::{Mode, Outcome, ViewportConfig};
use lander_qa::config::{HarnessConfig, Selectors};
use lander_qa::page::{
    BoundingBox, Engine, FailedRequest, ImageProbe, NavigationTiming, Page, PageEvents,
    ScreenshotTarget,
};
use lander_qa::runner::Quiet;
use lander_qa::{QaError, QaResult, Registry, SnapshotStore, ViewportRunner};

pub const LOCAL_TARGET: &str = "file:///site/index.html";

#[derive(Debug, Clone)]
pub enum Navigation {
    Loads,
    Fails(String),
    Hangs,
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub count: usize,
    pub height: f64,
    pub visible: bool,
}

impl Element {
    pub fn shown(count: usize, height: f64) -> Self {
        Self { count, height, visible: true }
    }

    pub fn hidden(count: usize) -> Self {
        Self { count, height: 0.0, visible: false }
    }
}

/// Everything a scripted page answers with
#[derive(Debug, Clone)]
pub struct PageScript {
    pub navigation: Navigation,
    pub body_text: String,
    pub elements: HashMap<String, Element>,
    pub images: Vec<ImageProbe>,
    pub scroll_width: u32,
    pub timing: Option<NavigationTiming>,
    pub events: PageEvents,
    /// Clicking the key selector sets the visibility of the target selector
    pub click_effects: HashMap<String, (String, bool)>,
    pub failing_clicks: HashSet<String>,
    /// Selectors whose lookups error out
    pub broken_selectors: HashSet<String>,
    pub screenshots_fail: bool,
}

impl PageScript {
    /// A complete, well-formed landing page rendered at `width`
    pub fn healthy(width: u32) -> Self {
        let s = Selectors::default();
        let mut elements = HashMap::new();
        elements.insert(s.header.union(), Element::shown(1, 80.0));
        elements.insert(s.product.union(), Element::shown(1, 1400.0));
        elements.insert(s.footer.union(), Element::shown(1, 240.0));
        elements.insert(s.cta.union(), Element::shown(2, 48.0));
        elements.insert(s.faq.union(), Element::shown(5, 60.0));
        elements.insert(s.bundle.union(), Element::shown(3, 300.0));
        elements.insert("[data-cart-toggle]".to_string(), Element::shown(1, 32.0));
        elements.insert(s.cart_drawer.union(), Element::hidden(1));
        elements.insert(".cart-drawer__close".to_string(), Element::shown(1, 24.0));

        let mut click_effects = HashMap::new();
        click_effects.insert(
            "[data-cart-toggle]".to_string(),
            (s.cart_drawer.union(), true),
        );
        click_effects.insert(
            ".cart-drawer__close".to_string(),
            (s.cart_drawer.union(), false),
        );

        Self {
            navigation: Navigation::Loads,
            body_text: "Antpink Smart Bottle. Free shipping on every order.".to_string(),
            elements,
            images: vec![
                image("images/hero.webp", 1200),
                image("images/logo.webp", 240),
                image("images/bundle-2.webp", 600),
            ],
            scroll_width: width,
            timing: Some(NavigationTiming { load_ms: 1500, dom_content_loaded_ms: 900 }),
            events: PageEvents::default(),
            click_effects,
            failing_clicks: HashSet::new(),
            broken_selectors: HashSet::new(),
            screenshots_fail: false,
        }
    }

    pub fn set(&mut self, selector: impl Into<String>, element: Element) -> &mut Self {
        self.elements.insert(selector.into(), element);
        self
    }

    pub fn remove(&mut self, selector: &str) -> &mut Self {
        self.elements.remove(selector);
        self
    }

    pub fn fail_request(&mut self, url: &str) -> &mut Self {
        self.events.failed_requests.push(FailedRequest {
            url: url.to_string(),
            error: "404".to_string(),
        });
        self
    }
}

pub fn image(src: &str, natural_width: u32) -> ImageProbe {
    ImageProbe {
        src: Some(src.to_string()),
        natural_width,
        visible: true,
    }
}

/// Shared record of what the harness did to the scripted browser
#[derive(Debug, Default)]
pub struct Journal {
    pub calls: Mutex<Vec<String>>,
    pub shutdown: AtomicBool,
}

impl Journal {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn was_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

pub struct ScriptedPage {
    script: PageScript,
    journal: Arc<Journal>,
    label: String,
    drained: bool,
}

impl ScriptedPage {
    pub fn new(script: PageScript, journal: Arc<Journal>, label: &str) -> Self {
        Self {
            script,
            journal,
            label: label.to_string(),
            drained: false,
        }
    }

    fn lookup(&self, selector: &str) -> QaResult<Element> {
        if self.script.broken_selectors.contains(selector) {
            return Err(QaError::Playwright(format!("Unsupported selector: {}", selector)));
        }
        Ok(self.script.elements.get(selector).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl Page for ScriptedPage {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> QaResult<()> {
        self.journal.push(format!("goto {} {}", self.label, url));
        match &self.script.navigation {
            Navigation::Loads => Ok(()),
            Navigation::Fails(message) => Err(QaError::Playwright(message.clone())),
            Navigation::Hangs => std::future::pending().await,
        }
    }

    async fn body_text(&mut self) -> QaResult<String> {
        Ok(self.script.body_text.clone())
    }

    async fn count(&mut self, selector: &str) -> QaResult<usize> {
        Ok(self.lookup(selector)?.count)
    }

    async fn bounding_box(&mut self, selector: &str, index: usize) -> QaResult<Option<BoundingBox>> {
        let element = self.lookup(selector)?;
        if index >= element.count || !element.visible {
            return Ok(None);
        }
        Ok(Some(BoundingBox {
            x: 0.0,
            y: 100.0 * index as f64,
            width: f64::from(self.script.scroll_width),
            height: element.height,
        }))
    }

    async fn is_visible(&mut self, selector: &str, index: usize) -> QaResult<bool> {
        let element = self.lookup(selector)?;
        Ok(index < element.count && element.visible)
    }

    async fn click(&mut self, selector: &str, index: usize) -> QaResult<()> {
        self.journal.push(format!("click {} {}", self.label, selector));
        if self.script.failing_clicks.contains(selector) {
            return Err(QaError::Playwright("Element is not attached to the DOM".to_string()));
        }
        if index >= self.lookup(selector)?.count {
            return Err(QaError::Probe(format!("no element {} for {}", index, selector)));
        }
        if let Some((target, visible)) = self.script.click_effects.get(selector).cloned() {
            if let Some(element) = self.script.elements.get_mut(&target) {
                element.visible = visible;
            }
        }
        Ok(())
    }

    async fn wait(&mut self, _duration: Duration) -> QaResult<()> {
        Ok(())
    }

    async fn images(&mut self, _selector: &str) -> QaResult<Vec<ImageProbe>> {
        Ok(self.script.images.clone())
    }

    async fn scroll_width(&mut self) -> QaResult<u32> {
        Ok(self.script.scroll_width)
    }

    async fn navigation_timing(&mut self) -> QaResult<Option<NavigationTiming>> {
        Ok(self.script.timing)
    }

    async fn screenshot(&mut self, _target: &ScreenshotTarget, path: &Path) -> QaResult<()> {
        if self.script.screenshots_fail {
            return Err(QaError::Playwright("Target closed".to_string()));
        }
        std::fs::write(path, b"png")?;
        self.journal.push(format!("screenshot {}", path.display()));
        Ok(())
    }

    async fn drain_events(&mut self) -> QaResult<PageEvents> {
        self.journal.push(format!("drain {}", self.label));
        if self.drained {
            return Ok(PageEvents::default());
        }
        self.drained = true;
        Ok(std::mem::take(&mut self.script.events))
    }

    async fn close(&mut self) -> QaResult<()> {
        self.journal.push(format!("close {}", self.label));
        Ok(())
    }
}

/// Hands out one scripted page per viewport, in order
pub struct ScriptedEngine {
    scripts: VecDeque<PageScript>,
    journal: Arc<Journal>,
}

impl ScriptedEngine {
    pub fn new(scripts: impl IntoIterator<Item = PageScript>) -> Self {
        Self {
            scripts: scripts.into_iter().collect(),
            journal: Arc::new(Journal::default()),
        }
    }

    pub fn journal(&self) -> Arc<Journal> {
        Arc::clone(&self.journal)
    }
}

#[async_trait]
impl Engine for ScriptedEngine {
    async fn new_page(&mut self, viewport: &ViewportConfig) -> QaResult<Box<dyn Page>> {
        let script = self
            .scripts
            .pop_front()
            .ok_or_else(|| QaError::Driver("browser has been closed".to_string()))?;
        self.journal.push(format!("open {}", viewport.label));
        Ok(Box::new(ScriptedPage::new(
            script,
            Arc::clone(&self.journal),
            &viewport.label,
        )))
    }

    async fn shutdown(&mut self) -> QaResult<()> {
        self.journal.shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// What one viewport run left behind
pub struct ViewportRun {
    pub outcomes: Vec<Outcome>,
    pub snapshots: Vec<String>,
    pub journal: Arc<Journal>,
}

impl ViewportRun {
    pub fn get(&self, name: &str) -> &Outcome {
        self.outcomes
            .iter()
            .find(|o| o.name() == name)
            .unwrap_or_else(|| panic!("no outcome named {}", name))
    }

    pub fn find(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.name()).collect()
    }
}

pub fn test_config() -> HarnessConfig {
    HarnessConfig {
        load_timeout_ms: 200,
        ..HarnessConfig::default()
    }
}

/// Run the standard registry on the desktop viewport against `script`
pub async fn run_viewport(script: PageScript, mode: Mode, target: &str) -> ViewportRun {
    let config = test_config();
    let registry = Registry::standard();
    let dir = tempfile::tempdir().unwrap();
    let mut snapshots = SnapshotStore::new(dir.path()).unwrap();
    let journal = Arc::new(Journal::default());
    let viewport = ViewportConfig::desktop();
    let mut page = ScriptedPage::new(script, Arc::clone(&journal), &viewport.label);

    let outcomes = ViewportRunner::new(&registry, &config, mode, target)
        .run(&mut page, &viewport, &mut snapshots, &mut Quiet)
        .await;

    ViewportRun {
        outcomes,
        snapshots: snapshots.inventory(),
        journal,
    }
}
