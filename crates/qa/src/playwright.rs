//! Playwright browser automation
//!
//! A small Node driver script is written to a temp dir and started once per
//! session. It owns the Chromium (or Firefox/WebKit) instance and speaks
//! line-delimited JSON over stdin/stdout: every request carries an `id`, every
//! response echoes it. Each viewport gets its own browser context, and the
//! console / page-error / failed-request listeners are attached to that
//! context's page when it is created, so captured events never leak between
//! viewports.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lander_common::ViewportConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{QaError, QaResult};
use crate::page::{
    BoundingBox, Engine, ImageProbe, NavigationTiming, Page, PageEvents, ScreenshotTarget,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = QaError;

    fn from_str(s: &str) -> QaResult<Self> {
        match s {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(QaError::Config(format!("unknown browser: {}", other))),
        }
    }
}

/// Configuration for the Playwright driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub browser: BrowserKind,
    pub headless: bool,
    /// Directory whose `node_modules` provides `playwright`
    pub node_root: PathBuf,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chromium,
            headless: true,
            node_root: PathBuf::from("."),
        }
    }
}

const DRIVER_SCRIPT: &str = r##"
const readline = require('readline');
const playwright = require(require.resolve('playwright', { paths: [process.cwd()] }));

let browser = null;
let nextContext = 1;
const contexts = new Map();

function reply(id, ok, payload) {
  const msg = ok
    ? { id, ok: true, result: payload === undefined ? null : payload }
    : { id, ok: false, error: String(payload && payload.message ? payload.message : payload) };
  process.stdout.write(JSON.stringify(msg) + '\n');
}

function entry(req) {
  const e = contexts.get(req.context);
  if (!e) throw new Error('unknown context ' + req.context);
  return e;
}

async function nth(page, selector, index) {
  const all = await page.$$(selector);
  return all[index] || null;
}

const ops = {
  async launch(req) {
    browser = await playwright[req.browser].launch({ headless: req.headless });
    return null;
  },
  async newContext(req) {
    const options = { viewport: { width: req.width, height: req.height } };
    if (req.isMobile) options.isMobile = true;
    if (req.hasTouch) options.hasTouch = true;
    if (req.userAgent) options.userAgent = req.userAgent;
    const context = await browser.newContext(options);
    const page = await context.newPage();
    const events = { consoleErrors: [], pageErrors: [], failedRequests: [] };
    page.on('console', (msg) => { if (msg.type() === 'error') events.consoleErrors.push(msg.text()); });
    page.on('pageerror', (err) => events.pageErrors.push(err.message));
    page.on('requestfailed', (r) => {
      const failure = r.failure();
      events.failedRequests.push({ url: r.url(), error: (failure && failure.errorText) || 'unknown' });
    });
    page.on('response', (res) => {
      if (res.status() >= 400) events.failedRequests.push({ url: res.url(), error: 'HTTP ' + res.status() });
    });
    const id = nextContext++;
    contexts.set(id, { context, page, events });
    return id;
  },
  async closeContext(req) {
    const e = entry(req);
    contexts.delete(req.context);
    await e.context.close();
    return null;
  },
  async goto(req) {
    await entry(req).page.goto(req.url, { waitUntil: 'networkidle', timeout: req.timeoutMs });
    return null;
  },
  async bodyText(req) {
    return (await entry(req).page.textContent('body')) || '';
  },
  async count(req) {
    return (await entry(req).page.$$(req.selector)).length;
  },
  async boundingBox(req) {
    const el = await nth(entry(req).page, req.selector, req.index);
    return el ? await el.boundingBox() : null;
  },
  async isVisible(req) {
    const el = await nth(entry(req).page, req.selector, req.index);
    return el ? await el.isVisible() : false;
  },
  async click(req) {
    const el = await nth(entry(req).page, req.selector, req.index);
    if (!el) throw new Error('no element for ' + req.selector + ' #' + req.index);
    await el.click({ timeout: 5000 });
    return null;
  },
  async wait(req) {
    await entry(req).page.waitForTimeout(req.ms);
    return null;
  },
  async images(req) {
    return entry(req).page.$$eval(req.selector, (imgs) => imgs.map((img) => ({
      src: img.getAttribute('src'),
      naturalWidth: img.naturalWidth,
      visible: img.offsetWidth > 0 && img.offsetHeight > 0,
    })));
  },
  async scrollWidth(req) {
    return entry(req).page.evaluate(() => document.body.scrollWidth);
  },
  async timing(req) {
    return entry(req).page.evaluate(() => {
      const nav = performance.getEntriesByType('navigation')[0];
      return nav ? {
        loadMs: Math.round(nav.loadEventEnd - nav.startTime),
        domContentLoadedMs: Math.round(nav.domContentLoadedEventEnd - nav.startTime),
      } : null;
    });
  },
  async screenshot(req) {
    const page = entry(req).page;
    switch (req.kind) {
      case 'full': await page.screenshot({ path: req.path, fullPage: true }); break;
      case 'viewport': await page.screenshot({ path: req.path }); break;
      case 'clip': await page.screenshot({ path: req.path, clip: req.clip }); break;
      case 'element': {
        const el = await nth(page, req.selector, req.index);
        if (!el) throw new Error('no element for ' + req.selector);
        await el.screenshot({ path: req.path });
        break;
      }
      default: throw new Error('unknown screenshot kind ' + req.kind);
    }
    return null;
  },
  async drainEvents(req) {
    const e = entry(req);
    const events = e.events;
    e.events = { consoleErrors: [], pageErrors: [], failedRequests: [] };
    return events;
  },
  async close() {
    if (browser) await browser.close();
    browser = null;
    return null;
  },
};

const rl = readline.createInterface({ input: process.stdin });
let queue = Promise.resolve();
rl.on('line', (line) => {
  queue = queue.then(async () => {
    let req;
    try { req = JSON.parse(line); } catch (e) { return; }
    const op = ops[req.op];
    if (!op) return reply(req.id, false, 'unknown op ' + req.op);
    try { reply(req.id, true, await op(req)); } catch (e) { reply(req.id, false, e); }
    if (req.op === 'close') process.exit(0);
  });
});
rl.on('close', async () => {
  await queue;
  if (browser) await browser.close();
  process.exit(0);
});
"##;

#[derive(Debug, Deserialize)]
struct DriverResponse {
    id: u64,
    ok: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Request/response channel to the driver process
struct Driver {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl Driver {
    async fn request(&mut self, op: &str, params: Value) -> QaResult<Value> {
        self.next_id += 1;
        let id = self.next_id;

        let mut message = Map::new();
        message.insert("id".to_string(), json!(id));
        message.insert("op".to_string(), json!(op));
        if let Value::Object(extra) = params {
            message.extend(extra);
        }

        let mut line = serde_json::to_string(&Value::Object(message))?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        loop {
            let line = self
                .stdout
                .next_line()
                .await?
                .ok_or_else(|| QaError::Driver("driver process exited".to_string()))?;

            let response: DriverResponse = match serde_json::from_str(&line) {
                Ok(response) => response,
                Err(_) => {
                    debug!("[driver] {}", line);
                    continue;
                }
            };

            // A request abandoned by a timeout still gets its reply later
            if response.id != id {
                debug!("Discarding stale driver response {}", response.id);
                continue;
            }

            return if response.ok {
                Ok(response.result)
            } else {
                Err(QaError::Playwright(
                    response.error.unwrap_or_else(|| format!("{} failed", op)),
                ))
            };
        }
    }

    async fn call<T: DeserializeOwned>(&mut self, op: &str, params: Value) -> QaResult<T> {
        let value = self.request(op, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Playwright browser handle; one per session
pub struct Browser {
    driver: Arc<Mutex<Driver>>,
    // Holds the driver script until the process is gone
    _script_dir: tempfile::TempDir,
    closed: bool,
}

impl Browser {
    /// Start the driver process and launch the browser
    pub async fn launch(config: &BrowserConfig) -> QaResult<Self> {
        Self::check_playwright_installed(&config.node_root)?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("lander-driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;

        debug!("Starting Playwright driver: {}", script_path.display());

        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .current_dir(&config.node_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| QaError::Driver(format!("failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| QaError::Driver("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| QaError::Driver("driver stdout unavailable".to_string()))?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("[driver stderr] {}", line);
                }
            });
        }

        let mut driver = Driver {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 0,
        };

        driver
            .request(
                "launch",
                json!({ "browser": config.browser.as_str(), "headless": config.headless }),
            )
            .await?;

        info!("Launched {} (headless: {})", config.browser.as_str(), config.headless);

        Ok(Self {
            driver: Arc::new(Mutex::new(driver)),
            _script_dir: script_dir,
            closed: false,
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed(node_root: &Path) -> QaResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .current_dir(node_root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(QaError::PlaywrightNotFound),
        }
    }
}

#[async_trait]
impl Engine for Browser {
    async fn new_page(&mut self, viewport: &ViewportConfig) -> QaResult<Box<dyn Page>> {
        let context: u64 = self
            .driver
            .lock()
            .await
            .call(
                "newContext",
                json!({
                    "width": viewport.width,
                    "height": viewport.height,
                    "isMobile": viewport.is_mobile,
                    "hasTouch": viewport.has_touch,
                    "userAgent": viewport.user_agent,
                }),
            )
            .await?;

        debug!("Opened context {} for {}", context, viewport.label);

        Ok(Box::new(PlaywrightPage {
            driver: Arc::clone(&self.driver),
            context,
        }))
    }

    async fn shutdown(&mut self) -> QaResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut driver = self.driver.lock().await;
        if let Err(e) = driver.request("close", json!({})).await {
            warn!("Browser close failed: {}", e);
        }

        match tokio::time::timeout(Duration::from_secs(5), driver.child.wait()).await {
            Ok(_) => {}
            Err(_) => {
                warn!("Driver did not exit, killing it");
                driver.child.kill().await?;
            }
        }

        info!("Browser closed");
        Ok(())
    }
}

/// Page inside one isolated browser context
pub struct PlaywrightPage {
    driver: Arc<Mutex<Driver>>,
    context: u64,
}

impl PlaywrightPage {
    async fn call<T: DeserializeOwned>(&self, op: &str, params: Value) -> QaResult<T> {
        let mut params = params;
        if let Value::Object(map) = &mut params {
            map.insert("context".to_string(), json!(self.context));
        }
        self.driver.lock().await.call(op, params).await
    }

    async fn run(&self, op: &str, params: Value) -> QaResult<()> {
        let _: Value = self.call(op, params).await?;
        Ok(())
    }
}

#[async_trait]
impl Page for PlaywrightPage {
    async fn goto(&mut self, url: &str, timeout: Duration) -> QaResult<()> {
        self.run(
            "goto",
            json!({ "url": url, "timeoutMs": timeout.as_millis() as u64 }),
        )
        .await
    }

    async fn body_text(&mut self) -> QaResult<String> {
        self.call("bodyText", json!({})).await
    }

    async fn count(&mut self, selector: &str) -> QaResult<usize> {
        self.call("count", json!({ "selector": selector })).await
    }

    async fn bounding_box(&mut self, selector: &str, index: usize) -> QaResult<Option<BoundingBox>> {
        self.call("boundingBox", json!({ "selector": selector, "index": index }))
            .await
    }

    async fn is_visible(&mut self, selector: &str, index: usize) -> QaResult<bool> {
        self.call("isVisible", json!({ "selector": selector, "index": index }))
            .await
    }

    async fn click(&mut self, selector: &str, index: usize) -> QaResult<()> {
        self.run("click", json!({ "selector": selector, "index": index }))
            .await
    }

    async fn wait(&mut self, duration: Duration) -> QaResult<()> {
        self.run("wait", json!({ "ms": duration.as_millis() as u64 }))
            .await
    }

    async fn images(&mut self, selector: &str) -> QaResult<Vec<ImageProbe>> {
        self.call("images", json!({ "selector": selector })).await
    }

    async fn scroll_width(&mut self) -> QaResult<u32> {
        self.call("scrollWidth", json!({})).await
    }

    async fn navigation_timing(&mut self) -> QaResult<Option<NavigationTiming>> {
        self.call("timing", json!({})).await
    }

    async fn screenshot(&mut self, target: &ScreenshotTarget, path: &Path) -> QaResult<()> {
        let path = path.to_string_lossy();
        let params = match target {
            ScreenshotTarget::FullPage => json!({ "kind": "full", "path": path }),
            ScreenshotTarget::Viewport => json!({ "kind": "viewport", "path": path }),
            ScreenshotTarget::Element { selector, index } => json!({
                "kind": "element", "path": path, "selector": selector, "index": index
            }),
            ScreenshotTarget::Clip(clip) => json!({ "kind": "clip", "path": path, "clip": clip }),
        };
        self.run("screenshot", params).await
    }

    async fn drain_events(&mut self) -> QaResult<PageEvents> {
        self.call("drainEvents", json!({})).await
    }

    async fn close(&mut self) -> QaResult<()> {
        self.run("closeContext", json!({})).await
    }
}
