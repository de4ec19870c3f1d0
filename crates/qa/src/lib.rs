//! Lander QA harness
//!
//! Drives a real browser over a landing page and turns what it sees into
//! PASS / FAIL / WARN outcomes:
//! - Controls Playwright through a long-lived Node driver process
//! - Runs an ordered registry of independent checks per viewport
//! - Captures snapshot PNGs of the regions it inspects
//! - Emits a JSON report and a console transcript with fix hints
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Session (one browser)                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  for each ViewportConfig, in order:                         │
//! │    Engine::new_page() -> isolated context + event capture   │
//! │    ViewportRunner::run()                                    │
//! │      ├── page-load (prerequisite, stops the run on FAIL)    │
//! │      ├── content, layout and interaction checks            │
//! │      └── page-speed, ssl-check (post-deploy only)           │
//! │    Page::close()                                            │
//! │  Engine::shutdown()                                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ReportEmitter -> qa-report.json, transcript, exit code     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod bind;
pub mod checks;
pub mod config;
pub mod error;
pub mod page;
pub mod playwright;
pub mod recorder;
pub mod report;
pub mod runner;
pub mod snapshot;

pub use audit::audit_build;
pub use checks::{Check, CheckContext, Registry};
pub use config::HarnessConfig;
pub use error::{QaError, QaResult};
pub use page::{Engine, Page};
pub use playwright::{Browser, BrowserConfig};
pub use recorder::Recorder;
pub use report::{ConsoleProgress, ReportEmitter};
pub use runner::{resolve_target, run_session, Progress, Session, ViewportRunner};
pub use snapshot::SnapshotStore;
