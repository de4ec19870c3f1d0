//! Core types for Lander QA runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Warn,
}

impl Status {
    /// Console icon used in transcripts
    pub fn icon(&self) -> &'static str {
        match self {
            Status::Pass => "✅",
            Status::Fail => "❌",
            Status::Warn => "⚠️",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
            Status::Warn => write!(f, "WARN"),
        }
    }
}

/// One recorded result of a single check.
///
/// Outcomes are immutable: they are built through [`Outcome::pass`],
/// [`Outcome::fail`], [`Outcome::warn`] or [`Outcome::new`] and only read
/// afterwards. A remediation hint is never kept on a PASS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    name: String,
    status: Status,
    detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fix: Option<String>,
    viewport: String,
}

impl Outcome {
    pub fn new(
        name: impl Into<String>,
        status: Status,
        detail: impl Into<String>,
        fix: Option<String>,
        viewport: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
            fix: if status == Status::Pass { None } else { fix },
            viewport: viewport.into(),
        }
    }

    pub fn pass(name: impl Into<String>, detail: impl Into<String>, viewport: impl Into<String>) -> Self {
        Self::new(name, Status::Pass, detail, None, viewport)
    }

    pub fn fail(
        name: impl Into<String>,
        detail: impl Into<String>,
        fix: impl Into<String>,
        viewport: impl Into<String>,
    ) -> Self {
        Self::new(name, Status::Fail, detail, Some(fix.into()), viewport)
    }

    pub fn warn(name: impl Into<String>, detail: impl Into<String>, viewport: impl Into<String>) -> Self {
        Self::new(name, Status::Warn, detail, None, viewport)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn fix(&self) -> Option<&str> {
        self.fix.as_deref()
    }

    pub fn viewport(&self) -> &str {
        &self.viewport
    }

    pub fn is_fail(&self) -> bool {
        self.status == Status::Fail
    }
}

/// Run mode; selects whether the deployment-only checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    PreDeploy,
    PostDeploy,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::PreDeploy => write!(f, "pre-deploy"),
            Mode::PostDeploy => write!(f, "post-deploy"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pre-deploy" => Ok(Mode::PreDeploy),
            "post-deploy" => Ok(Mode::PostDeploy),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

/// Screen size and device emulation a run is executed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub label: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub is_mobile: bool,
    #[serde(default)]
    pub has_touch: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ViewportConfig {
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Result<Self> {
        let viewport = Self {
            label: label.into(),
            width,
            height,
            is_mobile: false,
            has_touch: false,
            user_agent: None,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// 1440x900 desktop
    pub fn desktop() -> Self {
        Self {
            label: "desktop".to_string(),
            width: 1440,
            height: 900,
            is_mobile: false,
            has_touch: false,
            user_agent: None,
        }
    }

    /// 375x812 phone with touch and a mobile Safari user agent
    pub fn mobile() -> Self {
        Self {
            label: "mobile".to_string(),
            width: 375,
            height: 812,
            is_mobile: true,
            has_touch: true,
            user_agent: Some(MOBILE_USER_AGENT.to_string()),
        }
    }

    /// The default viewport set, in run order
    pub fn default_set() -> Vec<Self> {
        vec![Self::desktop(), Self::mobile()]
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.label.trim().is_empty() {
            return Err(Error::InvalidViewport {
                label: self.label.clone(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// File name prefix for snapshots taken under this viewport
    pub fn snapshot_prefix(&self) -> String {
        format!("{}-{}x{}", self.label, self.width, self.height)
    }

    /// Human heading, e.g. `Desktop (1440x900)`
    pub fn heading(&self) -> String {
        let mut chars = self.label.chars();
        let title = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{} ({}x{})", title, self.width, self.height)
    }
}

/// Aggregate counts and verdict for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passes: usize,
    pub fails: usize,
    pub warns: usize,
    pub passed: bool,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status() {
                Status::Pass => summary.passes += 1,
                Status::Fail => summary.fails += 1,
                Status::Warn => summary.warns += 1,
            }
        }
        summary.total = summary.passes + summary.fails + summary.warns;
        summary.passed = summary.fails == 0;
        summary
    }

    /// Process exit code for automation: 0 when nothing failed
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// Terminal artifact of a QA run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub url: String,
    pub mode: Mode,
    pub timestamp: DateTime<Utc>,
    /// Same as `summary.passed`, repeated at the top level for consumers
    /// that only read the verdict
    pub passed: bool,
    pub summary: RunSummary,
    pub results: Vec<Outcome>,
    pub screenshots: Vec<String>,
}

impl Report {
    pub fn new(url: impl Into<String>, mode: Mode, results: Vec<Outcome>, screenshots: Vec<String>) -> Self {
        let summary = RunSummary::from_outcomes(&results);
        Self {
            url: url.into(),
            mode,
            timestamp: Utc::now(),
            passed: summary.passed,
            summary,
            results,
            screenshots,
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }

    /// FAIL outcomes in run order
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.results.iter().filter(|o| o.is_fail())
    }
}
