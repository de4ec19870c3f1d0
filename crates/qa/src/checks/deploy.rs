//! Checks that only make sense against a deployed site

use async_trait::async_trait;
use lander_common::{Mode, Status};

use super::{Check, CheckContext};
use crate::config::Thresholds;
use crate::error::QaResult;

/// Grade a page load duration. Both bounds are inclusive on the warning side.
pub fn classify_load_time(load_ms: i64, thresholds: &Thresholds) -> Status {
    if load_ms > thresholds.speed_fail_ms {
        Status::Fail
    } else if load_ms >= thresholds.speed_warn_ms {
        Status::Warn
    } else {
        Status::Pass
    }
}

/// Load time from the navigation timing entry
pub struct PageSpeed;

#[async_trait]
impl Check for PageSpeed {
    fn name(&self) -> &'static str {
        "page-speed"
    }

    fn applies_to(&self, mode: Mode) -> bool {
        mode == Mode::PostDeploy
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let load_ms = match cx.page.navigation_timing().await? {
            Some(timing) if timing.load_ms > 0 => timing.load_ms,
            _ => {
                cx.warn(self.name(), "Navigation timing unavailable");
                return Ok(());
            }
        };

        let thresholds = &cx.config.thresholds;
        match classify_load_time(load_ms, thresholds) {
            Status::Pass => cx.pass(self.name(), format!("Load time: {}ms", load_ms)),
            Status::Warn => cx.warn(
                self.name(),
                format!(
                    "Load time: {}ms (target: <{}ms)",
                    load_ms, thresholds.speed_warn_ms
                ),
            ),
            Status::Fail => cx.fail(
                self.name(),
                format!(
                    "Load time: {}ms (over {}ms)",
                    load_ms, thresholds.speed_fail_ms
                ),
                "Optimize images, defer non-critical JS, enable compression",
            ),
        }
        Ok(())
    }
}

/// The deployed URL is served over HTTPS
pub struct SslCheck;

#[async_trait]
impl Check for SslCheck {
    fn name(&self) -> &'static str {
        "ssl-check"
    }

    fn applies_to(&self, mode: Mode) -> bool {
        mode == Mode::PostDeploy
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        if cx.target.starts_with("https://") {
            cx.pass(self.name(), "HTTPS URL confirmed");
        } else {
            cx.warn(self.name(), "Not using HTTPS");
        }
        Ok(())
    }
}
