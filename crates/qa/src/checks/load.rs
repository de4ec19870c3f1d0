use async_trait::async_trait;
use lander_common::Status;
use tracing::debug;

use super::{Check, CheckContext};
use crate::error::QaResult;
use crate::page::ScreenshotTarget;

const NAME: &str = "page-load";
const FIX: &str = "Check URL is correct and server is running";

/// Navigation must finish within the load timeout. Everything else depends
/// on it.
pub struct PageLoad;

#[async_trait]
impl Check for PageLoad {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_prerequisite(&self) -> bool {
        true
    }

    fn probe_failure(&self) -> Status {
        Status::Fail
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let timeout = cx.config.load_timeout();
        debug!("Loading {} (timeout {:?})", cx.target, timeout);

        let target = cx.target;
        match tokio::time::timeout(timeout, cx.page.goto(target, timeout)).await {
            Ok(Ok(())) => {
                cx.pass(NAME, "Page loaded successfully");
                cx.snapshot("full", ScreenshotTarget::FullPage).await;
            }
            Ok(Err(e)) => cx.fail(NAME, format!("Page failed to load: {}", e), FIX),
            Err(_) => cx.fail(
                NAME,
                format!("Page failed to load: timed out after {} ms", timeout.as_millis()),
                FIX,
            ),
        }
        Ok(())
    }
}
