//! Rendered content and load-time error checks

use async_trait::async_trait;
use lander_common::{find_placeholders, unique_placeholders};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Check, CheckContext};
use crate::error::QaResult;
use crate::page::FailedRequest;

static IMAGE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(webp|png|jpg|jpeg|svg|gif)").expect("valid image pattern"));

pub(crate) fn is_image_url(url: &str) -> bool {
    IMAGE_URL.is_match(url)
}

/// Last path segment without query or fragment
pub(crate) fn basename(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// No `{{KEY}}` left in the rendered text
pub struct NoPlaceholders;

#[async_trait]
impl Check for NoPlaceholders {
    fn name(&self) -> &'static str {
        "no-placeholders"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let text = cx.page.body_text().await?;
        let found = find_placeholders(&text);

        if found.is_empty() {
            cx.pass(self.name(), "Zero raw placeholders");
        } else {
            let unique = unique_placeholders(&found);
            let shown: Vec<&str> = unique.iter().take(5).map(String::as_str).collect();
            cx.fail(
                self.name(),
                format!("{} raw placeholders found: {}", found.len(), shown.join(", ")),
                "Fill in missing values in product.config and rebuild with `lander build`",
            );
        }
        Ok(())
    }
}

/// No console errors, uncaught exceptions or unhandled rejections
pub struct ConsoleErrors;

#[async_trait]
impl Check for ConsoleErrors {
    fn name(&self) -> &'static str {
        "no-console-errors"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let errors: Vec<String> = cx
            .events()
            .await?
            .script_errors()
            .into_iter()
            .map(str::to_string)
            .collect();

        if errors.is_empty() {
            cx.pass(self.name(), "Zero JS console errors");
        } else {
            let shown: Vec<&str> = errors.iter().take(3).map(String::as_str).collect();
            cx.fail(
                self.name(),
                format!("{} JS errors: {}", errors.len(), shown.join(" | ")),
                "Fix the JavaScript errors in the page scripts (sections/23-scripts.html)",
            );
        }
        Ok(())
    }
}

/// Failed sub-resource requests. Image failures fail the run; anything else
/// is a secondary warning.
pub struct RequestFailures;

#[async_trait]
impl Check for RequestFailures {
    fn name(&self) -> &'static str {
        "no-image-404s"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let (images, others): (Vec<FailedRequest>, Vec<FailedRequest>) = cx
            .events()
            .await?
            .failed_requests
            .iter()
            .cloned()
            .partition(|r| is_image_url(&r.url));

        if images.is_empty() {
            cx.pass(self.name(), "All image requests succeeded");
        } else {
            let shown: Vec<&str> = images.iter().take(5).map(|r| basename(&r.url)).collect();
            cx.fail(
                self.name(),
                format!("{} broken images: {}", images.len(), shown.join(", ")),
                "Missing images in images/ directory. Check IMAGE-MAPPING.md for required files.",
            );
        }

        if !others.is_empty() {
            let shown: Vec<&str> = others.iter().take(3).map(|r| r.url.as_str()).collect();
            cx.warn(
                "no-other-404s",
                format!("{} non-image 404s: {}", others.len(), shown.join(", ")),
            );
        }
        Ok(())
    }
}

/// Every content image decoded to a nonzero intrinsic size
pub struct ImagesNotBroken;

#[async_trait]
impl Check for ImagesNotBroken {
    fn name(&self) -> &'static str {
        "images-not-broken"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selector = cx.config.selectors.images.clone();
        let images = cx.page.images(&selector).await?;
        let broken: Vec<&str> = images
            .iter()
            .filter(|i| i.is_broken())
            .map(|i| i.src.as_deref().unwrap_or("<no src>"))
            .collect();

        if !broken.is_empty() {
            let shown: Vec<&str> = broken.iter().take(5).copied().collect();
            cx.fail(
                self.name(),
                format!("{} broken image(s): {}", broken.len(), shown.join(", ")),
                "Replace missing images or check file paths in sections/*.html",
            );
        } else if images.is_empty() {
            cx.warn(
                self.name(),
                "No images with src=\"images/\" found - may be a template-only build",
            );
        } else {
            cx.pass(self.name(), format!("{} images loaded correctly", images.len()));
        }
        Ok(())
    }
}
