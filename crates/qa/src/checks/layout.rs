//! Page structure and layout checks

use async_trait::async_trait;
use tracing::debug;

use super::{Check, CheckContext, Region};
use crate::config::SelectorList;
use crate::error::QaResult;
use crate::page::ScreenshotTarget;

/// Header and footer share one rule: rendered with height passes and is
/// snapshotted, collapsed fails, missing only warns.
async fn landmark(
    cx: &mut CheckContext<'_>,
    name: &str,
    selectors: &SelectorList,
    region: &str,
    missing: &str,
    fix: &str,
) -> QaResult<()> {
    let selector = selectors.union();
    match cx.region(&selector).await? {
        Region::Rendered(bounds) => {
            cx.pass(name, format!("{} height: {}px", title(region), bounds.height.round()));
            cx.snapshot(region, ScreenshotTarget::Element { selector, index: 0 })
                .await;
        }
        Region::Collapsed => cx.fail(name, format!("{} has zero height", title(region)), fix),
        Region::Missing => cx.warn(name, missing),
    }
    Ok(())
}

fn title(region: &str) -> String {
    let mut chars = region.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct HeaderVisible;

#[async_trait]
impl Check for HeaderVisible {
    fn name(&self) -> &'static str {
        "header-visible"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selectors = cx.config.selectors.header.clone();
        landmark(
            cx,
            self.name(),
            &selectors,
            "header",
            "No header element found",
            "Check sections/03-header.html CSS",
        )
        .await
    }
}

pub struct FooterPresent;

#[async_trait]
impl Check for FooterPresent {
    fn name(&self) -> &'static str {
        "footer-present"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selectors = cx.config.selectors.footer.clone();
        landmark(
            cx,
            self.name(),
            &selectors,
            "footer",
            "No footer element found",
            "Check sections/22-footer.html",
        )
        .await
    }
}

/// The main product block must exist and be reasonably tall
pub struct ProductSection;

#[async_trait]
impl Check for ProductSection {
    fn name(&self) -> &'static str {
        "product-section"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selector = cx.config.selectors.product.union();
        let min_height = f64::from(cx.config.thresholds.product_min_height_px);
        let max_clip = f64::from(cx.config.thresholds.product_snapshot_max_px);

        match cx.region(&selector).await? {
            Region::Rendered(bounds) if bounds.height > min_height => {
                cx.pass(
                    self.name(),
                    format!("Product section height: {}px", bounds.height.round()),
                );
                cx.snapshot("product", ScreenshotTarget::Clip(bounds.clipped(max_clip)))
                    .await;
            }
            Region::Rendered(_) | Region::Collapsed => cx.fail(
                self.name(),
                "Product section too small or hidden",
                "Check sections/05-main-product.html",
            ),
            Region::Missing => cx.fail(
                self.name(),
                "Product section not found",
                "Verify sections/05-main-product.html is included in the build",
            ),
        }
        Ok(())
    }
}

/// Rendered width must stay within the viewport plus a small tolerance
pub struct NoOverflow;

#[async_trait]
impl Check for NoOverflow {
    fn name(&self) -> &'static str {
        "no-overflow"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let body_width = cx.page.scroll_width().await?;
        let viewport_width = cx.viewport.width;
        let tolerance = cx.config.thresholds.overflow_tolerance_px;

        if body_width > viewport_width.saturating_add(tolerance) {
            cx.fail(
                self.name(),
                format!(
                    "Body width ({}px) exceeds viewport ({}px) by {}px",
                    body_width,
                    viewport_width,
                    body_width - viewport_width
                ),
                "Check for elements with fixed widths or missing overflow:hidden in CSS",
            );
        } else {
            cx.pass(
                self.name(),
                format!(
                    "No horizontal overflow (body: {}px, viewport: {}px)",
                    body_width, viewport_width
                ),
            );
        }
        Ok(())
    }
}

/// Snapshot each named landing page section that is present. Never records
/// an outcome.
pub struct SectionSnapshots;

#[async_trait]
impl Check for SectionSnapshots {
    fn name(&self) -> &'static str {
        "section-snapshots"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let sections = cx.config.selectors.sections.clone();
        for section in sections {
            let selector = section.selectors.union();
            match cx.region(&selector).await {
                Ok(Region::Rendered(_)) => {
                    cx.snapshot(&section.id, ScreenshotTarget::Element { selector, index: 0 })
                        .await;
                }
                Ok(_) => debug!("Section {} not present", section.id),
                Err(e) => debug!("Section {} probe failed: {}", section.id, e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title() {
        assert_eq!(title("header"), "Header");
        assert_eq!(title(""), "");
    }
}
