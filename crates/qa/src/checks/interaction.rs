//! Checks that click things

use std::time::Duration;

use async_trait::async_trait;
use lander_common::{Disclosure, WidgetEvent, WidgetState};
use tracing::debug;

use super::{Check, CheckContext};
use crate::bind::{bind_if_present, Capabilities};
use crate::error::QaResult;
use crate::page::ScreenshotTarget;

const FAQ_SETTLE: Duration = Duration::from_millis(500);
const BUNDLE_SETTLE: Duration = Duration::from_millis(300);
const DRAWER_SETTLE: Duration = Duration::from_millis(500);

/// At least one add-to-cart / buy control is visible
pub struct CtaButtons;

#[async_trait]
impl Check for CtaButtons {
    fn name(&self) -> &'static str {
        "cta-buttons"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selector = cx.config.selectors.cta.union();
        let found = cx.page.count(&selector).await?;

        if found == 0 {
            cx.fail(
                self.name(),
                "No CTA buttons found",
                "Check sections/05-main-product.html for add-to-cart buttons",
            );
            return Ok(());
        }

        let mut visible = 0;
        for index in 0..found.min(cx.config.thresholds.cta_probe_limit) {
            match cx.page.is_visible(&selector, index).await {
                Ok(true) => visible += 1,
                Ok(false) => {}
                Err(e) => debug!("CTA #{} visibility probe failed: {}", index, e),
            }
        }

        if visible > 0 {
            cx.pass(
                self.name(),
                format!("{} CTA button(s) visible and clickable", visible),
            );
        } else {
            cx.fail(
                self.name(),
                "CTA buttons exist but none are visible",
                "Check CSS display/visibility on Add to Cart buttons",
            );
        }
        Ok(())
    }
}

/// Enough FAQ items, and the first one reacts to a click
pub struct FaqAccordion;

#[async_trait]
impl Check for FaqAccordion {
    fn name(&self) -> &'static str {
        "faq-accordion"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selector = cx.config.selectors.faq.union();
        let minimum = cx.config.thresholds.faq_min_items;
        let found = cx.page.count(&selector).await?;

        if found >= minimum {
            let clicked = match cx.page.click(&selector, 0).await {
                Ok(()) => cx.page.wait(FAQ_SETTLE).await,
                Err(e) => Err(e),
            };
            match clicked {
                Ok(()) => {
                    cx.pass(
                        self.name(),
                        format!("{} FAQ items found, accordion clickable", found),
                    );
                    cx.snapshot("faq", ScreenshotTarget::Viewport).await;
                }
                Err(e) => cx.warn(
                    self.name(),
                    format!("FAQ items exist but click failed: {}", e),
                ),
            }
        } else if found > 0 {
            cx.warn(
                self.name(),
                format!("Only {} FAQ items (expected {}+)", found, minimum),
            );
        } else {
            cx.fail(
                self.name(),
                "No FAQ accordion elements found",
                "Check sections/14-faq.html",
            );
        }
        Ok(())
    }
}

/// Enough offer cards, and the first one is selectable
pub struct BundleSelector;

#[async_trait]
impl Check for BundleSelector {
    fn name(&self) -> &'static str {
        "bundle-selector"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selector = cx.config.selectors.bundle.union();
        let minimum = cx.config.thresholds.bundle_min_items;
        let found = cx.page.count(&selector).await?;

        if found >= minimum {
            let clicked = match cx.page.click(&selector, 0).await {
                Ok(()) => cx.page.wait(BUNDLE_SETTLE).await,
                Err(e) => Err(e),
            };
            match clicked {
                Ok(()) => cx.pass(
                    self.name(),
                    format!("{} bundle options found, clickable", found),
                ),
                Err(e) => cx.warn(
                    self.name(),
                    format!("Bundle cards exist but click failed: {}", e),
                ),
            }
        } else {
            cx.warn(
                self.name(),
                format!("Found {} bundle cards (expected {}+)", found, minimum),
            );
        }
        Ok(())
    }
}

/// The cart trigger opens a visible drawer and the drawer's close control
/// dismisses it again.
///
/// The expected drawer state is tracked with a [`Disclosure`]; a mismatch
/// between expected and observed visibility after closing is reported as a
/// secondary `cart-drawer-close` warning.
pub struct CartDrawer;

impl CartDrawer {
    const CLOSE: &'static str = "cart-drawer-close";
}

#[async_trait]
impl Check for CartDrawer {
    fn name(&self) -> &'static str {
        "cart-drawer"
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> QaResult<()> {
        let selectors = cx.config.selectors.clone();

        let Some(trigger) =
            bind_if_present(&mut *cx.page, selectors.cart_trigger.candidates(), Capabilities::CLICKABLE)
                .await
        else {
            cx.warn(self.name(), "No cart trigger button found");
            return Ok(());
        };

        let mut drawer = Disclosure::new();
        if let Err(e) = trigger.click(&mut *cx.page).await {
            cx.warn(self.name(), format!("Cart trigger click failed: {}", e));
            return Ok(());
        }
        drawer.handle(WidgetEvent::TriggerClick);
        cx.page.wait(DRAWER_SETTLE).await?;

        let drawer_selector = selectors.cart_drawer.union();
        if cx.page.count(&drawer_selector).await? == 0 {
            cx.warn(self.name(), "Cart trigger clicked but no drawer element found");
            return Ok(());
        }

        let observed = observed_state(cx.page.is_visible(&drawer_selector, 0).await?);
        if observed != drawer.state() {
            cx.warn(self.name(), "Cart drawer exists but not visible after click");
            return Ok(());
        }

        cx.pass(self.name(), "Cart drawer opens on click");
        cx.snapshot("cart-open", ScreenshotTarget::Viewport).await;

        let Some(close) =
            bind_if_present(&mut *cx.page, selectors.cart_close.candidates(), Capabilities::CLOSABLE)
                .await
        else {
            cx.warn(Self::CLOSE, "No close control found on cart drawer");
            return Ok(());
        };

        let dismissed = match close.dismiss(&mut *cx.page).await {
            Ok(()) => cx.page.wait(DRAWER_SETTLE).await,
            Err(e) => Err(e),
        };
        if let Err(e) = dismissed {
            cx.warn(Self::CLOSE, format!("Cart drawer close click failed: {}", e));
            return Ok(());
        }
        drawer.handle(WidgetEvent::CloseClick);

        match cx.page.is_visible(&drawer_selector, 0).await.map(observed_state) {
            Ok(observed) if observed != drawer.state() => cx.warn(
                Self::CLOSE,
                format!("Cart drawer still {} after close control click", observed),
            ),
            Ok(_) => {}
            Err(e) => cx.warn(Self::CLOSE, format!("Cart drawer state unknown after close: {}", e)),
        }
        Ok(())
    }
}

fn observed_state(visible: bool) -> WidgetState {
    if visible {
        WidgetState::Open
    } else {
        WidgetState::Closed
    }
}
