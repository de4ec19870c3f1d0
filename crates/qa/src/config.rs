//! Harness configuration
//!
//! Every field has a default matching the stock landing page template, so
//! `qa.toml` only needs the values a project wants to change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lander_common::ViewportConfig;
use serde::{Deserialize, Serialize};

use crate::error::{QaError, QaResult};
use crate::playwright::BrowserConfig;

/// Ordered selector candidates for one page element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorList(pub Vec<String>);

impl SelectorList {
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(selectors.into_iter().map(Into::into).collect())
    }

    /// All candidates as one CSS union, matched in document order
    pub fn union(&self) -> String {
        self.0.join(", ")
    }

    pub fn candidates(&self) -> &[String] {
        &self.0
    }
}

/// A named landing page section captured by the section snapshot pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSelector {
    pub id: String,
    pub selectors: SelectorList,
}

impl SectionSelector {
    fn new(id: &str, selectors: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            selectors: SelectorList::new(selectors.iter().copied()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub header: SelectorList,
    pub product: SelectorList,
    pub footer: SelectorList,
    pub cta: SelectorList,
    pub faq: SelectorList,
    pub bundle: SelectorList,
    pub images: String,
    pub cart_trigger: SelectorList,
    pub cart_drawer: SelectorList,
    pub cart_close: SelectorList,
    pub sections: Vec<SectionSelector>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            header: SelectorList::new(["#shopify-section-header", "header", ".header"]),
            product: SelectorList::new(["#shopify-section-template--17453745111139__main", ".product"]),
            footer: SelectorList::new(["footer", ".footer", "#shopify-section-footer"]),
            cta: SelectorList::new([
                "[data-action=\"add-to-cart\"]",
                ".product-form__submit",
                "button:has-text(\"Add\")",
                "button:has-text(\"BUY\")",
                ".btn-add-to-cart",
            ]),
            faq: SelectorList::new(["details", ".faq-item", "[data-accordion]"]),
            bundle: SelectorList::new([".bundle-card", "[data-offer]"]),
            images: "img[src*=\"images/\"]".to_string(),
            cart_trigger: SelectorList::new([
                "[data-cart-toggle]",
                ".cart-icon",
                "a[href=\"/cart\"]",
                ".header__icon--cart",
            ]),
            cart_drawer: SelectorList::new([".cart-drawer", "#cart-drawer", "[data-cart-drawer]"]),
            cart_close: SelectorList::new([".cart-drawer__close", "[data-cart-close]", ".drawer__close"]),
            sections: vec![
                SectionSelector::new(
                    "comparison",
                    &["#comparison-section", ".comparison-section", "[id*=\"comparison\"]"],
                ),
                SectionSelector::new(
                    "features",
                    &["#features-section", ".features-section", "[id*=\"features\"]", "[id*=\"fibs\"]"],
                ),
                SectionSelector::new(
                    "founder",
                    &["#founder-section", ".founder-section", "[id*=\"founder\"]"],
                ),
                SectionSelector::new(
                    "testimonials",
                    &["#testimonials-section", ".testimonials", "[id*=\"testimonial\"]"],
                ),
                SectionSelector::new(
                    "awards",
                    &["#awards-section", ".awards-carousel", "[id*=\"awards\"]"],
                ),
            ],
        }
    }
}

/// Numeric limits the checks compare against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Allowed horizontal overflow in px
    pub overflow_tolerance_px: u32,
    /// Minimum rendered height of the product region
    pub product_min_height_px: u32,
    /// Product snapshot clip height
    pub product_snapshot_max_px: u32,
    pub faq_min_items: usize,
    pub bundle_min_items: usize,
    /// How many CTA matches are probed for visibility
    pub cta_probe_limit: usize,
    /// Loads at or above this are borderline
    pub speed_warn_ms: i64,
    /// Loads above this fail
    pub speed_fail_ms: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            overflow_tolerance_px: 5,
            product_min_height_px: 100,
            product_snapshot_max_px: 2000,
            faq_min_items: 3,
            bundle_min_items: 2,
            cta_probe_limit: 3,
            speed_warn_ms: 3000,
            speed_fail_ms: 5000,
        }
    }
}

/// QA harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Viewports in run order
    pub viewports: Vec<ViewportConfig>,

    /// Page-load timeout; the only timed operation
    pub load_timeout_ms: u64,

    /// Snapshot output directory
    pub screenshot_dir: PathBuf,

    /// Machine-readable report path
    pub report_path: PathBuf,

    pub browser: BrowserConfig,

    pub thresholds: Thresholds,

    pub selectors: Selectors,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            viewports: ViewportConfig::default_set(),
            load_timeout_ms: 30_000,
            screenshot_dir: PathBuf::from("qa-screenshots"),
            report_path: PathBuf::from("qa-report.json"),
            browser: BrowserConfig::default(),
            thresholds: Thresholds::default(),
            selectors: Selectors::default(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from file; a missing file means defaults
    pub fn load(path: &Path) -> QaResult<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QaResult<()> {
        if self.viewports.is_empty() {
            return Err(QaError::Config("at least one viewport is required".to_string()));
        }
        for viewport in &self.viewports {
            viewport.validate()?;
        }
        let mut labels: Vec<&str> = self.viewports.iter().map(|v| v.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        if labels.len() != self.viewports.len() {
            return Err(QaError::Config("viewport labels must be unique".to_string()));
        }
        if self.load_timeout_ms == 0 {
            return Err(QaError::Config("load_timeout_ms must be positive".to_string()));
        }
        if self.thresholds.speed_warn_ms > self.thresholds.speed_fail_ms {
            return Err(QaError::Config(
                "speed_warn_ms must not exceed speed_fail_ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}
