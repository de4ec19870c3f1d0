//! Bind-if-present control registration
//!
//! Landing pages vary in which widgets they ship. A control is resolved from
//! an ordered candidate list; when none matches, binding yields `None` and
//! the caller simply has nothing to drive.

use tracing::debug;

use crate::error::{QaError, QaResult};
use crate::page::Page;

/// What the harness may do with a bound control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub clickable: bool,
    pub closable: bool,
}

impl Capabilities {
    pub const CLICKABLE: Self = Self { clickable: true, closable: false };
    pub const CLOSABLE: Self = Self { clickable: true, closable: true };
}

/// A page control resolved to the first matching candidate selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    selector: String,
    capabilities: Capabilities,
}

impl Control {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub async fn click(&self, page: &mut dyn Page) -> QaResult<()> {
        if !self.capabilities.clickable {
            return Err(QaError::Probe(format!("{} is not bound as clickable", self.selector)));
        }
        page.click(&self.selector, 0).await
    }

    /// Click the control as a dismiss action
    pub async fn dismiss(&self, page: &mut dyn Page) -> QaResult<()> {
        if !self.capabilities.closable {
            return Err(QaError::Probe(format!("{} is not bound as closable", self.selector)));
        }
        page.click(&self.selector, 0).await
    }
}

/// Resolve the first candidate present on the page. Lookup errors on one
/// candidate fall through to the next.
pub async fn bind_if_present(
    page: &mut dyn Page,
    candidates: &[String],
    capabilities: Capabilities,
) -> Option<Control> {
    for selector in candidates {
        match page.count(selector).await {
            Ok(n) if n > 0 => {
                return Some(Control {
                    selector: selector.clone(),
                    capabilities,
                })
            }
            Ok(_) => {}
            Err(e) => debug!("Selector {} not resolvable: {}", selector, e),
        }
    }
    None
}
