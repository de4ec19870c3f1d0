//! Lander Common Library
//!
//! Shared types and utilities for the Lander landing-page tooling: the QA
//! outcome model, template substitution, checkout price tiers and the
//! widget state machines the page scripts are modelled on.

pub mod error;
pub mod pricing;
pub mod template;
pub mod types;
pub mod widget;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pricing::{nearest_tier, AUTHORIZED_TIERS};
pub use template::{find_placeholders, substitute, unique_placeholders, Substitution, TemplateVars};
pub use types::*;
pub use widget::{Disclosure, Slider, WidgetEvent, WidgetState};

/// Lander version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
