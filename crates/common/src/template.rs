//! `{{KEY}}` placeholder substitution for the page template
//!
//! Values come from a `product.config` style file where each meaningful line
//! reads `KEY="value"`. Every other line is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static CONFIG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^([A-Z_0-9]+)="(.*)""#).expect("valid config line pattern"));

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[A-Z_0-9]+\}\}").expect("valid placeholder pattern"));

/// Parsed `KEY="value"` pairs in config order. A repeated key keeps its
/// first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    vars: Vec<(String, String)>,
}

impl TemplateVars {
    pub fn parse(config: &str) -> Self {
        let mut parsed = Self::default();
        for line in config.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(caps) = CONFIG_LINE.captures(line) {
                parsed.insert(&caps[1], &caps[2]);
            }
        }
        debug!("Parsed {} template variables", parsed.len());
        parsed
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.vars.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.vars.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Result of filling a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub output: String,
    /// Placeholders still present after substitution, in document order
    pub remaining: Vec<String>,
}

impl Substitution {
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Replace every `{{KEY}}` for every known key in config order, then scan
/// for leftovers. A value that itself contains a placeholder is only filled
/// if its key comes later in the config.
pub fn substitute(template: &str, vars: &TemplateVars) -> Substitution {
    let mut output = template.to_string();
    for (key, value) in vars.iter() {
        let placeholder = format!("{{{{{}}}}}", key);
        if output.contains(&placeholder) {
            output = output.replace(&placeholder, value);
        }
    }
    let remaining = find_placeholders(&output);
    Substitution { output, remaining }
}

/// All unresolved placeholders in `text`, duplicates included.
pub fn find_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// First-seen order, no duplicates.
pub fn unique_placeholders(found: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for placeholder in found {
        if !unique.contains(placeholder) {
            unique.push(placeholder.clone());
        }
    }
    unique
}
