//! Per-viewport outcome accumulation

use lander_common::{Outcome, Status};

/// Ordered outcomes of one viewport run. Append-only.
#[derive(Debug, Clone)]
pub struct Recorder {
    viewport: String,
    outcomes: Vec<Outcome>,
}

impl Recorder {
    pub fn new(viewport: impl Into<String>) -> Self {
        Self {
            viewport: viewport.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &str {
        &self.viewport
    }

    pub fn pass(&mut self, name: &str, detail: impl Into<String>) {
        self.outcomes.push(Outcome::pass(name, detail, self.viewport.as_str()));
    }

    pub fn fail(&mut self, name: &str, detail: impl Into<String>, fix: impl Into<String>) {
        self.outcomes
            .push(Outcome::fail(name, detail, fix, self.viewport.as_str()));
    }

    pub fn warn(&mut self, name: &str, detail: impl Into<String>) {
        self.outcomes.push(Outcome::warn(name, detail, self.viewport.as_str()));
    }

    pub fn record(&mut self, name: &str, status: Status, detail: impl Into<String>, fix: Option<String>) {
        self.outcomes
            .push(Outcome::new(name, status, detail, fix, self.viewport.as_str()));
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Outcomes appended at or after position `from`
    pub fn since(&self, from: usize) -> &[Outcome] {
        &self.outcomes[from.min(self.outcomes.len())..]
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        self.outcomes
    }
}
