//! Two-state toggle control
//!
//! The click handler is derived from the state, so exactly one handler is
//! attached at any time by construction.

use std::fmt;

use crate::config::ButtonLabels;

/// State of the toggle control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    /// No session; clicking requests one
    #[default]
    Idle,
    /// A session is running; clicking ends it
    Active,
}

impl fmt::Display for ToggleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Active => write!(f, "Active"),
        }
    }
}

/// Action a click performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickHandler {
    RequestSession,
    EndSession,
}

/// The session toggle button's model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    state: ToggleState,
    label: String,
    labels: ButtonLabels,
}

impl ToggleControl {
    /// New control in the idle state
    pub fn new(labels: ButtonLabels) -> Self {
        Self {
            state: ToggleState::Idle,
            label: labels.enter.clone(),
            labels,
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.state == ToggleState::Active
    }

    /// The one handler currently attached
    pub fn handler(&self) -> ClickHandler {
        match self.state {
            ToggleState::Idle => ClickHandler::RequestSession,
            ToggleState::Active => ClickHandler::EndSession,
        }
    }

    /// Idle → Active. Returns false if already active.
    pub fn activate(&mut self) -> bool {
        if self.state == ToggleState::Active {
            return false;
        }
        self.state = ToggleState::Active;
        self.label = self.labels.exit.clone();
        true
    }

    /// Active → Idle. Returns false if already idle.
    pub fn deactivate(&mut self) -> bool {
        if self.state == ToggleState::Idle {
            return false;
        }
        self.state = ToggleState::Idle;
        self.label = self.labels.reenter.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_follows_state() {
        let mut control = ToggleControl::new(ButtonLabels::vr());
        assert_eq!(control.state(), ToggleState::Idle);
        assert_eq!(control.handler(), ClickHandler::RequestSession);
        assert_eq!(control.label(), "Enter XR");

        assert!(control.activate());
        assert_eq!(control.handler(), ClickHandler::EndSession);
        assert_eq!(control.label(), "Exit XR");

        assert!(control.deactivate());
        assert_eq!(control.handler(), ClickHandler::RequestSession);
        assert_eq!(control.label(), "Enter XR");
    }

    #[test]
    fn transitions_are_idempotent() {
        let mut control = ToggleControl::new(ButtonLabels::ar());
        assert!(!control.deactivate());
        assert_eq!(control.label(), "Enter XR");

        assert!(control.activate());
        assert!(!control.activate());
        assert_eq!(control.label(), "STOP AR");

        assert!(control.deactivate());
        assert_eq!(control.label(), "START AR");
    }
}
