//! Session controller configuration
//!
//! The two demos differ only in data: mode, feature strictness, labels and
//! whether the rendering surface needs explicit preparation. Both presets are
//! available as constructors and the whole struct deserializes from TOML.

use crate::mode::{ReferenceSpaceType, SessionFeature, SessionInit, SessionMode};

/// Labels shown by the toggle control
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ButtonLabels {
    /// Label when the control is first created
    pub enter: String,
    /// Label while a session is active
    pub exit: String,
    /// Label after a session has ended
    pub reenter: String,
}

impl ButtonLabels {
    pub fn new(enter: &str, exit: &str, reenter: &str) -> Self {
        Self {
            enter: enter.to_string(),
            exit: exit.to_string(),
            reenter: reenter.to_string(),
        }
    }

    pub fn vr() -> Self {
        Self::new("Enter XR", "Exit XR", "Enter XR")
    }

    // The AR control starts as "Enter XR" and only switches to "START AR"
    // once a session has ended.
    pub fn ar() -> Self {
        Self::new("Enter XR", "STOP AR", "START AR")
    }
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self::vr()
    }
}

/// Configuration for a [`SessionController`](crate::SessionController)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Immersive mode to query and request
    pub mode: SessionMode,
    /// Features sent with the session request
    pub init: SessionInit,
    /// Reference space applied to the renderer when a session starts
    pub reference_space: Option<ReferenceSpaceType>,
    /// Toggle control labels
    pub labels: ButtonLabels,
    /// Mode probed for diagnostics when `mode` is unsupported
    pub fallback_probe: Option<SessionMode>,
    /// Make the rendering surface XR compatible before binding the session
    pub prepare_surface: bool,
}

impl SessionConfig {
    /// Immersive VR: optional floor tracking, renderer manages its own layer
    pub fn vr() -> Self {
        Self {
            mode: SessionMode::ImmersiveVr,
            init: SessionInit::optional(&[
                SessionFeature::LocalFloor,
                SessionFeature::BoundedFloor,
            ]),
            reference_space: None,
            labels: ButtonLabels::vr(),
            fallback_probe: None,
            prepare_surface: false,
        }
    }

    /// Immersive AR: required viewer/local tracking, explicit surface setup
    pub fn ar() -> Self {
        Self {
            mode: SessionMode::ImmersiveAr,
            init: SessionInit::required(&[SessionFeature::Viewer, SessionFeature::Local]),
            reference_space: Some(ReferenceSpaceType::Local),
            labels: ButtonLabels::ar(),
            fallback_probe: Some(SessionMode::Inline),
            prepare_surface: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::vr()
    }
}
