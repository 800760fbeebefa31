//! Simulation configuration
//!
//! Loaded from TOML; every field is optional.
//!
//! ```toml
//! variant = "ar"
//! frames = 300
//! end_after_frames = 120
//!
//! [session]
//! mode = "immersive-ar"
//! prepare_surface = true
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use xrdemo_render::DemoVariant;
use xrdemo_scene::Viewport;
use xrdemo_session::sim::SimBehavior;
use xrdemo_session::{SessionConfig, SessionMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Demo to run
    pub variant: DemoVariant,
    /// Whether the platform supports the demo's session mode
    pub supported: bool,
    /// Serve the simulated page securely; otherwise the XR API is hidden
    pub secure_context: bool,
    /// Reject every session request
    pub reject_requests: bool,
    /// Fail the AR surface preparation
    pub fail_surface: bool,
    /// Frames to run after the session start click
    pub frames: u32,
    /// Gap between frame timestamps
    pub frame_interval_ms: f64,
    /// End the session from the platform side after this many frames
    pub end_after_frames: Option<u32>,
    /// Display size reported to the render driver
    pub display: Viewport,
    /// Replaces the variant's session preset
    pub session: Option<SessionConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            variant: DemoVariant::Vr,
            supported: true,
            secure_context: true,
            reject_requests: false,
            fail_surface: false,
            frames: 120,
            frame_interval_ms: 1000.0 / 60.0,
            end_after_frames: None,
            display: Viewport::default(),
            session: None,
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn session_config(&self) -> SessionConfig {
        self.session
            .clone()
            .unwrap_or_else(|| self.variant.session_config())
    }

    /// Platform answers implied by this configuration
    pub fn behavior(&self) -> SimBehavior {
        let mode = self.session_config().mode;
        let mut supported_modes = vec![SessionMode::Inline];
        if self.supported && mode != SessionMode::Inline {
            supported_modes.push(mode);
        }

        SimBehavior {
            xr_available: self.secure_context,
            secure_context: self.secure_context,
            supported_modes,
            reject_requests: self.reject_requests,
            fail_support_query: false,
        }
    }
}
