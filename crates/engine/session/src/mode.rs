//! Session modes, feature tokens and reference space types
//!
//! String forms match the WebXR tokens exactly, both for `Display` and serde.

use std::fmt;
use std::str::FromStr;

use crate::XrError;

/// Kind of XR session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    ImmersiveVr,
    ImmersiveAr,
    Inline,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImmersiveVr => "immersive-vr",
            Self::ImmersiveAr => "immersive-ar",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = XrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immersive-vr" => Ok(Self::ImmersiveVr),
            "immersive-ar" => Ok(Self::ImmersiveAr),
            "inline" => Ok(Self::Inline),
            other => Err(XrError::Platform(format!("unknown session mode '{other}'"))),
        }
    }
}

/// Spatial tracking feature token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionFeature {
    Viewer,
    Local,
    LocalFloor,
    BoundedFloor,
}

impl SessionFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Local => "local",
            Self::LocalFloor => "local-floor",
            Self::BoundedFloor => "bounded-floor",
        }
    }
}

impl fmt::Display for SessionFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features passed along with a session request
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionInit {
    /// The request fails if any of these is unavailable
    pub required_features: Vec<SessionFeature>,
    /// Granted when available, silently dropped otherwise
    pub optional_features: Vec<SessionFeature>,
}

impl SessionInit {
    pub fn required(features: &[SessionFeature]) -> Self {
        Self {
            required_features: features.to_vec(),
            optional_features: Vec::new(),
        }
    }

    pub fn optional(features: &[SessionFeature]) -> Self {
        Self {
            required_features: Vec::new(),
            optional_features: features.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.required_features.is_empty() && self.optional_features.is_empty()
    }
}

/// Reference space the renderer tracks poses in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceSpaceType {
    Viewer,
    Local,
    LocalFloor,
    BoundedFloor,
    Unbounded,
}

impl ReferenceSpaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Local => "local",
            Self::LocalFloor => "local-floor",
            Self::BoundedFloor => "bounded-floor",
            Self::Unbounded => "unbounded",
        }
    }
}

impl fmt::Display for ReferenceSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tokens() {
        assert_eq!(SessionMode::ImmersiveAr.to_string(), "immersive-ar");
        assert_eq!("inline".parse::<SessionMode>(), Ok(SessionMode::Inline));
        assert!("immersive-xr".parse::<SessionMode>().is_err());
    }

    #[test]
    fn feature_tokens() {
        assert_eq!(SessionFeature::LocalFloor.as_str(), "local-floor");
        assert_eq!(SessionFeature::BoundedFloor.to_string(), "bounded-floor");
        assert_eq!(ReferenceSpaceType::Local.to_string(), "local");
    }

    #[test]
    fn session_init_constructors() {
        let init = SessionInit::required(&[SessionFeature::Viewer, SessionFeature::Local]);
        assert_eq!(init.required_features.len(), 2);
        assert!(init.optional_features.is_empty());
        assert!(SessionInit::default().is_empty());
    }
}
