//! Perspective camera and display viewport

use glam::Vec3;

/// Size of the output surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height, or `None` for a degenerate (zero height) surface
    pub fn aspect(&self) -> Option<f32> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Perspective camera
///
/// Field of view is vertical and in degrees, matching the rendering library
/// the scene is mirrored into.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_deg,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Recompute the aspect ratio from the display size
    ///
    /// Returns true when the aspect actually changed. Zero-height viewports
    /// are ignored.
    pub fn fit_viewport(&mut self, viewport: Viewport) -> bool {
        match viewport.aspect() {
            Some(aspect) if (aspect - self.aspect).abs() > f32::EPSILON => {
                self.aspect = aspect;
                true
            }
            _ => false,
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_viewport_updates_aspect() {
        let mut camera = PerspectiveCamera::new(55.0, 1.0, 0.1, 1000.0);
        assert!(camera.fit_viewport(Viewport::new(1600, 800)));
        assert_eq!(camera.aspect, 2.0);
        // Same size again is a no-op
        assert!(!camera.fit_viewport(Viewport::new(1600, 800)));
    }

    #[test]
    fn zero_height_viewport_is_ignored() {
        let mut camera = PerspectiveCamera::new(55.0, 1.5, 0.1, 1000.0);
        assert!(!camera.fit_viewport(Viewport::new(640, 0)));
        assert_eq!(camera.aspect, 1.5);
    }
}
