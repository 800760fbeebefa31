//! Procedural scene animations
//!
//! Both animations are deterministic: the VR spin uses fixed per-frame
//! increments, the AR bob is a function of elapsed time plus a fixed turn.

use std::f32::consts::PI;

use glam::Vec3;
use xrdemo_scene::{ArHandles, NodeId, Scene, VrHandles};

/// Timestamp of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Scheduler timestamp in milliseconds
    pub millis: f64,
    /// Same timestamp in seconds
    pub seconds: f32,
    /// Zero-based frame counter
    pub frame: u64,
}

impl FrameTime {
    pub fn new(millis: f64, frame: u64) -> Self {
        Self {
            millis,
            seconds: (millis * 0.001) as f32,
            frame,
        }
    }
}

/// Per-frame transform update
pub trait Animation {
    fn update(&mut self, scene: &mut Scene, time: &FrameTime) -> xrdemo_scene::Result<()>;
}

impl Animation for Box<dyn Animation> {
    fn update(&mut self, scene: &mut Scene, time: &FrameTime) -> xrdemo_scene::Result<()> {
        (**self).update(scene, time)
    }
}

// ============================================================================
// VR: spinning cube and sphere, orbiting light
// ============================================================================

/// Rotation added per frame, in radians
pub const SPIN_STEP: f32 = 0.01;
/// Radius of the light's orbit
pub const LIGHT_ORBIT_RADIUS: f32 = 20.0;

/// VR scene animation
#[derive(Debug, Clone)]
pub struct SpinAnimation {
    pub cube: NodeId,
    pub sphere: NodeId,
    pub light: NodeId,
    pub step: f32,
    pub light_radius: f32,
}

impl SpinAnimation {
    pub fn new(handles: &VrHandles) -> Self {
        Self {
            cube: handles.cube,
            sphere: handles.sphere,
            light: handles.light,
            step: SPIN_STEP,
            light_radius: LIGHT_ORBIT_RADIUS,
        }
    }
}

impl Animation for SpinAnimation {
    fn update(&mut self, scene: &mut Scene, time: &FrameTime) -> xrdemo_scene::Result<()> {
        scene.transform_mut(self.cube)?.rotation += Vec3::splat(self.step);

        // The sphere's y axis is stepped twice and z not at all
        let sphere = scene.transform_mut(self.sphere)?;
        sphere.rotation.x += self.step;
        sphere.rotation.y += self.step;
        sphere.rotation.y += self.step;

        let light = scene.transform_mut(self.light)?;
        light.position.x = self.light_radius * time.seconds.cos();
        light.position.y = self.light_radius * time.seconds.sin();
        Ok(())
    }
}

// ============================================================================
// AR: bobbing, turning cube
// ============================================================================

/// AR scene animation
#[derive(Debug, Clone)]
pub struct BobAnimation {
    pub cube: NodeId,
    /// Peak vertical offset per frame, before the /100 damping
    pub amplitude: f32,
    /// Turn per frame around the local Y axis, in radians
    pub turn: f32,
}

impl BobAnimation {
    pub fn new(handles: &ArHandles) -> Self {
        Self {
            cube: handles.cube,
            amplitude: 0.2,
            turn: PI / 180.0,
        }
    }

    /// Vertical step applied at `seconds`
    pub fn offset_at(&self, seconds: f32) -> f32 {
        self.amplitude * seconds.sin() / 100.0
    }
}

impl Animation for BobAnimation {
    fn update(&mut self, scene: &mut Scene, time: &FrameTime) -> xrdemo_scene::Result<()> {
        let offset = self.offset_at(time.seconds);
        let cube = scene.transform_mut(self.cube)?;
        cube.translate_y(offset);
        cube.rotate_y(self.turn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrdemo_scene::{build_ar_scene, build_vr_scene};

    #[test]
    fn frame_time_rescales_to_seconds() {
        let time = FrameTime::new(1500.0, 3);
        assert!((time.seconds - 1.5).abs() < 1e-6);
        assert_eq!(time.frame, 3);
    }

    #[test]
    fn spin_steps_are_fixed() {
        let (mut scene, handles) = build_vr_scene(1.0);
        let mut spin = SpinAnimation::new(&handles);

        spin.update(&mut scene, &FrameTime::new(0.0, 0)).unwrap();
        spin.update(&mut scene, &FrameTime::new(5000.0, 1)).unwrap();

        let cube = scene.node(handles.cube).unwrap().transform.rotation;
        assert!((cube - Vec3::splat(0.02)).length() < 1e-6);

        let sphere = scene.node(handles.sphere).unwrap().transform.rotation;
        assert!((sphere.x - 0.02).abs() < 1e-6);
        assert!((sphere.y - 0.04).abs() < 1e-6);
        assert_eq!(sphere.z, 0.0);
    }

    #[test]
    fn light_orbits_with_elapsed_time() {
        let (mut scene, handles) = build_vr_scene(1.0);
        let mut spin = SpinAnimation::new(&handles);

        spin.update(&mut scene, &FrameTime::new(0.0, 0)).unwrap();
        let light = scene.node(handles.light).unwrap().transform.position;
        assert!((light.x - 20.0).abs() < 1e-5);
        assert!(light.y.abs() < 1e-5);
        // z is left where the builder put it
        assert_eq!(light.z, 30.0);

        let quarter = std::f64::consts::FRAC_PI_2 * 1000.0;
        spin.update(&mut scene, &FrameTime::new(quarter, 1)).unwrap();
        let light = scene.node(handles.light).unwrap().transform.position;
        assert!(light.x.abs() < 1e-4);
        assert!((light.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn bob_moves_and_turns_the_cube() {
        let (mut scene, handles) = build_ar_scene(1.0);
        let mut bob = BobAnimation::new(&handles);
        let start = scene.node(handles.cube).unwrap().transform;

        let time = FrameTime::new(1000.0, 0);
        bob.update(&mut scene, &time).unwrap();

        let after = scene.node(handles.cube).unwrap().transform;
        let expected = 0.2 * 1.0f32.sin() / 100.0;
        assert!((after.position.y - start.position.y - expected).abs() < 1e-6);
        assert!((after.rotation.y - PI / 180.0).abs() < 1e-6);
    }

    #[test]
    fn stale_handles_are_reported() {
        let (mut scene, handles) = build_ar_scene(1.0);
        let mut bob = BobAnimation::new(&handles);
        bob.cube = NodeId(99);
        assert!(bob.update(&mut scene, &FrameTime::new(0.0, 0)).is_err());
    }
}
