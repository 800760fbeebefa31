//! One-shot scene construction for the two demos
//!
//! Each builder runs once at startup. The returned handles are what the
//! per-frame animations touch; nothing else in the scene changes afterwards.

use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::graph::{NodeId, Scene};
use crate::material::{Geometry, Material, Side, TextureDesc, TextureFilter};
use crate::node::{Fog, Light, Node};
use crate::transform::Transform;

// ============================================================================
// VR Scene
// ============================================================================

const VR_FOV_DEG: f32 = 55.0;
const VR_NEAR: f32 = 0.1;
const VR_FAR: f32 = 1000.0;
const VR_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 8.0, 30.0);

const CUBE_SIZE: f32 = 4.0;
const SPHERE_RADIUS: f32 = 3.0;
const SPHERE_WIDTH_SEGMENTS: u32 = 32;
const SPHERE_HEIGHT_SEGMENTS: u32 = 16;
const PLANE_WIDTH: f32 = 256.0;
const PLANE_HEIGHT: f32 = 128.0;
const PEBBLE_REPEAT: f32 = 16.0;

const PINK: u32 = 0xffc0cb;
const TAN: u32 = 0xd2b48c;
const GREY: u32 = 0x808080;

/// Nodes of the VR scene the render loop animates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrHandles {
    pub cube: NodeId,
    pub sphere: NodeId,
    pub light: NodeId,
    pub plane: NodeId,
}

/// Build the VR scene: a pink cube and a normal-mapped sphere under a
/// directional light aimed at a pebble plane
pub fn build_vr_scene(aspect: f32) -> (Scene, VrHandles) {
    let camera = PerspectiveCamera::new(VR_FOV_DEG, aspect, VR_NEAR, VR_FAR)
        .with_position(VR_CAMERA_POSITION);

    let mut scene = Scene::new(camera);
    scene.background = Some(Color::rgb(0.3, 0.5, 0.8));
    scene.fog = Some(Fog {
        color: Color::from_hex(GREY),
        near: 1.0,
        far: 90.0,
    });

    let cube = scene.add(
        Node::mesh(
            "cube",
            Geometry::cube(CUBE_SIZE),
            Material::phong(Color::from_hex(PINK)),
        )
        .with_transform(Transform::from_position(Vec3::new(
            CUBE_SIZE + 1.0,
            CUBE_SIZE + 1.0,
            0.0,
        ))),
    );

    let sphere_normal_map = TextureDesc::new("textures/sphere_normal.png").repeating();
    let sphere = scene.add(
        Node::mesh(
            "sphere",
            Geometry::Sphere {
                radius: SPHERE_RADIUS,
                width_segments: SPHERE_WIDTH_SEGMENTS,
                height_segments: SPHERE_HEIGHT_SEGMENTS,
            },
            Material::standard(Color::from_hex(TAN)).with_normal_map(sphere_normal_map),
        )
        .with_transform(Transform::from_position(Vec3::new(
            -SPHERE_RADIUS - 1.0,
            SPHERE_RADIUS + 2.0,
            0.0,
        ))),
    );

    // The plane only enters the scene as the directional light's target
    let pebbles = TextureDesc::new("textures/pebbles.png")
        .repeating()
        .with_repeat(PEBBLE_REPEAT, PEBBLE_REPEAT)
        .with_min_filter(TextureFilter::Nearest)
        .with_max_anisotropy();
    let pebbles_normal = TextureDesc::new("textures/pebbles_normal.png")
        .repeating()
        .with_repeat(PEBBLE_REPEAT, PEBBLE_REPEAT)
        .with_min_filter(TextureFilter::Nearest);
    let plane_material = Material::standard(Color::WHITE)
        .with_map(pebbles)
        .with_normal_map(pebbles_normal)
        .with_side(Side::Double);
    let plane = scene.add(
        Node::mesh(
            "plane",
            Geometry::Plane {
                width: PLANE_WIDTH,
                height: PLANE_HEIGHT,
            },
            plane_material,
        )
        .with_transform(Transform {
            position: Vec3::ZERO,
            rotation: Vec3::new(PI / 2.0, 0.0, 0.0),
        }),
    );

    let light = scene.add(
        Node::light(
            "sun",
            Light::Directional {
                color: Color::WHITE,
                intensity: 0.7,
                target: Some(plane),
            },
        )
        .with_transform(Transform::from_position(Vec3::new(0.0, 30.0, 30.0))),
    );

    scene.add(Node::light(
        "ambient",
        Light::Ambient {
            color: Color::WHITE,
            intensity: 0.2,
        },
    ));

    tracing::debug!("Built VR scene with {} nodes", scene.len());

    (
        scene,
        VrHandles {
            cube,
            sphere,
            light,
            plane,
        },
    )
}

// ============================================================================
// AR Scene
// ============================================================================

const AR_FOV_DEG: f32 = 70.0;
const AR_NEAR: f32 = 0.01;
const AR_FAR: f32 = 1000.0;
const AR_CUBE_SIZE: f32 = 0.2;
const BABY_BLUE: u32 = 0x89cff0;

/// Nodes of the AR scene the render loop animates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArHandles {
    pub cube: NodeId,
    pub light: NodeId,
}

/// Build the AR scene: one small cube lit by a hemisphere light, no background
/// so the camera passthrough stays visible
pub fn build_ar_scene(aspect: f32) -> (Scene, ArHandles) {
    let mut scene = Scene::new(PerspectiveCamera::new(AR_FOV_DEG, aspect, AR_NEAR, AR_FAR));

    let light = scene.add(
        Node::light(
            "hemisphere",
            Light::Hemisphere {
                sky: Color::WHITE,
                ground: Color::from_hex(0xbbbbff),
                intensity: 1.0,
            },
        )
        .with_transform(Transform::from_position(Vec3::new(0.5, 1.0, 0.25))),
    );

    let cube = scene.add(
        Node::mesh(
            "cube",
            Geometry::cube(AR_CUBE_SIZE),
            Material::phong(Color::from_hex(BABY_BLUE)),
        )
        .with_transform(Transform::from_position(Vec3::new(0.0, 0.2, 0.0))),
    );

    tracing::debug!("Built AR scene with {} nodes", scene.len());

    (scene, ArHandles { cube, light })
}
