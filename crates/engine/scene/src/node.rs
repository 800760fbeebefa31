//! Scene nodes

use crate::color::Color;
use crate::graph::NodeId;
use crate::material::{Geometry, Material};
use crate::transform::Transform;

/// Renderable mesh: geometry plus material
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

/// Light source
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Light {
    /// Parallel light shining from its position towards `target`
    Directional {
        color: Color,
        intensity: f32,
        target: Option<NodeId>,
    },
    /// Uniform light from all directions
    Ambient { color: Color, intensity: f32 },
    /// Sky/ground gradient light
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
}

/// What a node is
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    Mesh(Mesh),
    Light(Light),
}

/// A named node in the scene
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
}

impl Node {
    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh(Mesh { geometry, material }),
            transform: Transform::default(),
        }
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Light(light),
            transform: Transform::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}
