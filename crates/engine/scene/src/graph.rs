//! Scene container
//!
//! Nodes live in insertion order under a single root. Handles are indices and
//! stay valid for the scene's lifetime because nodes are never removed.

use std::fmt;

use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::node::{Fog, Light, Mesh, Node, NodeKind};
use crate::transform::Transform;
use crate::{Result, SceneError};

/// Handle to a node in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A complete scene: environment, camera and nodes
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub background: Option<Color>,
    pub fog: Option<Fog>,
    pub camera: PerspectiveCamera,
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new(camera: PerspectiveCamera) -> Self {
        Self {
            background: None,
            fog: None,
            camera,
            nodes: Vec::new(),
        }
    }

    /// Insert a node under the root
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        tracing::trace!("Scene: added node {} '{}'", id, node.name);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Mutable access to a node's transform, or an error for a stale handle
    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform> {
        self.node_mut(id)
            .map(|node| &mut node.transform)
            .ok_or(SceneError::UnknownNode(id))
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// All nodes with their handles
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> {
        self.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Mesh(mesh) => Some((id, mesh)),
            NodeKind::Light(_) => None,
        })
    }

    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &Light)> {
        self.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Light(light) => Some((id, light)),
            NodeKind::Mesh(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Geometry, Material};

    fn sample_scene() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new(PerspectiveCamera::default());
        let cube = scene.add(Node::mesh(
            "cube",
            Geometry::cube(1.0),
            Material::phong(Color::WHITE),
        ));
        let light = scene.add(Node::light(
            "ambient",
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.2,
            },
        ));
        (scene, cube, light)
    }

    #[test]
    fn add_and_find() {
        let (scene, cube, light) = sample_scene();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.find("cube"), Some(cube));
        assert_eq!(scene.find("ambient"), Some(light));
        assert_eq!(scene.find("missing"), None);
        assert_eq!(scene.meshes().count(), 1);
        assert_eq!(scene.lights().count(), 1);
    }

    #[test]
    fn stale_handle_is_an_error() {
        let (mut scene, _, _) = sample_scene();
        assert!(matches!(
            scene.transform_mut(NodeId(42)),
            Err(SceneError::UnknownNode(NodeId(42)))
        ));
    }
}
