//! Scene description for the xrdemo VR and AR demos
//!
//! This crate describes the tiny 3D scenes the demos show. It never talks to a
//! GPU: the browser backend mirrors a [`Scene`] into the rendering library and
//! copies node transforms across on every frame.
//!
//! # Modules
//!
//! - [`builders`]: one-shot constructors for the VR and AR scenes
//! - [`camera`]: perspective camera and viewport
//! - [`color`]: linear RGB color with CSS name lookup
//! - [`graph`]: the [`Scene`] container and node handles
//! - [`material`]: geometry, material and texture descriptors
//! - [`node`]: scene nodes (meshes and lights)
//! - [`transform`]: position + Euler rotation with object-local operations

pub mod builders;
pub mod camera;
pub mod color;
pub mod graph;
pub mod material;
pub mod node;
pub mod transform;

pub use builders::{build_ar_scene, build_vr_scene, ArHandles, VrHandles};
pub use camera::{PerspectiveCamera, Viewport};
pub use color::Color;
pub use graph::{NodeId, Scene};
pub use material::{Geometry, Material, MaterialKind, Side, TextureDesc, TextureFilter, Wrapping};
pub use node::{Fog, Light, Mesh, Node, NodeKind};
pub use transform::Transform;

/// Error types for scene access
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Unknown scene node: {0}")]
    UnknownNode(NodeId),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
