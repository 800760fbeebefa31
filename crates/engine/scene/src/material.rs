//! Geometry, material and texture descriptors
//!
//! These are plain descriptions. Loading images and building GPU buffers is
//! the rendering backend's job.

use glam::Vec2;

use crate::color::Color;

/// Primitive geometry
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
}

impl Geometry {
    /// Axis-aligned cube with the given edge length
    pub fn cube(size: f32) -> Self {
        Self::Box {
            width: size,
            height: size,
            depth: size,
        }
    }
}

/// Texture wrapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Wrapping {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
    LinearMipmapLinear,
}

/// Image texture loaded by URL
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextureDesc {
    pub url: String,
    pub wrap_s: Wrapping,
    pub wrap_t: Wrapping,
    pub repeat: Vec2,
    pub min_filter: TextureFilter,
    /// Use the renderer's maximum supported anisotropy
    pub max_anisotropy: bool,
}

impl TextureDesc {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            wrap_s: Wrapping::default(),
            wrap_t: Wrapping::default(),
            repeat: Vec2::ONE,
            min_filter: TextureFilter::LinearMipmapLinear,
            max_anisotropy: false,
        }
    }

    /// Repeat in both directions
    pub fn repeating(mut self) -> Self {
        self.wrap_s = Wrapping::Repeat;
        self.wrap_t = Wrapping::Repeat;
        self
    }

    pub fn with_repeat(mut self, u: f32, v: f32) -> Self {
        self.repeat = Vec2::new(u, v);
        self
    }

    pub fn with_min_filter(mut self, filter: TextureFilter) -> Self {
        self.min_filter = filter;
        self
    }

    pub fn with_max_anisotropy(mut self) -> Self {
        self.max_anisotropy = true;
        self
    }
}

/// Which faces get rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Shading model
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MaterialKind {
    /// Blinn-Phong shading
    Phong,
    /// Physically based metallic/roughness shading
    Standard,
}

/// Surface material
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub map: Option<TextureDesc>,
    pub normal_map: Option<TextureDesc>,
    pub side: Side,
}

impl Material {
    pub fn phong(color: Color) -> Self {
        Self {
            kind: MaterialKind::Phong,
            color,
            map: None,
            normal_map: None,
            side: Side::Front,
        }
    }

    pub fn standard(color: Color) -> Self {
        Self {
            kind: MaterialKind::Standard,
            ..Self::phong(color)
        }
    }

    pub fn with_map(mut self, map: TextureDesc) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_normal_map(mut self, normal_map: TextureDesc) -> Self {
        self.normal_map = Some(normal_map);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Every texture this material references
    pub fn textures(&self) -> impl Iterator<Item = &TextureDesc> {
        self.map.iter().chain(self.normal_map.iter())
    }
}
