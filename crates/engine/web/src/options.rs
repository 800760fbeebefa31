//! Per-demo `WebGLRenderer` construction options

use xrdemo_render::DemoVariant;

/// three.js `SRGBColorSpace`
pub const SRGB_COLOR_SPACE: &str = "srgb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    pub antialias: bool,
    /// Transparent clear so the camera passthrough shows
    pub alpha: bool,
    /// Value for `outputColorSpace`, or the library default
    pub output_color_space: Option<&'static str>,
}

impl RendererOptions {
    pub fn for_variant(variant: DemoVariant) -> Self {
        match variant {
            DemoVariant::Vr => Self {
                antialias: true,
                alpha: false,
                output_color_space: Some(SRGB_COLOR_SPACE),
            },
            DemoVariant::Ar => Self {
                antialias: true,
                alpha: true,
                output_color_space: None,
            },
        }
    }
}
