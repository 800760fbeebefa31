//! three.js bindings
//!
//! Only the constructors, properties and methods the demos call. three.js is
//! expected as the global `THREE`.

use js_sys::{Function, Object, Promise};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, XrSession};

// Constant values from three.js `constants.js`
pub const REPEAT_WRAPPING: u32 = 1000;
pub const CLAMP_TO_EDGE_WRAPPING: u32 = 1001;
pub const MIRRORED_REPEAT_WRAPPING: u32 = 1002;
pub const NEAREST_FILTER: u32 = 1003;
pub const LINEAR_FILTER: u32 = 1006;
pub const LINEAR_MIPMAP_LINEAR_FILTER: u32 = 1008;
pub const FRONT_SIDE: u32 = 0;
pub const BACK_SIDE: u32 = 1;
pub const DOUBLE_SIDE: u32 = 2;

// ============================================================================
// Math
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    pub type Vector2;

    #[wasm_bindgen(method)]
    pub fn set(this: &Vector2, x: f32, y: f32) -> Vector2;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    pub type Vector3;

    #[wasm_bindgen(method)]
    pub fn set(this: &Vector3, x: f32, y: f32, z: f32) -> Vector3;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    pub type Euler;

    #[wasm_bindgen(method)]
    pub fn set(this: &Euler, x: f32, y: f32, z: f32) -> Euler;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    pub type Color;

    /// Packed sRGB `0xRRGGBB`, converted into the working color space
    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(hex: u32) -> Color;
}

// ============================================================================
// Scene graph
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    #[derive(Clone)]
    pub type Object3D;

    #[wasm_bindgen(method, getter)]
    pub fn position(this: &Object3D) -> Vector3;

    #[wasm_bindgen(method, getter)]
    pub fn rotation(this: &Object3D) -> Euler;

    #[wasm_bindgen(method, setter)]
    pub fn set_name(this: &Object3D, name: &str);

    #[wasm_bindgen(method)]
    pub fn add(this: &Object3D, child: &Object3D) -> Object3D;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    #[derive(Clone)]
    pub type Scene;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new() -> Scene;

    #[wasm_bindgen(method, setter)]
    pub fn set_background(this: &Scene, color: &Color);

    #[wasm_bindgen(method, setter)]
    pub fn set_fog(this: &Scene, fog: &Fog);

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Fog;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(color: &Color, near: f32, far: f32) -> Fog;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    #[derive(Clone)]
    pub type PerspectiveCamera;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> PerspectiveCamera;

    #[wasm_bindgen(method, setter)]
    pub fn set_aspect(this: &PerspectiveCamera, aspect: f32);

    #[wasm_bindgen(method, js_name = updateProjectionMatrix)]
    pub fn update_projection_matrix(this: &PerspectiveCamera);
}

// ============================================================================
// Geometry, materials, textures
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    pub type BufferGeometry;

    #[wasm_bindgen(js_namespace = THREE, extends = BufferGeometry)]
    pub type BoxGeometry;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(width: f32, height: f32, depth: f32) -> BoxGeometry;

    #[wasm_bindgen(js_namespace = THREE, extends = BufferGeometry)]
    pub type SphereGeometry;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> SphereGeometry;

    #[wasm_bindgen(js_namespace = THREE, extends = BufferGeometry)]
    pub type PlaneGeometry;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(width: f32, height: f32) -> PlaneGeometry;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Material;

    #[wasm_bindgen(js_namespace = THREE, extends = Material)]
    pub type MeshPhongMaterial;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(parameters: &Object) -> MeshPhongMaterial;

    #[wasm_bindgen(js_namespace = THREE, extends = Material)]
    pub type MeshStandardMaterial;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(parameters: &Object) -> MeshStandardMaterial;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Texture;

    #[wasm_bindgen(method, setter = wrapS)]
    pub fn set_wrap_s(this: &Texture, wrapping: u32);

    #[wasm_bindgen(method, setter = wrapT)]
    pub fn set_wrap_t(this: &Texture, wrapping: u32);

    #[wasm_bindgen(method, setter = minFilter)]
    pub fn set_min_filter(this: &Texture, filter: u32);

    #[wasm_bindgen(method, setter)]
    pub fn set_anisotropy(this: &Texture, anisotropy: f32);

    #[wasm_bindgen(method, getter)]
    pub fn repeat(this: &Texture) -> Vector2;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type TextureLoader;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new() -> TextureLoader;

    #[wasm_bindgen(method)]
    pub fn load(this: &TextureLoader, url: &str) -> Texture;
}

// ============================================================================
// Meshes and lights
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type Mesh;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(geometry: &BufferGeometry, material: &Material) -> Mesh;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type DirectionalLight;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(color: &Color, intensity: f32) -> DirectionalLight;

    #[wasm_bindgen(method, setter)]
    pub fn set_target(this: &DirectionalLight, target: &Object3D);

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type AmbientLight;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(color: &Color, intensity: f32) -> AmbientLight;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type HemisphereLight;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(sky: &Color, ground: &Color, intensity: f32) -> HemisphereLight;
}

// ============================================================================
// Renderer
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    #[derive(Clone)]
    pub type WebGLRenderer;

    #[wasm_bindgen(constructor, js_namespace = THREE, catch)]
    pub fn new(parameters: &Object) -> Result<WebGLRenderer, JsValue>;

    #[wasm_bindgen(method, js_name = setPixelRatio)]
    pub fn set_pixel_ratio(this: &WebGLRenderer, ratio: f64);

    #[wasm_bindgen(method, js_name = setSize)]
    pub fn set_size(this: &WebGLRenderer, width: u32, height: u32);

    #[wasm_bindgen(method, setter = outputColorSpace)]
    pub fn set_output_color_space(this: &WebGLRenderer, space: &str);

    #[wasm_bindgen(method)]
    pub fn render(this: &WebGLRenderer, scene: &Scene, camera: &PerspectiveCamera);

    #[wasm_bindgen(method)]
    pub fn clear(this: &WebGLRenderer, color: bool, depth: bool, stencil: bool);

    #[wasm_bindgen(method, js_name = setAnimationLoop)]
    pub fn set_animation_loop(this: &WebGLRenderer, callback: Option<&Function>);

    #[wasm_bindgen(method, getter = domElement)]
    pub fn dom_element(this: &WebGLRenderer) -> HtmlCanvasElement;

    #[wasm_bindgen(method, js_name = getContext)]
    pub fn get_context(this: &WebGLRenderer) -> JsValue;

    #[wasm_bindgen(method, getter)]
    pub fn capabilities(this: &WebGLRenderer) -> WebGLCapabilities;

    #[wasm_bindgen(method, getter)]
    pub fn xr(this: &WebGLRenderer) -> WebXRManager;

    pub type WebGLCapabilities;

    #[wasm_bindgen(method, js_name = getMaxAnisotropy)]
    pub fn get_max_anisotropy(this: &WebGLCapabilities) -> f32;

    pub type WebXRManager;

    #[wasm_bindgen(method, setter)]
    pub fn set_enabled(this: &WebXRManager, enabled: bool);

    #[wasm_bindgen(method, js_name = setReferenceSpaceType)]
    pub fn set_reference_space_type(this: &WebXRManager, space: &str);

    #[wasm_bindgen(method, js_name = setSession)]
    pub fn set_session(this: &WebXRManager, session: &XrSession) -> Promise;
}
