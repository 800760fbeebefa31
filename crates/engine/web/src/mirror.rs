//! three.js mirror of a scene
//!
//! The scene model stays the single source of truth. [`ThreeScene`] builds
//! the matching three.js objects once and copies transforms and the camera
//! aspect over before every draw.

use js_sys::{Object, Reflect};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use xrdemo_scene::{
    Color, Geometry, Light, Material, MaterialKind, Mesh, NodeId, NodeKind, Scene, Side,
    TextureDesc, TextureFilter, Transform, Wrapping,
};

use crate::three;
use crate::{Result, WebError};

/// three.js objects for one [`Scene`]
pub struct ThreeScene {
    pub scene: three::Scene,
    pub camera: three::PerspectiveCamera,
    objects: Vec<(NodeId, three::Object3D)>,
    aspect: f32,
}

impl ThreeScene {
    /// Build the three.js graph
    ///
    /// `max_anisotropy` is applied to textures that ask for it.
    pub fn build(source: &Scene, max_anisotropy: f32) -> Result<Self> {
        let scene = three::Scene::new();
        if let Some(background) = source.background {
            scene.set_background(&color(background));
        }
        if let Some(fog) = source.fog {
            scene.set_fog(&three::Fog::new(&color(fog.color), fog.near, fog.far));
        }

        let cam = &source.camera;
        let camera = three::PerspectiveCamera::new(cam.fov_deg, cam.aspect, cam.near, cam.far);
        camera
            .position()
            .set(cam.position.x, cam.position.y, cam.position.z);

        let loader = three::TextureLoader::new();
        let mut objects = Vec::with_capacity(source.len());
        for (id, node) in source.iter() {
            let object = match &node.kind {
                NodeKind::Mesh(mesh) => build_mesh(mesh, &loader, max_anisotropy)?,
                NodeKind::Light(light) => build_light(light),
            };
            object.set_name(&node.name);
            apply_transform(&object, &node.transform);
            scene.add(&object);
            objects.push((id, object));
        }

        let mirror = Self {
            scene,
            camera,
            objects,
            aspect: cam.aspect,
        };
        mirror.link_light_targets(source)?;
        debug!("Built three.js scene with {} objects", mirror.objects.len());
        Ok(mirror)
    }

    fn object(&self, id: NodeId) -> Option<&three::Object3D> {
        self.objects
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, object)| object)
    }

    fn link_light_targets(&self, source: &Scene) -> Result<()> {
        for (id, light) in source.lights() {
            if let Light::Directional {
                target: Some(target),
                ..
            } = light
            {
                let light = self
                    .object(id)
                    .ok_or(WebError::Scene(xrdemo_scene::SceneError::UnknownNode(id)))?;
                let target = self
                    .object(*target)
                    .ok_or(WebError::Scene(xrdemo_scene::SceneError::UnknownNode(*target)))?;
                light
                    .unchecked_ref::<three::DirectionalLight>()
                    .set_target(target);
            }
        }
        Ok(())
    }

    /// Copy transforms and the camera aspect from `source`
    pub fn sync(&mut self, source: &Scene) {
        for (id, object) in &self.objects {
            if let Some(node) = source.node(*id) {
                apply_transform(object, &node.transform);
            }
        }

        let aspect = source.camera.aspect;
        if (aspect - self.aspect).abs() > f32::EPSILON {
            self.camera.set_aspect(aspect);
            self.camera.update_projection_matrix();
            self.aspect = aspect;
        }
    }
}

fn color(color: Color) -> three::Color {
    three::Color::new(color.to_hex())
}

fn apply_transform(object: &three::Object3D, transform: &Transform) {
    let p = transform.position;
    let r = transform.rotation;
    object.position().set(p.x, p.y, p.z);
    object.rotation().set(r.x, r.y, r.z);
}

fn build_mesh(mesh: &Mesh, loader: &three::TextureLoader, max_anisotropy: f32) -> Result<three::Object3D> {
    let geometry: three::BufferGeometry = match mesh.geometry {
        Geometry::Box {
            width,
            height,
            depth,
        } => three::BoxGeometry::new(width, height, depth).into(),
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        } => three::SphereGeometry::new(radius, width_segments, height_segments).into(),
        Geometry::Plane { width, height } => three::PlaneGeometry::new(width, height).into(),
    };

    let material = build_material(&mesh.material, loader, max_anisotropy)?;
    Ok(three::Mesh::new(&geometry, &material).into())
}

fn build_material(
    material: &Material,
    loader: &three::TextureLoader,
    max_anisotropy: f32,
) -> Result<three::Material> {
    let params = Object::new();
    Reflect::set(&params, &"color".into(), &color(material.color))?;
    Reflect::set(&params, &"side".into(), &side(material.side).into())?;
    if let Some(map) = &material.map {
        Reflect::set(&params, &"map".into(), &load_texture(map, loader, max_anisotropy))?;
    }
    if let Some(normal_map) = &material.normal_map {
        Reflect::set(
            &params,
            &"normalMap".into(),
            &load_texture(normal_map, loader, max_anisotropy),
        )?;
    }

    Ok(match material.kind {
        MaterialKind::Phong => three::MeshPhongMaterial::new(&params).into(),
        MaterialKind::Standard => three::MeshStandardMaterial::new(&params).into(),
    })
}

fn load_texture(desc: &TextureDesc, loader: &three::TextureLoader, max_anisotropy: f32) -> JsValue {
    let texture = loader.load(&desc.url);
    texture.set_wrap_s(wrapping(desc.wrap_s));
    texture.set_wrap_t(wrapping(desc.wrap_t));
    texture.repeat().set(desc.repeat.x, desc.repeat.y);
    texture.set_min_filter(filter(desc.min_filter));
    if desc.max_anisotropy {
        texture.set_anisotropy(max_anisotropy);
    }
    texture.into()
}

fn wrapping(wrapping: Wrapping) -> u32 {
    match wrapping {
        Wrapping::ClampToEdge => three::CLAMP_TO_EDGE_WRAPPING,
        Wrapping::Repeat => three::REPEAT_WRAPPING,
        Wrapping::MirroredRepeat => three::MIRRORED_REPEAT_WRAPPING,
    }
}

fn filter(filter: TextureFilter) -> u32 {
    match filter {
        TextureFilter::Nearest => three::NEAREST_FILTER,
        TextureFilter::Linear => three::LINEAR_FILTER,
        TextureFilter::LinearMipmapLinear => three::LINEAR_MIPMAP_LINEAR_FILTER,
    }
}

fn side(side: Side) -> u32 {
    match side {
        Side::Front => three::FRONT_SIDE,
        Side::Back => three::BACK_SIDE,
        Side::Double => three::DOUBLE_SIDE,
    }
}

fn build_light(light: &Light) -> three::Object3D {
    match light {
        Light::Directional {
            color: c,
            intensity,
            ..
        } => three::DirectionalLight::new(&color(*c), *intensity).into(),
        Light::Ambient {
            color: c,
            intensity,
        } => three::AmbientLight::new(&color(*c), *intensity).into(),
        Light::Hemisphere {
            sky,
            ground,
            intensity,
        } => three::HemisphereLight::new(&color(*sky), &color(*ground), *intensity).into(),
    }
}
