use crate::core::math::transform::TransformFactory;
use crate::error::Result;
use crate::io::config::{CameraConfig, Config, LightConfig, MaterialConfig, ProjectionKind};
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use crate::scene::mesh::MeshKind;
use crate::scene::scene_object::SceneObject;
use crate::scene::texture::{ColorSpace, Texture};
use log::info;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Builds the frame described by `config`, loading any textures it names.
pub fn load_scene(config: &Config) -> Result<RenderContext> {
    config.validate()?;
    let aspect_ratio = config.render.width as f32 / config.render.height as f32;
    let camera = build_camera(&config.camera, aspect_ratio);
    let light = build_light(&config.light);

    let kind: MeshKind = config.object.mesh.parse()?;
    let mesh = kind.build();
    let transform = TransformFactory::model(
        &Vector3::from(config.object.position),
        &Vector3::from(config.object.rotation),
        config.object.scale,
    );
    let material = build_material(&config.material)?;
    info!(
        "Scene: {:?} mesh ({} triangles), material '{}'",
        kind,
        mesh.triangle_count(),
        material.name
    );

    Ok(RenderContext::new(
        camera,
        light,
        vec![SceneObject::new(mesh, material, transform)],
    ))
}

pub fn build_camera(config: &CameraConfig, aspect_ratio: f32) -> Camera {
    let position = Point3::from(config.position);
    let target = Point3::from(config.target);
    let up = Vector3::from(config.up);
    match config.projection {
        ProjectionKind::Perspective => Camera::new_perspective(
            position,
            target,
            up,
            config.fov.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        ),
        ProjectionKind::Orthographic => Camera::new_orthographic(
            position,
            target,
            up,
            config.ortho_height,
            aspect_ratio,
            config.near,
            config.far,
        ),
    }
}

pub fn build_light(config: &LightConfig) -> PointLight {
    PointLight::new(
        Point3::from(config.position),
        Vector3::from(config.ambient),
        Vector3::from(config.diffuse),
        Vector3::from(config.specular),
    )
}

/// Diffuse maps are decoded as sRGB, normal maps are read as linear data.
pub fn build_material(config: &MaterialConfig) -> Result<Material> {
    let mut material = Material::new(
        "config",
        Vector3::from(config.ambient),
        Vector3::from(config.diffuse),
        Vector3::from(config.specular),
    );
    if let Some(path) = &config.diffuse_texture {
        let texture = Texture::load(path, ColorSpace::Srgb, config.sampler)?;
        material = material.with_diffuse_texture(Arc::new(texture));
    }
    if let Some(path) = &config.normal_texture {
        let texture = Texture::load(path, ColorSpace::Linear, config.sampler)?;
        material = material.with_normal_texture(Arc::new(texture));
    }
    Ok(material)
}
