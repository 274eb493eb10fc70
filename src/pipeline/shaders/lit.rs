use crate::core::color::opaque;
use crate::core::geometry::{Vertex, transform_position};
use crate::core::pipeline::{Interpolatable, Shader};
use crate::scene::camera::CameraState;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use crate::shading::config::{PipelineConfig, TangentSpaceMode};
use crate::shading::lighting::{
    LightingParams, Shade, evaluate, tangent_space_directions, world_space_directions,
};
use crate::shading::material::{MaterialBinding, resolve_diffuse, resolve_normal};
use crate::shading::tangent_space::{TangentSpacePoints, Tbn, build_tbn, project_points};
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Interpolated per-fragment inputs of the lit pipeline.
///
/// Only one group is populated, depending on the tangent-space mode: the
/// world-space basis for `WorldSpace`, the three tangent-space points for
/// `PerVertexProjected`. The other group stays zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct LitVarying {
    pub uv: Vector2<f32>,
    pub world_pos: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub bitangent: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub ts_light: Vector3<f32>,
    pub ts_view: Vector3<f32>,
    pub ts_fragment: Vector3<f32>,
}

impl Add for LitVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            uv: self.uv + other.uv,
            world_pos: self.world_pos + other.world_pos,
            tangent: self.tangent + other.tangent,
            bitangent: self.bitangent + other.bitangent,
            normal: self.normal + other.normal,
            ts_light: self.ts_light + other.ts_light,
            ts_view: self.ts_view + other.ts_view,
            ts_fragment: self.ts_fragment + other.ts_fragment,
        }
    }
}

impl Mul<f32> for LitVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            uv: self.uv * scalar,
            world_pos: self.world_pos * scalar,
            tangent: self.tangent * scalar,
            bitangent: self.bitangent * scalar,
            normal: self.normal * scalar,
            ts_light: self.ts_light * scalar,
            ts_view: self.ts_view * scalar,
            ts_fragment: self.ts_fragment * scalar,
        }
    }
}

impl Interpolatable for LitVarying {}

/// Normal-mapped Blinn-Phong surface shader in either tangent-space mode.
pub struct LitShader {
    pub camera: CameraState,
    pub light: PointLight,
    pub model: Matrix4<f32>,
    pub material: MaterialBinding,
    pub config: PipelineConfig,
    params: LightingParams,
}

impl LitShader {
    pub fn new(
        camera: CameraState,
        light: PointLight,
        model: Matrix4<f32>,
        material: &Material,
        config: PipelineConfig,
    ) -> Self {
        Self {
            camera,
            light,
            model,
            material: MaterialBinding::resolve(material),
            params: LightingParams::from(&config),
            config,
        }
    }

    /// The fragment stage before the color is made opaque.
    pub fn shade(&self, varying: &LitVarying) -> Shade {
        let base_color = resolve_diffuse(&self.material, varying.uv);
        let normal = resolve_normal(&self.material, varying.uv, self.config.normal_decode);

        let directions = match self.config.tangent_space {
            TangentSpaceMode::PerVertexProjected => tangent_space_directions(&TangentSpacePoints {
                light: varying.ts_light,
                view: varying.ts_view,
                fragment: varying.ts_fragment,
            }),
            TangentSpaceMode::WorldSpace => {
                let tbn = Tbn::from_basis(varying.tangent, varying.bitangent, varying.normal);
                world_space_directions(
                    &tbn,
                    &self.light.position,
                    &self.camera.view_position,
                    &Point3::from(varying.world_pos),
                )
            }
        };

        evaluate(&normal, &directions, &self.light, &base_color, &self.params)
    }
}

impl Shader for LitShader {
    type Varying = LitVarying;

    fn vertex(&self, vertex: &Vertex, _instance: u32) -> (Vector4<f32>, Self::Varying) {
        let (clip, world) =
            transform_position(&vertex.position, &self.model, &self.camera.view_projection);
        let tbn = build_tbn(&vertex.normal, &vertex.tangent, &vertex.bitangent, &self.model);

        let mut varying = LitVarying {
            uv: vertex.texcoord,
            world_pos: world.coords,
            ..LitVarying::default()
        };
        match self.config.tangent_space {
            TangentSpaceMode::PerVertexProjected => {
                let points =
                    project_points(&tbn, &self.light.position, &self.camera.view_position, &world);
                varying.ts_light = points.light;
                varying.ts_view = points.view;
                varying.ts_fragment = points.fragment;
            }
            TangentSpaceMode::WorldSpace => {
                varying.tangent = tbn.tangent();
                varying.bitangent = tbn.bitangent();
                varying.normal = tbn.normal();
            }
        }

        (clip, varying)
    }

    fn fragment(&self, varying: Self::Varying) -> Vector4<f32> {
        opaque(self.shade(&varying).color)
    }
}
