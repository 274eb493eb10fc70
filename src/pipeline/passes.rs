use crate::core::math::transform::TransformFactory;
use crate::io::config::{Config, DebugConfig};
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::debug_vector::{DebugVectorShader, TbnRecords};
use crate::pipeline::shaders::lit::LitShader;
use crate::pipeline::shaders::unlit::{UnlitMode, UnlitShader};
use crate::scene::camera::CameraState;
use crate::scene::context::RenderContext;
use crate::scene::mesh::Mesh;
use crate::scene::scene_object::SceneObject;
use log::{debug, info};
use nalgebra::Vector3;

const TANGENT_COLOR: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);
const BITANGENT_COLOR: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
const NORMAL_COLOR: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);

/// Draws one complete frame: lit objects, then the enabled debug overlays.
pub fn render_frame(config: &Config, context: &RenderContext, renderer: &mut Renderer) {
    info!(
        "Rendering {}x{} (x{} SSAA) with {:?}",
        config.render.width, config.render.height, config.render.samples, config.pipeline
    );
    renderer.clear(Vector3::from(config.render.clear_color));
    renderer.rasterizer.cull_mode = config.render.cull_mode;
    renderer.rasterizer.wireframe = false;
    renderer.rasterizer.depth_bias = 0.0;

    let camera = context.camera.state();
    render_lit_pass(config, context, &camera, renderer);

    if config.debug.light_marker {
        render_light_marker(&config.debug, context, &camera, renderer);
    }
    if config.debug.geometry {
        render_wireframe_overlay(&config.debug, &context.objects, &camera, renderer);
    }
    if config.debug.vectors {
        let glyph = Mesh::create_arrow(12);
        for (object, records) in context.objects.iter().zip(&context.debug_vectors) {
            render_debug_vectors(&config.debug, object, records, &glyph, &camera, renderer);
        }
    }
    info!("Frame finished");
}

pub fn render_lit_pass(
    config: &Config,
    context: &RenderContext,
    camera: &CameraState,
    renderer: &Renderer,
) {
    for object in &context.objects {
        let shader = LitShader::new(
            *camera,
            context.light,
            object.transform,
            &object.material,
            config.pipeline,
        );
        let triangles = renderer.draw_mesh(&object.mesh, &shader);
        debug!(
            "lit draw '{}': {} triangles",
            object.material.name, triangles
        );
    }
}

/// Octahedron at the light position, flat-colored with the light's diffuse color.
pub fn render_light_marker(
    debug_config: &DebugConfig,
    context: &RenderContext,
    camera: &CameraState,
    renderer: &Renderer,
) {
    let marker = Mesh::create_octahedron(1.0);
    let model = TransformFactory::model(
        &context.light.position.coords,
        &Vector3::zeros(),
        debug_config.light_marker_scale,
    );
    let shader = UnlitShader::new(
        *camera,
        model,
        UnlitMode::FlatColor(context.light.diffuse_color),
    );
    let triangles = renderer.draw_mesh(&marker, &shader);
    debug!("light marker: {} triangles", triangles);
}

/// Black edges drawn over the objects, pulled forward by the depth bias.
pub fn render_wireframe_overlay(
    debug_config: &DebugConfig,
    objects: &[SceneObject],
    camera: &CameraState,
    renderer: &mut Renderer,
) {
    renderer.rasterizer.wireframe = true;
    renderer.rasterizer.depth_bias = debug_config.wireframe_depth_bias;
    for object in objects {
        let shader = UnlitShader::new(*camera, object.transform, UnlitMode::Black);
        let triangles = renderer.draw_mesh(&object.mesh, &shader);
        debug!("wireframe overlay: {} triangles", triangles);
    }
    renderer.rasterizer.wireframe = false;
    renderer.rasterizer.depth_bias = 0.0;
}

/// Glyphs for the tangent (blue), bitangent (green) and normal (red) of
/// every vertex of `object`.
pub fn render_debug_vectors(
    debug_config: &DebugConfig,
    object: &SceneObject,
    records: &TbnRecords,
    glyph: &Mesh,
    camera: &CameraState,
    renderer: &Renderer,
) {
    let sets = [
        ("tangent", &records.tangents, TANGENT_COLOR),
        ("bitangent", &records.bitangents, BITANGENT_COLOR),
        ("normal", &records.normals, NORMAL_COLOR),
    ];
    for (label, set, color) in sets {
        let shader = DebugVectorShader::new(*camera, object.transform, set, color)
            .with_glyph_scale(debug_config.glyph_scale);
        let instances = 0..shader.instance_count();
        let triangles = renderer.draw_mesh_instanced(glyph, &shader, instances);
        debug!(
            "debug {} vectors: {} instances, {} triangles",
            label,
            shader.instance_count(),
            triangles
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::test_util::assert_vec_eq;
    use crate::scene::loader::load_scene;
    use crate::shading::config::{PipelineConfig, SpecularPolicy, TangentSpaceMode};
    use nalgebra::Vector4;

    fn small_config(mesh: &str) -> Config {
        let mut config = Config::default();
        config.render.width = 48;
        config.render.height = 32;
        config.object.mesh = mesh.to_string();
        config.debug.light_marker = false;
        config
    }

    fn render(config: &Config) -> Renderer {
        let context = load_scene(config).unwrap();
        let mut renderer = Renderer::new(config.render.width, config.render.height, 1);
        render_frame(config, &context, &mut renderer);
        renderer
    }

    fn pixels(renderer: &Renderer) -> Vec<Vector4<f32>> {
        let fb = &renderer.framebuffer;
        (0..fb.height)
            .flat_map(|y| (0..fb.width).map(move |x| (x, y)))
            .filter_map(|(x, y)| fb.get_pixel(x, y))
            .collect()
    }

    fn clear_color(config: &Config) -> Vector4<f32> {
        let c = config.render.clear_color;
        Vector4::new(c[0], c[1], c[2], 1.0)
    }

    #[test]
    fn sphere_covers_the_center_with_opaque_color() {
        let config = small_config("sphere");
        let renderer = render(&config);
        let center = renderer.framebuffer.get_pixel(24, 16).unwrap();
        assert_ne!(center, clear_color(&config));
        assert_eq!(center.w, 1.0);
        assert!(pixels(&renderer).iter().all(|p| p.iter().all(|c| c.is_finite() && *c >= 0.0)));
    }

    #[test]
    fn both_tangent_space_modes_render_the_same_plane() {
        let mut world = small_config("plane");
        world.pipeline = PipelineConfig {
            specular: SpecularPolicy::Plain,
            ..PipelineConfig::fragment_tbn()
        };
        let mut projected = world.clone();
        projected.pipeline.tangent_space = TangentSpaceMode::PerVertexProjected;

        let a = pixels(&render(&world));
        let b = pixels(&render(&projected));
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_vec_eq(pa.xyz(), pb.xyz(), 1e-3);
        }
    }

    #[test]
    fn wireframe_overlay_draws_black_edges() {
        let mut config = small_config("sphere");
        config.debug.geometry = true;
        let renderer = render(&config);
        let black = Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(pixels(&renderer).contains(&black));
    }

    #[test]
    fn debug_vectors_draw_basis_colors() {
        let mut config = small_config("plane");
        config.render.width = 96;
        config.render.height = 64;
        config.debug.vectors = true;
        config.debug.glyph_scale = 2.0;
        let renderer = render(&config);
        let all = pixels(&renderer);
        // Normals stand up from the corners, tangents run along +X.
        assert!(all.contains(&NORMAL_COLOR.push(1.0)));
        assert!(all.contains(&TANGENT_COLOR.push(1.0)));
    }

    #[test]
    fn light_marker_uses_light_color() {
        let mut config = small_config("plane");
        config.debug.light_marker = true;
        config.debug.light_marker_scale = 0.3;
        config.light.position = [0.0, 1.0, 1.0];
        config.light.diffuse = [1.0, 1.0, 0.0];
        let renderer = render(&config);
        assert!(pixels(&renderer).contains(&Vector4::new(1.0, 1.0, 0.0, 1.0)));
    }
}
