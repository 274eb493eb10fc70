use crate::pipeline::shaders::debug_vector::TbnRecords;
use crate::scene::camera::Camera;
use crate::scene::light::PointLight;
use crate::scene::scene_object::SceneObject;

/// Everything one frame reads. Shaders borrow from it; nothing mutates it
/// while a frame is drawn.
pub struct RenderContext {
    pub camera: Camera,
    pub light: PointLight,
    pub objects: Vec<SceneObject>,
    /// Per-object glyph records, parallel to `objects`.
    pub debug_vectors: Vec<TbnRecords>,
}

impl RenderContext {
    pub fn new(camera: Camera, light: PointLight, objects: Vec<SceneObject>) -> Self {
        let debug_vectors = objects
            .iter()
            .map(|o| TbnRecords::from_mesh(&o.mesh))
            .collect();
        Self {
            camera,
            light,
            objects,
            debug_vectors,
        }
    }
}
