use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::scene::mesh::Mesh;
use log::warn;
use nalgebra::{Vector3, Vector4};
use rayon::prelude::*;
use std::ops::Range;

/// Drives a [`Shader`] over meshes into one framebuffer.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    /// `sample_count` is the supersampling factor per axis; 1 disables it.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height, sample_count),
        }
    }

    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color);
    }

    /// Non-instanced draw; the shader sees instance 0.
    pub fn draw_mesh<S: Shader>(&self, mesh: &Mesh, shader: &S) -> usize {
        self.draw_mesh_instanced(mesh, shader, 0..1)
    }

    /// Draws `mesh` once per instance index. Returns the number of triangles
    /// submitted to the rasterizer.
    ///
    /// All vertex invocations of an instance finish before any of its
    /// triangles is rasterized.
    pub fn draw_mesh_instanced<S: Shader>(
        &self,
        mesh: &Mesh,
        shader: &S,
        instances: Range<u32>,
    ) -> usize {
        let mut submitted = 0;
        for instance in instances {
            let outputs: Vec<(Vector4<f32>, S::Varying)> = mesh
                .vertices
                .par_iter()
                .map(|v| shader.vertex(v, instance))
                .collect();

            for tri in mesh.indices.chunks_exact(3) {
                let (Some(a), Some(b), Some(c)) = (
                    outputs.get(tri[0] as usize),
                    outputs.get(tri[1] as usize),
                    outputs.get(tri[2] as usize),
                ) else {
                    warn!("triangle {:?} references a missing vertex; skipped", tri);
                    continue;
                };
                self.rasterizer.rasterize_triangle(
                    &self.framebuffer,
                    shader,
                    &[a.0, b.0, c.0],
                    &[a.1, b.1, c.1],
                );
                submitted += 1;
            }
        }
        submitted
    }
}
