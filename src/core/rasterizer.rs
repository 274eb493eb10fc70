use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, is_inside_triangle, perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::{Interpolatable, Shader};
use nalgebra::{Point2, Vector4};
use rayon::prelude::*;
use serde::Deserialize;

/// Barycentric distance from an edge within which a wireframe fragment is kept.
const WIREFRAME_THRESHOLD: f32 = 0.02;

/// Turns clip-space triangles into shaded fragments on a [`FrameBuffer`].
///
/// This stands in for the fixed-function part of a GPU: clipping, culling,
/// interpolation and the depth test. It owns no per-draw state.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    pub cull_mode: CullMode,
    /// Only fragments near triangle edges are shaded.
    pub wireframe: bool,
    /// Subtracted from fragment depth before the depth test, so overlay
    /// passes win against the surface they were drawn on.
    pub depth_bias: f32,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullMode {
    #[default]
    Back,
    Front,
    None,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
            wireframe: false,
            depth_bias: 0.0,
        }
    }

    /// Rasterizes one triangle after Sutherland-Hodgman clipping against the
    /// six `|x|,|y|,|z| <= w` planes in homogeneous clip space.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        // A triangle clipped by six planes has at most nine vertices.
        let mut polygon: Vec<(Vector4<f32>, S::Varying)> = Vec::with_capacity(16);
        let mut scratch: Vec<(Vector4<f32>, S::Varying)> = Vec::with_capacity(16);
        polygon.extend(clip_coords.iter().copied().zip(varyings.iter().copied()));

        // (axis, sign): inside when sign * p[axis] <= p.w
        const PLANES: [(usize, f32); 6] = [
            (0, 1.0),
            (0, -1.0),
            (1, 1.0),
            (1, -1.0),
            (2, 1.0),
            (2, -1.0),
        ];

        for &(axis, sign) in &PLANES {
            if polygon.is_empty() {
                return;
            }
            clip_polygon_against_plane::<S::Varying>(&polygon, &mut scratch, axis, sign);
            std::mem::swap(&mut polygon, &mut scratch);
        }

        if polygon.len() < 3 {
            return;
        }

        // The clipped polygon is convex; fan it around its first vertex.
        let v0 = polygon[0];
        for pair in polygon[1..].windows(2) {
            let (v1, v2) = (pair[0], pair[1]);
            self.rasterize_clipped(framebuffer, shader, &[v0.0, v1.0, v2.0], &[v0.1, v1.1, v2.1]);
        }
    }

    /// Shades a triangle already inside the frustum.
    fn rasterize_clipped<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;

        let mut screen = [Point2::origin(); 3];
        let mut w_values = [0.0; 3];
        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return;
            }
            let ndc = apply_perspective_division(&clip_coords[i]);
            w_values[i] = clip_coords[i].w;
            screen[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
        }

        // Counter-clockwise in NDC turns clockwise once screen Y is flipped,
        // so front faces have a negative signed area here.
        let edge1 = screen[1] - screen[0];
        let edge2 = screen[2] - screen[1];
        let signed_area = edge1.x * edge2.y - edge1.y * edge2.x;
        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return,
            CullMode::Front if signed_area <= 0.0 => return,
            _ => {}
        }

        let (min_x, min_y, max_x, max_y) = bounding_box(&screen);
        if max_x < 0
            || max_y < 0
            || min_x >= framebuffer.buffer_width as i32
            || min_y >= framebuffer.buffer_height as i32
        {
            return;
        }
        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.buffer_width as i32 - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.buffer_height as i32 - 1) as usize;

        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(bary) =
                    barycentric_coordinates(pixel_center, screen[0], screen[1], screen[2])
                else {
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }
                if self.wireframe
                    && bary.x > WIREFRAME_THRESHOLD
                    && bary.y > WIREFRAME_THRESHOLD
                    && bary.z > WIREFRAME_THRESHOLD
                {
                    continue;
                }
                let Some(weights) =
                    perspective_correct_barycentric(bary, w_values[0], w_values[1], w_values[2])
                else {
                    continue;
                };

                // NDC depth is affine in screen space: plain barycentrics.
                let z_ndc = bary.x * clip_coords[0].z / w_values[0]
                    + bary.y * clip_coords[1].z / w_values[1]
                    + bary.z * clip_coords[2].z / w_values[2];
                let depth = (z_ndc * 0.5 + 0.5) - self.depth_bias;

                if framebuffer.depth_test_and_update(x, y, depth) {
                    let varying = varyings[0] * weights.x
                        + varyings[1] * weights.y
                        + varyings[2] * weights.z;
                    framebuffer.set_pixel_safe(x, y, shader.fragment(varying));
                }
            }
        });
    }
}

/// Clips `input` against one plane into `output` (cleared first).
fn clip_polygon_against_plane<V: Interpolatable>(
    input: &[(Vector4<f32>, V)],
    output: &mut Vec<(Vector4<f32>, V)>,
    axis: usize,
    sign: f32,
) {
    output.clear();
    let Some(&last) = input.last() else {
        return;
    };

    let is_inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + 1e-6;
    let mut prev = last;
    let mut prev_inside = is_inside(&prev.0);

    for &curr in input {
        let curr_inside = is_inside(&curr.0);
        if curr_inside != prev_inside
            && let Some(crossing) = intersect_edge_plane(prev, curr, axis, sign)
        {
            output.push(crossing);
        }
        if curr_inside {
            output.push(curr);
        }
        prev = curr;
        prev_inside = curr_inside;
    }
}

/// Point where edge `a -> b` crosses `sign * p[axis] = p.w`, with the
/// varying interpolated at the same parameter.
#[inline(always)]
fn intersect_edge_plane<V: Interpolatable>(
    a: (Vector4<f32>, V),
    b: (Vector4<f32>, V),
    axis: usize,
    sign: f32,
) -> Option<(Vector4<f32>, V)> {
    let denom = sign * (b.0[axis] - a.0[axis]) - (b.0.w - a.0.w);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (a.0.w - sign * a.0[axis]) / denom;
    if !t.is_finite() {
        return None;
    }
    Some((a.0 + (b.0 - a.0) * t, a.1 * (1.0 - t) + b.1 * t))
}

fn bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}
