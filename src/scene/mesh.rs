use crate::core::geometry::Vertex;
use crate::core::math::normalize_or;
use crate::error::Error;
use log::warn;
use nalgebra::{Point3, Vector2, Vector3};
use std::f32::consts::{PI, TAU};
use std::str::FromStr;

/// UV-space determinant below which a triangle cannot define a tangent.
const UV_DET_EPSILON: f32 = 1e-4;

/// Indexed triangle list, counter-clockwise front faces.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
}

/// Built-in meshes selectable from the scene config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    Triangle,
    Plane,
    Sphere,
    Octahedron,
    Arrow,
}

impl FromStr for MeshKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "triangle" => Ok(MeshKind::Triangle),
            "plane" => Ok(MeshKind::Plane),
            "sphere" => Ok(MeshKind::Sphere),
            "octahedron" => Ok(MeshKind::Octahedron),
            "arrow" => Ok(MeshKind::Arrow),
            _ => Err(Error::UnknownMesh(s.to_string())),
        }
    }
}

impl MeshKind {
    pub fn build(self) -> Mesh {
        match self {
            MeshKind::Triangle => Mesh::create_test_triangle(),
            MeshKind::Plane => Mesh::create_plane(1.0),
            MeshKind::Sphere => Mesh::create_uv_sphere(1.0, 32, 16),
            MeshKind::Octahedron => Mesh::create_octahedron(1.0),
            MeshKind::Arrow => Mesh::create_arrow(12),
        }
    }
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// One triangle facing +Z, with tangents.
    pub fn create_test_triangle() -> Self {
        let n = Vector3::z();
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), n, Vector2::new(0.5, 1.0)),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), n, Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), n, Vector2::new(1.0, 0.0)),
        ];
        let mut mesh = Self::new(vertices, vec![0, 1, 2]);
        mesh.compute_tangents();
        mesh
    }

    /// Square in the XZ plane facing +Y, spanning `[-half_size, half_size]`.
    pub fn create_plane(half_size: f32) -> Self {
        let n = Vector3::y();
        let s = half_size;
        let vertices = vec![
            Vertex::new(Point3::new(-s, 0.0, -s), n, Vector2::new(0.0, 1.0)),
            Vertex::new(Point3::new(-s, 0.0, s), n, Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(s, 0.0, s), n, Vector2::new(1.0, 0.0)),
            Vertex::new(Point3::new(s, 0.0, -s), n, Vector2::new(1.0, 1.0)),
        ];
        let mut mesh = Self::new(vertices, vec![0, 1, 2, 0, 2, 3]);
        mesh.compute_tangents();
        mesh
    }

    /// Latitude/longitude sphere centered at the origin.
    pub fn create_uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);

        for i in 0..=rings {
            let theta = PI * i as f32 / rings as f32;
            for j in 0..=segments {
                let phi = TAU * j as f32 / segments as f32;
                let n = Vector3::new(
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    -theta.sin() * phi.sin(),
                );
                vertices.push(Vertex::new(
                    Point3::from(n * radius),
                    n,
                    Vector2::new(j as f32 / segments as f32, 1.0 - i as f32 / rings as f32),
                ));
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        for i in 0..rings {
            for j in 0..segments {
                let a = i * stride + j;
                let b = (i + 1) * stride + j;
                let c = b + 1;
                let d = a + 1;
                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        let mut mesh = Self::new(vertices, indices);
        mesh.compute_tangents();
        mesh
    }

    /// Flat-shaded octahedron, used as the light marker.
    pub fn create_octahedron(radius: f32) -> Self {
        let mut vertices = Vec::with_capacity(24);
        for sx in [1.0f32, -1.0] {
            for sy in [1.0f32, -1.0] {
                for sz in [1.0f32, -1.0] {
                    let x = Point3::new(sx * radius, 0.0, 0.0);
                    let y = Point3::new(0.0, sy * radius, 0.0);
                    let z = Point3::new(0.0, 0.0, sz * radius);
                    // An odd number of mirrored axes flips the winding.
                    let corners = if sx * sy * sz > 0.0 { [x, y, z] } else { [x, z, y] };
                    let n = Vector3::new(sx, sy, sz).normalize();
                    let uvs = [Vector2::zeros(), Vector2::x(), Vector2::y()];
                    for (p, uv) in corners.into_iter().zip(uvs) {
                        vertices.push(Vertex::new(p, n, uv));
                    }
                }
            }
        }
        let indices = (0..vertices.len() as u32).collect();
        let mut mesh = Self::new(vertices, indices);
        mesh.compute_tangents();
        mesh
    }

    /// Unit-length arrow along +Y starting at the origin: a thin shaft and a
    /// cone head. This is the canonical debug glyph.
    pub fn create_arrow(segments: u32) -> Self {
        const SHAFT_RADIUS: f32 = 0.05;
        const SHAFT_HEIGHT: f32 = 0.8;
        const HEAD_RADIUS: f32 = 0.1;

        let segments = segments.max(3);
        let head_height = 1.0 - SHAFT_HEIGHT;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        let ring = |radius: f32, y: f32, phi: f32| {
            Point3::new(radius * phi.cos(), y, -radius * phi.sin())
        };

        for j in 0..segments {
            let u0 = j as f32 / segments as f32;
            let u1 = (j + 1) as f32 / segments as f32;
            let (phi0, phi1) = (TAU * u0, TAU * u1);
            let radial = |phi: f32| Vector3::new(phi.cos(), 0.0, -phi.sin());

            // Shaft quad.
            let base = vertices.len() as u32;
            vertices.extend([
                Vertex::new(ring(SHAFT_RADIUS, 0.0, phi0), radial(phi0), Vector2::new(u0, 0.0)),
                Vertex::new(ring(SHAFT_RADIUS, 0.0, phi1), radial(phi1), Vector2::new(u1, 0.0)),
                Vertex::new(
                    ring(SHAFT_RADIUS, SHAFT_HEIGHT, phi1),
                    radial(phi1),
                    Vector2::new(u1, SHAFT_HEIGHT),
                ),
                Vertex::new(
                    ring(SHAFT_RADIUS, SHAFT_HEIGHT, phi0),
                    radial(phi0),
                    Vector2::new(u0, SHAFT_HEIGHT),
                ),
            ]);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

            // Head wedge.
            let slant = |phi: f32| {
                Vector3::new(head_height * phi.cos(), HEAD_RADIUS, -head_height * phi.sin())
                    .normalize()
            };
            let phi_mid = 0.5 * (phi0 + phi1);
            let base = vertices.len() as u32;
            vertices.extend([
                Vertex::new(
                    ring(HEAD_RADIUS, SHAFT_HEIGHT, phi0),
                    slant(phi0),
                    Vector2::new(u0, SHAFT_HEIGHT),
                ),
                Vertex::new(
                    ring(HEAD_RADIUS, SHAFT_HEIGHT, phi1),
                    slant(phi1),
                    Vector2::new(u1, SHAFT_HEIGHT),
                ),
                Vertex::new(
                    Point3::new(0.0, 1.0, 0.0),
                    slant(phi_mid),
                    Vector2::new(0.5 * (u0 + u1), 1.0),
                ),
            ]);
            indices.extend_from_slice(&[base, base + 1, base + 2]);

            // Underside of the head, facing -Y.
            let down = -Vector3::y();
            let base = vertices.len() as u32;
            vertices.extend([
                Vertex::new(Point3::new(0.0, SHAFT_HEIGHT, 0.0), down, Vector2::new(0.5, 0.5)),
                Vertex::new(ring(HEAD_RADIUS, SHAFT_HEIGHT, phi1), down, Vector2::new(u1, 0.0)),
                Vertex::new(ring(HEAD_RADIUS, SHAFT_HEIGHT, phi0), down, Vector2::new(u0, 0.0)),
            ]);
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        let mut mesh = Self::new(vertices, indices);
        mesh.compute_tangents();
        mesh
    }

    /// Derives a per-vertex tangent frame from positions and UVs.
    ///
    /// Each triangle contributes the tangent implied by its UV derivatives to
    /// its three vertices. Triangles with degenerate UVs contribute an
    /// arbitrary vector perpendicular to the normal instead. The sums are then
    /// Gram-Schmidt orthogonalized against the normal and the bitangent is
    /// taken as `normal x tangent`, so `[T, B, N]` is right-handed.
    pub fn compute_tangents(&mut self) {
        if self.indices.len() % 3 != 0 {
            warn!(
                "index count {} is not a multiple of 3; trailing indices ignored",
                self.indices.len()
            );
        }

        let mut accumulated = vec![Vector3::<f32>::zeros(); self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(v0), Some(v1), Some(v2)) = (
                self.vertices.get(i0),
                self.vertices.get(i1),
                self.vertices.get(i2),
            ) else {
                warn!("triangle {:?} references a missing vertex; skipped", tri);
                continue;
            };

            let dp1 = v1.position - v0.position;
            let dp2 = v2.position - v0.position;
            let duv1 = v1.texcoord - v0.texcoord;
            let duv2 = v2.texcoord - v0.texcoord;
            let det = duv1.x * duv2.y - duv1.y * duv2.x;

            let tangent = if det.abs() <= UV_DET_EPSILON {
                arbitrary_perpendicular(&v0.normal)
            } else {
                (dp1 * duv2.y - dp2 * duv1.y) / det
            };

            for i in [i0, i1, i2] {
                accumulated[i] += tangent;
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(accumulated) {
            let n = normalize_or(vertex.normal, Vector3::z());
            let t = normalize_or(sum - n * n.dot(&sum), arbitrary_perpendicular(&n));
            vertex.tangent = t;
            vertex.bitangent = n.cross(&t).normalize();
        }
    }
}

/// A unit vector perpendicular to `normal`, chosen away from the pole.
fn arbitrary_perpendicular(normal: &Vector3<f32>) -> Vector3<f32> {
    let helper = if normal.z.abs() < 0.999 {
        Vector3::z()
    } else {
        Vector3::y()
    };
    normalize_or(helper.cross(normal), Vector3::x())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal_frames(mesh: &Mesh) {
        for v in &mesh.vertices {
            let n = v.normal.normalize();
            assert!((v.tangent.norm() - 1.0).abs() < 1e-4, "{:?}", v);
            assert!((v.bitangent.norm() - 1.0).abs() < 1e-4, "{:?}", v);
            assert!(v.tangent.dot(&n).abs() < 1e-4, "{:?}", v);
            assert!(v.bitangent.dot(&n).abs() < 1e-4, "{:?}", v);
            // Right-handed frame: T x B points along N.
            assert!(v.tangent.cross(&v.bitangent).dot(&n) > 0.99, "{:?}", v);
        }
    }

    fn assert_outward_winding(mesh: &Mesh) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [
                &mesh.vertices[tri[0] as usize],
                &mesh.vertices[tri[1] as usize],
                &mesh.vertices[tri[2] as usize],
            ];
            let face = (b.position - a.position).cross(&(c.position - a.position));
            if face.norm() < 1e-6 {
                continue; // collapsed pole triangles
            }
            assert!(face.dot(&a.normal) > 0.0, "triangle {:?} winds inward", tri);
        }
    }

    #[test]
    fn triangle_tangent_follows_u() {
        let mesh = Mesh::create_test_triangle();
        let v = &mesh.vertices[0];
        assert!((v.tangent - Vector3::x()).norm() < 1e-5);
        assert!((v.bitangent - Vector3::y()).norm() < 1e-5);
    }

    #[test]
    fn generated_meshes_have_orthonormal_frames() {
        for kind in [
            MeshKind::Triangle,
            MeshKind::Plane,
            MeshKind::Sphere,
            MeshKind::Octahedron,
            MeshKind::Arrow,
        ] {
            assert_orthonormal_frames(&kind.build());
        }
    }

    #[test]
    fn generated_meshes_wind_counter_clockwise() {
        for kind in [
            MeshKind::Plane,
            MeshKind::Sphere,
            MeshKind::Octahedron,
            MeshKind::Arrow,
        ] {
            assert_outward_winding(&kind.build());
        }
    }

    #[test]
    fn degenerate_uvs_still_get_a_frame() {
        let n = Vector3::y();
        let uv = Vector2::zeros();
        let mut mesh = Mesh::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, 0.0), n, uv),
                Vertex::new(Point3::new(0.0, 0.0, 1.0), n, uv),
                Vertex::new(Point3::new(1.0, 0.0, 0.0), n, uv),
            ],
            vec![0, 1, 2],
        );
        mesh.compute_tangents();
        assert_orthonormal_frames(&mesh);
    }

    #[test]
    fn mesh_kind_parses_case_insensitively() {
        assert_eq!("Sphere".parse::<MeshKind>().unwrap(), MeshKind::Sphere);
        assert!(matches!(
            "teapot".parse::<MeshKind>(),
            Err(Error::UnknownMesh(name)) if name == "teapot"
        ));
    }
}
