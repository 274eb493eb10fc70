//! Normal/tangent/bitangent bases and the change of basis into tangent space.
//!
//! Both lit modes build the same matrix here. They differ only in where it is
//! applied: the per-vertex-projected mode calls [`project_points`] in the
//! vertex stage, the world-space mode rebuilds the basis from interpolated
//! vectors with [`Tbn::from_basis`] and rotates directions per fragment.
//!
//! The upper 3x3 of the model matrix is used as the normal transform. That
//! is only correct for rotations, translations and uniform scale.

use crate::core::geometry::transform_direction;
use crate::core::math::normalize_or;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// World-to-tangent rotation. Rows are tangent, bitangent, normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tbn(Matrix3<f32>);

/// Light, view and surface points expressed in one vertex's tangent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentSpacePoints {
    pub light: Vector3<f32>,
    pub view: Vector3<f32>,
    pub fragment: Vector3<f32>,
}

/// Builds the world-space basis of an object-space vertex frame.
pub fn build_tbn(
    normal: &Vector3<f32>,
    tangent: &Vector3<f32>,
    bitangent: &Vector3<f32>,
    model: &Matrix4<f32>,
) -> Tbn {
    Tbn::from_basis(
        transform_direction(tangent, model),
        transform_direction(bitangent, model),
        transform_direction(normal, model),
    )
}

/// Moves the three shading points into the tangent space of `tbn`.
pub fn project_points(
    tbn: &Tbn,
    light: &Point3<f32>,
    view: &Point3<f32>,
    fragment: &Point3<f32>,
) -> TangentSpacePoints {
    TangentSpacePoints {
        light: tbn.to_tangent(&light.coords),
        view: tbn.to_tangent(&view.coords),
        fragment: tbn.to_tangent(&fragment.coords),
    }
}

impl Tbn {
    /// Renormalizes each vector and stacks them as rows.
    ///
    /// Interpolated unit vectors are shorter than unit, so this must run in
    /// the fragment stage before the basis is used.
    pub fn from_basis(
        tangent: Vector3<f32>,
        bitangent: Vector3<f32>,
        normal: Vector3<f32>,
    ) -> Self {
        let t = normalize_or(tangent, Vector3::x());
        let b = normalize_or(bitangent, Vector3::y());
        let n = normalize_or(normal, Vector3::z());
        Self(Matrix3::from_rows(&[t.transpose(), b.transpose(), n.transpose()]))
    }

    #[inline]
    pub fn to_tangent(&self, v: &Vector3<f32>) -> Vector3<f32> {
        self.0 * v
    }

    #[inline]
    pub fn to_world(&self, v: &Vector3<f32>) -> Vector3<f32> {
        self.0.tr_mul(v)
    }

    pub fn matrix(&self) -> Matrix3<f32> {
        self.0
    }

    /// The transpose; exact only for an orthonormal basis.
    pub fn inverse(&self) -> Matrix3<f32> {
        self.0.transpose()
    }

    pub fn tangent(&self) -> Vector3<f32> {
        self.0.row(0).transpose()
    }

    pub fn bitangent(&self) -> Vector3<f32> {
        self.0.row(1).transpose()
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.0.row(2).transpose()
    }
}
