use super::transform::RigidTransform;
use crate::core::models::molecule::Molecule;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// Edges shorter than this (in Angstroms) cannot define a frame axis.
const DEGENERATE_EDGE_LENGTH: f64 = 1e-9;
/// Third vertices closer than this to the first edge's line are treated as collinear.
const COLLINEAR_DISTANCE: f64 = 1e-6;

/// An ordered triple of points `(A, B, C)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
}

impl Triangle {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self { a, b, c }
    }

    /// Builds the triangle of atoms `start`, `start + 1` and `start + 2`.
    ///
    /// Returns `None` if the molecule has fewer than `start + 3` atoms.
    pub fn from_molecule(molecule: &Molecule, start: usize) -> Option<Self> {
        let end = start.checked_add(2)?;
        if end >= molecule.len() {
            return None;
        }
        Some(Self::new(
            *molecule[start].position(),
            *molecule[start + 1].position(),
            *molecule[end].position(),
        ))
    }

    pub fn vertices(&self) -> [Point3<f64>; 3] {
        [self.a, self.b, self.c]
    }

    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    pub fn is_collinear(&self) -> bool {
        let ab = self.b - self.a;
        let length = ab.norm();
        length < DEGENERATE_EDGE_LENGTH
            || (ab / length).cross(&(self.c - self.a)).norm() < COLLINEAR_DISTANCE
    }

    /// Computes the local orthonormal frame of the triangle.
    ///
    /// The frame is centered on the triangle centroid with its first axis along
    /// `B - A` and its third axis along the plane normal. For collinear triples the
    /// normal is replaced by a deterministic perpendicular of the first axis.
    /// Returns `None` when `A` and `B` coincide.
    ///
    /// The returned transform maps local frame coordinates to world coordinates.
    pub fn frame(&self) -> Option<RigidTransform> {
        let ab = self.b - self.a;
        let length = ab.norm();
        if length < DEGENERATE_EDGE_LENGTH {
            return None;
        }
        let x_axis = ab / length;

        let normal = x_axis.cross(&(self.c - self.a));
        let z_axis = if normal.norm() >= COLLINEAR_DISTANCE {
            normal.normalize()
        } else {
            x_axis.cross(&least_aligned_axis(&x_axis)).normalize()
        };
        let y_axis = z_axis.cross(&x_axis);

        let basis = Matrix3::from_columns(&[x_axis, y_axis, z_axis]);
        Some(RigidTransform::new(
            Rotation3::from_matrix_unchecked(basis),
            self.centroid().coords,
        ))
    }

    /// Returns the transform `T` that places `other` onto `self`, i.e. `T·other ≈ self`.
    ///
    /// For congruent triangles the superposition is exact; otherwise the frames
    /// (centroid, edge direction, plane normal) are overlaid. Returns `None` if
    /// either triangle has no frame.
    pub fn pose_onto(&self, other: &Triangle) -> Option<RigidTransform> {
        let own_frame = self.frame()?;
        let other_frame = other.frame()?;
        Some(own_frame * other_frame.inverse())
    }
}

fn least_aligned_axis(direction: &Vector3<f64>) -> Vector3<f64> {
    Vector3::ith(direction.iamin(), 1.0)
}
