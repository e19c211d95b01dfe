//! Geometric primitives for rigid superposition.
//!
//! - [`transform`] - Rigid transforms built on `nalgebra` rotations and vectors
//! - [`triangle`] - Local frames of point triples and the pose between two triples
//! - [`hash`] - Sparse uniform-grid hashing for fixed-radius neighbor queries
//! - [`superpose`] - Weighted Kabsch superposition and RMSD

pub mod hash;
pub mod superpose;
pub mod transform;
pub mod triangle;

use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Point sets differ in length (moving: {moving}, fixed: {fixed}, weights: {weights})")]
    LengthMismatch {
        moving: usize,
        fixed: usize,
        weights: usize,
    },
    #[error("Singular value decomposition of the covariance matrix did not converge")]
    Decomposition,
}

/// Unweighted centroid of a point set, or `None` if it is empty.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Point3<f64>> {
    let (sum, count) = points
        .into_iter()
        .fold((Vector3::zeros(), 0usize), |(sum, count), p| {
            (sum + p.coords, count + 1)
        });
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}
