use super::GeometryError;
use super::transform::RigidTransform;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// Optimal rigid superposition of a moving point set onto a fixed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Superposition {
    /// Transform mapping the moving points onto the fixed points.
    pub transform: RigidTransform,
    /// Weighted RMSD of the pairs under `transform`.
    pub rmsd: f64,
}

impl Default for Superposition {
    fn default() -> Self {
        Self {
            transform: RigidTransform::identity(),
            rmsd: 0.0,
        }
    }
}

/// Computes the weighted least-squares rigid transform mapping `moving` onto `fixed`
/// (Kabsch algorithm).
///
/// Minimizes `Σ wᵢ · ‖T·movingᵢ − fixedᵢ‖²` over proper rotations and translations;
/// reflections are never returned. Inputs with fewer than three pairs fall back to
/// a translation between the weighted centroids, and an empty input (or zero total
/// weight) yields the identity.
///
/// # Errors
///
/// Returns [`GeometryError::LengthMismatch`] if the three slices differ in length,
/// and [`GeometryError::Decomposition`] if the SVD of the covariance matrix fails.
pub fn weighted_superposition(
    moving: &[Point3<f64>],
    fixed: &[Point3<f64>],
    weights: &[f64],
) -> Result<Superposition, GeometryError> {
    if moving.len() != fixed.len() || moving.len() != weights.len() {
        return Err(GeometryError::LengthMismatch {
            moving: moving.len(),
            fixed: fixed.len(),
            weights: weights.len(),
        });
    }

    let total_weight: f64 = weights.iter().sum();
    if moving.is_empty() || total_weight <= 0.0 {
        return Ok(Superposition::default());
    }

    let moving_centroid = weighted_centroid(moving, weights, total_weight);
    let fixed_centroid = weighted_centroid(fixed, weights, total_weight);

    let rotation = if moving.len() < 3 {
        Rotation3::identity()
    } else {
        optimal_rotation(moving, fixed, weights, &moving_centroid, &fixed_centroid)?
    };
    let translation = fixed_centroid - rotation * moving_centroid;
    let transform = RigidTransform::new(rotation, translation);

    Ok(Superposition {
        transform,
        rmsd: weighted_rmsd(&transform, moving, fixed, weights),
    })
}

fn weighted_centroid(points: &[Point3<f64>], weights: &[f64], total_weight: f64) -> Vector3<f64> {
    points
        .iter()
        .zip(weights)
        .fold(Vector3::zeros(), |acc, (p, &w)| acc + p.coords * w)
        / total_weight
}

fn optimal_rotation(
    moving: &[Point3<f64>],
    fixed: &[Point3<f64>],
    weights: &[f64],
    moving_centroid: &Vector3<f64>,
    fixed_centroid: &Vector3<f64>,
) -> Result<Rotation3<f64>, GeometryError> {
    let covariance = moving
        .iter()
        .zip(fixed)
        .zip(weights)
        .fold(Matrix3::zeros(), |acc, ((m, f), &w)| {
            acc + (m.coords - moving_centroid) * (f.coords - fixed_centroid).transpose() * w
        });

    let svd = covariance.svd(true, true);
    let u = svd.u.ok_or(GeometryError::Decomposition)?;
    let v_t = svd.v_t.ok_or(GeometryError::Decomposition)?;
    let mut v = v_t.transpose();

    if (v * u.transpose()).determinant() < 0.0 {
        let weakest = svd.singular_values.imin();
        v.column_mut(weakest).neg_mut();
    }

    Ok(Rotation3::from_matrix_unchecked(v * u.transpose()))
}

/// Weighted sum of squared deviations `Σ wᵢ · ‖T·movingᵢ − fixedᵢ‖²`.
pub fn weighted_squared_deviation(
    transform: &RigidTransform,
    moving: &[Point3<f64>],
    fixed: &[Point3<f64>],
    weights: &[f64],
) -> f64 {
    moving
        .iter()
        .zip(fixed)
        .zip(weights)
        .map(|((m, f), &w)| w * (transform.apply(m) - f).norm_squared())
        .sum()
}

/// Weighted RMSD `√(Σ wᵢ dᵢ² / Σ wᵢ)`; zero for empty input or zero total weight.
pub fn weighted_rmsd(
    transform: &RigidTransform,
    moving: &[Point3<f64>],
    fixed: &[Point3<f64>],
    weights: &[f64],
) -> f64 {
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    (weighted_squared_deviation(transform, moving, fixed, weights) / total_weight).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helix(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let angle = i as f64 * 100f64.to_radians();
                Point3::new(2.3 * angle.cos(), 2.3 * angle.sin(), 1.5 * i as f64)
            })
            .collect()
    }

    fn motion() -> RigidTransform {
        RigidTransform::new(
            Rotation3::from_euler_angles(-0.7, 0.35, 1.9),
            Vector3::new(4.0, -12.0, 0.5),
        )
    }

    #[test]
    fn recovers_exact_rigid_motion() {
        let moving = helix(8);
        let fixed: Vec<_> = moving.iter().map(|p| motion().apply(p)).collect();
        let weights = vec![1.0; moving.len()];

        let result = weighted_superposition(&moving, &fixed, &weights).unwrap();

        assert!(result.transform.approx_eq(&motion(), 1e-9));
        assert!(result.rmsd < 1e-9);
    }

    #[test]
    fn never_returns_a_reflection() {
        let moving = helix(6);
        let fixed: Vec<_> = moving.iter().map(|p| Point3::new(p.x, p.y, -p.z)).collect();
        let weights = vec![1.0; moving.len()];

        let result = weighted_superposition(&moving, &fixed, &weights).unwrap();

        assert!((result.transform.rotation().matrix().determinant() - 1.0).abs() < 1e-9);
        assert!(result.rmsd > 0.1);
    }

    #[test]
    fn weights_bias_the_fit_toward_heavy_pairs() {
        let moving = helix(6);
        let mut fixed: Vec<_> = moving.iter().map(|p| motion().apply(p)).collect();
        fixed[5] += Vector3::new(3.0, 0.0, 0.0);
        let mut weights = vec![1.0; moving.len()];
        weights[5] = 1e-6;

        let result = weighted_superposition(&moving, &fixed, &weights).unwrap();
        for i in 0..5 {
            assert!((result.transform.apply(&moving[i]) - fixed[i]).norm() < 1e-3);
        }
    }

    #[test]
    fn fit_is_never_worse_than_a_given_transform() {
        let moving = helix(10);
        let fixed: Vec<_> = moving
            .iter()
            .enumerate()
            .map(|(i, p)| motion().apply(p) + Vector3::new(0.1 * (i % 3) as f64, -0.05, 0.02))
            .collect();
        let weights: Vec<f64> = (0..moving.len()).map(|i| 1.0 / (1.0 + i as f64)).collect();

        let guess = RigidTransform::new(
            Rotation3::from_euler_angles(-0.69, 0.36, 1.88),
            Vector3::new(4.1, -11.9, 0.4),
        );
        let fitted = weighted_superposition(&moving, &fixed, &weights).unwrap();

        assert!(
            weighted_squared_deviation(&fitted.transform, &moving, &fixed, &weights)
                <= weighted_squared_deviation(&guess, &moving, &fixed, &weights) + 1e-12
        );
    }

    #[test]
    fn fewer_than_three_pairs_fall_back_to_centroid_translation() {
        let moving = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        let fixed = vec![Point3::new(5.0, 1.0, 0.0), Point3::new(5.0, 3.0, 0.0)];
        let weights = vec![1.0, 1.0];

        let result = weighted_superposition(&moving, &fixed, &weights).unwrap();

        assert_eq!(*result.transform.rotation(), Rotation3::identity());
        assert!((result.transform.translation() - Vector3::new(4.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn empty_input_yields_identity() {
        let result = weighted_superposition(&[], &[], &[]).unwrap();
        assert_eq!(result, Superposition::default());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let points = helix(3);
        let err = weighted_superposition(&points, &points[..2], &[1.0; 3]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::LengthMismatch {
                moving: 3,
                fixed: 2,
                weights: 3
            }
        );
    }

    #[test]
    fn weighted_rmsd_of_zero_weights_is_zero() {
        let points = helix(4);
        assert_eq!(
            weighted_rmsd(&RigidTransform::identity(), &points, &points, &[0.0; 4]),
            0.0
        );
    }
}
