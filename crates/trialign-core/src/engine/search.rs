use super::config::validate_epsilon;
use super::correspondence;
use super::error::EngineError;
use super::matching::Match;
use super::progress::{Progress, ProgressReporter};
use super::state::BestAlignment;
use crate::core::geometry::hash::GeomHash;
use crate::core::geometry::transform::RigidTransform;
use crate::core::geometry::triangle::Triangle;
use crate::core::models::molecule::Molecule;
use tracing::{debug, info, instrument, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Finds the rigid transform superposing the most model atoms onto target atoms.
///
/// Every triangle of three consecutive target atoms is paired with every triangle of
/// three consecutive model atoms. Each pairing yields a candidate pose, which is
/// scored by collecting the atom pairs it brings within `epsilon` and refined by a
/// weighted least-squares fit over those pairs. The candidate with the most pairs
/// wins; among equally large candidates the one found first in row-major order
/// `(target start, model start)` is kept.
///
/// Molecules with fewer than three atoms produce the empty alignment.
///
/// # Errors
///
/// Returns [`EngineError::Config`] if `epsilon` is not a positive finite distance.
#[instrument(
    skip_all,
    name = "triangle_search",
    fields(target_atoms = target.len(), model_atoms = model.len(), epsilon = epsilon)
)]
pub fn run(
    target: &Molecule,
    model: &Molecule,
    epsilon: f64,
    reporter: &ProgressReporter,
) -> Result<BestAlignment, EngineError> {
    validate_epsilon(epsilon)?;

    if target.len() < 3 || model.len() < 3 {
        warn!(
            "Skipping triangle search: target has {} atoms and model has {}, need at least 3 each.",
            target.len(),
            model.len()
        );
        return Ok(BestAlignment::default());
    }

    reporter.report(Progress::PhaseStart {
        name: "Triangle Search",
    });

    let hash = correspondence::target_hash(target, epsilon);
    debug!(
        "Hashed {} target atoms into {} cells of side {:.3}.",
        hash.len(),
        hash.occupied_cells(),
        epsilon
    );

    let search = TriangleSearch {
        target,
        model,
        hash: &hash,
        epsilon,
    };
    let rows = target.len() - 2;
    reporter.report(Progress::TaskStart {
        total_steps: rows as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = 0..rows;

    #[cfg(feature = "parallel")]
    let iterator = (0..rows).into_par_iter();

    let row_bests = iterator
        .map(|row| {
            reporter.report(Progress::RowStart {
                row,
                target_len: target.len(),
            });
            let best = search.best_in_row(row)?;
            reporter.report(Progress::TaskIncrement);
            Ok(best)
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    let best = row_bests
        .into_iter()
        .fold(BestAlignment::default(), |mut best, candidate| {
            best.consider(candidate);
            best
        });

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        size = best.size,
        rmsd = best.rmsd,
        origin = ?best.origin,
        "Triangle search finished."
    );
    Ok(best)
}

/// Read-only state shared by every candidate evaluation.
struct TriangleSearch<'a> {
    target: &'a Molecule,
    model: &'a Molecule,
    hash: &'a GeomHash<usize>,
    epsilon: f64,
}

impl TriangleSearch<'_> {
    /// Best candidate among all model triangles paired with the target triangle
    /// starting at `row`, keeping the first one of maximal size.
    fn best_in_row(&self, row: usize) -> Result<BestAlignment, EngineError> {
        let mut best = BestAlignment::default();

        let Some(target_triangle) = Triangle::from_molecule(self.target, row) else {
            return Ok(best);
        };
        if target_triangle.frame().is_none() {
            trace!(row, "Degenerate target triangle, skipping row.");
            return Ok(best);
        }

        for column in 0..self.model.len().saturating_sub(2) {
            let Some(model_triangle) = Triangle::from_molecule(self.model, column) else {
                continue;
            };
            let Some(pose) = target_triangle.pose_onto(&model_triangle) else {
                trace!(row, column, "Degenerate model triangle, skipping.");
                continue;
            };

            if best.consider(self.evaluate(row, column, pose)?) {
                trace!(row, column, size = best.size, "New best candidate in row.");
            }
        }

        Ok(best)
    }

    fn evaluate(
        &self,
        row: usize,
        column: usize,
        pose: RigidTransform,
    ) -> Result<BestAlignment, EngineError> {
        let mut matching = Match::with_transform(pose);
        correspondence::collect(
            &mut matching,
            self.hash,
            self.epsilon,
            self.model,
            self.target,
            &pose,
        );
        matching.calculate_best_fit(self.target, self.model)?;

        Ok(BestAlignment {
            size: matching.size(),
            transform: *matching.rigid_trans(),
            rmsd: matching.rmsd(),
            origin: Some((row, column)),
        })
    }
}
