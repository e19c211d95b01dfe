use super::matching::Match;
use crate::core::geometry::hash::GeomHash;
use crate::core::geometry::transform::RigidTransform;
use crate::core::models::molecule::Molecule;
use tracing::trace;

/// Builds the spatial hash of `target` used by [`collect`], with cell side `epsilon`.
pub fn target_hash(target: &Molecule, epsilon: f64) -> GeomHash<usize> {
    let mut hash = GeomHash::new(epsilon);
    hash.extend(target.iter().enumerate().map(|(index, atom)| (*atom.position(), index)));
    hash
}

/// Proposes to `matching` every target atom lying within `epsilon` of a model atom
/// moved by `transform`.
///
/// Model atoms are visited in index order. Each proposal is scored `1 / (1 + d)`,
/// used both as priority and as weight, where `d` is the distance between the moved
/// model atom and the target atom; `matching` keeps the result one-to-one.
pub fn collect(
    matching: &mut Match,
    hash: &GeomHash<usize>,
    epsilon: f64,
    model: &Molecule,
    target: &Molecule,
    transform: &RigidTransform,
) {
    let mut neighbors = Vec::new();

    for (model_idx, atom) in model.iter().enumerate() {
        let moved = transform.apply(atom.position());

        neighbors.clear();
        hash.query(&moved, epsilon, &mut neighbors);

        for &target_idx in &neighbors {
            let Some(target_atom) = target.atoms().get(target_idx) else {
                continue;
            };
            let distance = (moved - target_atom.position()).norm();
            if distance <= epsilon {
                let score = 1.0 / (1.0 + distance);
                matching.add(target_idx, model_idx, score, score);
            }
        }
    }

    trace!(pairs = matching.size(), "Collected correspondences");
}
