use super::error::EngineError;
use crate::core::geometry::superpose::{self, weighted_squared_deviation};
use crate::core::geometry::transform::RigidTransform;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use std::collections::HashMap;

/// A scored correspondence between one target atom and one model atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPair {
    pub target_idx: usize,
    pub model_idx: usize,
    /// Decides conflicts between pairs sharing an atom; higher wins.
    pub priority: f64,
    /// Weight of the pair in the least-squares fit.
    pub weight: f64,
}

/// A one-to-one set of target/model atom pairs together with the rigid transform
/// fitted to them.
///
/// No target index and no model index ever appears in two pairs at once. Pairs
/// keep their insertion order; a pair displaced by a better one leaves a hole that
/// iteration skips.
#[derive(Debug, Clone)]
pub struct Match {
    slots: Vec<Option<MatchPair>>,
    by_target: HashMap<usize, usize>,
    by_model: HashMap<usize, usize>,
    size: usize,
    transform: RigidTransform,
    rmsd: f64,
}

impl Default for Match {
    fn default() -> Self {
        Self::with_transform(RigidTransform::identity())
    }
}

impl Match {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty match whose stored transform is `transform` until the next
    /// call to [`Match::calculate_best_fit`].
    pub fn with_transform(transform: RigidTransform) -> Self {
        Self {
            slots: Vec::new(),
            by_target: HashMap::new(),
            by_model: HashMap::new(),
            size: 0,
            transform,
            rmsd: 0.0,
        }
    }

    /// Proposes the pair `(target_idx, model_idx)`.
    ///
    /// A proposal sharing neither atom with an existing pair is appended. One that
    /// conflicts with existing pairs replaces all of them only if its priority is
    /// strictly greater than each of theirs; otherwise it is dropped. Returns `true`
    /// if the pair was stored.
    pub fn add(&mut self, target_idx: usize, model_idx: usize, priority: f64, weight: f64) -> bool {
        let target_slot = self.by_target.get(&target_idx).copied();
        let model_slot = self.by_model.get(&model_idx).copied();

        let outranks = |slot: Option<usize>| {
            slot.and_then(|s| self.slots[s].as_ref())
                .is_none_or(|existing| priority > existing.priority)
        };
        if !(outranks(target_slot) && outranks(model_slot)) {
            return false;
        }

        for slot in [target_slot, model_slot].into_iter().flatten() {
            self.vacate(slot);
        }

        let slot = self.slots.len();
        self.slots.push(Some(MatchPair {
            target_idx,
            model_idx,
            priority,
            weight,
        }));
        self.by_target.insert(target_idx, slot);
        self.by_model.insert(model_idx, slot);
        self.size += 1;
        true
    }

    fn vacate(&mut self, slot: usize) {
        if let Some(pair) = self.slots[slot].take() {
            self.by_target.remove(&pair.target_idx);
            self.by_model.remove(&pair.model_idx);
            self.size -= 1;
        }
    }

    /// Number of stored pairs.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterates over the stored pairs in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = &MatchPair> + '_ {
        self.slots.iter().flatten()
    }

    /// Returns the model atom paired with `target_idx`, if any.
    pub fn model_for(&self, target_idx: usize) -> Option<usize> {
        self.by_target
            .get(&target_idx)
            .and_then(|&slot| self.slots[slot].as_ref())
            .map(|pair| pair.model_idx)
    }

    /// Returns the target atom paired with `model_idx`, if any.
    pub fn target_for(&self, model_idx: usize) -> Option<usize> {
        self.by_model
            .get(&model_idx)
            .and_then(|&slot| self.slots[slot].as_ref())
            .map(|pair| pair.target_idx)
    }

    pub fn rigid_trans(&self) -> &RigidTransform {
        &self.transform
    }

    /// Weighted RMSD of the pairs as of the last best fit.
    pub fn rmsd(&self) -> f64 {
        self.rmsd
    }

    /// Replaces the stored transform with the weighted least-squares fit that maps
    /// the paired model atoms onto their target atoms, and records its RMSD.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexOutOfBounds`] if a pair refers to an atom the
    /// molecules do not have, and [`EngineError::Geometry`] if the decomposition
    /// fails.
    pub fn calculate_best_fit(
        &mut self,
        target: &Molecule,
        model: &Molecule,
    ) -> Result<(), EngineError> {
        let (moving, fixed, weights) = self.paired_points(target, model)?;
        let fit = superpose::weighted_superposition(&moving, &fixed, &weights)?;
        self.transform = fit.transform;
        self.rmsd = fit.rmsd;
        Ok(())
    }

    /// Weighted sum of squared pair distances under the stored transform.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexOutOfBounds`] if a pair refers to a missing atom.
    pub fn squared_deviation(
        &self,
        target: &Molecule,
        model: &Molecule,
    ) -> Result<f64, EngineError> {
        let (moving, fixed, weights) = self.paired_points(target, model)?;
        Ok(weighted_squared_deviation(&self.transform, &moving, &fixed, &weights))
    }

    #[allow(clippy::type_complexity)]
    fn paired_points(
        &self,
        target: &Molecule,
        model: &Molecule,
    ) -> Result<(Vec<Point3<f64>>, Vec<Point3<f64>>, Vec<f64>), EngineError> {
        let mut moving = Vec::with_capacity(self.size);
        let mut fixed = Vec::with_capacity(self.size);
        let mut weights = Vec::with_capacity(self.size);

        for pair in self.pairs() {
            let model_atom =
                model
                    .atoms()
                    .get(pair.model_idx)
                    .ok_or(EngineError::IndexOutOfBounds {
                        role: "model",
                        index: pair.model_idx,
                        len: model.len(),
                    })?;
            let target_atom =
                target
                    .atoms()
                    .get(pair.target_idx)
                    .ok_or(EngineError::IndexOutOfBounds {
                        role: "target",
                        index: pair.target_idx,
                        len: target.len(),
                    })?;
            moving.push(*model_atom.position());
            fixed.push(*target_atom.position());
            weights.push(pair.weight);
        }

        Ok((moving, fixed, weights))
    }
}
