use crate::core::geometry::transform::RigidTransform;

/// The best alignment found so far by the triangle search.
///
/// `origin` holds the (target, model) triangle start indices of the candidate
/// that produced it, and is `None` while no candidate has been accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestAlignment {
    pub size: usize,
    pub transform: RigidTransform,
    pub rmsd: f64,
    pub origin: Option<(usize, usize)>,
}

impl Default for BestAlignment {
    fn default() -> Self {
        Self {
            size: 0,
            transform: RigidTransform::identity(),
            rmsd: 0.0,
            origin: None,
        }
    }
}

impl BestAlignment {
    /// Replaces `self` with `candidate` if the candidate matches strictly more atoms.
    ///
    /// Returns `true` if the candidate was accepted. Ties keep the incumbent, so the
    /// first candidate reaching a given size wins.
    pub fn consider(&mut self, candidate: BestAlignment) -> bool {
        if candidate.size > self.size {
            *self = candidate;
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
