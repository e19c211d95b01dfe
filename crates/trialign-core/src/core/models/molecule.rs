use super::atom::Atom;
use crate::core::geometry::centroid;
use crate::core::geometry::transform::RigidTransform;
use nalgebra::{Point3, Vector3};
use std::ops::{AddAssign, Index, IndexMut};

/// An ordered sequence of atoms.
///
/// Atom indices are stable for the lifetime of the molecule and serve as the
/// identifiers used by spatial hashes and correspondences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chain of alpha carbons, one residue per position.
    pub fn from_positions(positions: impl IntoIterator<Item = Point3<f64>>) -> Self {
        positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| {
                let mut atom = Atom::new("CA", position);
                atom.serial = i + 1;
                atom.residue_name = String::from("GLY");
                atom.residue_number = i as isize + 1;
                atom.element = String::from("C");
                atom
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn first(&self) -> Option<&Atom> {
        self.atoms.first()
    }

    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| *a.position()).collect()
    }

    /// Unweighted center of all atom positions, or `None` for an empty molecule.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        centroid(self.atoms.iter().map(Atom::position))
    }

    /// Adds `offset` to every atom position.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for atom in &mut self.atoms {
            let moved = atom.position() + offset;
            atom.update(moved);
        }
    }

    /// Applies `transform` to every atom position in place.
    pub fn transform(&mut self, transform: &RigidTransform) {
        for atom in &mut self.atoms {
            let moved = transform.apply(atom.position());
            atom.update(moved);
        }
    }

    /// Returns a copy of the molecule with `transform` applied.
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        let mut copy = self.clone();
        copy.transform(transform);
        copy
    }

    /// Returns a new molecule holding clones of the atoms accepted by `predicate`,
    /// in their original order.
    pub fn select<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Atom) -> bool,
    {
        self.atoms.iter().filter(|a| predicate(a)).cloned().collect()
    }
}

impl Index<usize> for Molecule {
    type Output = Atom;

    fn index(&self, index: usize) -> &Self::Output {
        &self.atoms[index]
    }
}

impl IndexMut<usize> for Molecule {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.atoms[index]
    }
}

impl AddAssign<Vector3<f64>> for Molecule {
    fn add_assign(&mut self, offset: Vector3<f64>) {
        self.translate(&offset);
    }
}

impl FromIterator<Atom> for Molecule {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Molecule {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

impl IntoIterator for Molecule {
    type Item = Atom;
    type IntoIter = std::vec::IntoIter<Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    fn sample() -> Molecule {
        Molecule::from_positions([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
            Point3::new(0.0, 3.0, 3.0),
        ])
    }

    #[test]
    fn from_positions_numbers_residues_sequentially() {
        let molecule = sample();
        assert_eq!(molecule.len(), 4);
        assert_eq!(molecule[2].serial, 3);
        assert_eq!(molecule[2].residue_number, 3);
        assert!(molecule.iter().all(Atom::is_calpha));
    }

    #[test]
    fn centroid_of_empty_molecule_is_none() {
        assert!(Molecule::new().centroid().is_none());
        assert_eq!(sample().centroid(), Some(Point3::new(1.5, 1.5, 0.75)));
    }

    #[test]
    fn translate_and_add_assign_shift_every_atom() {
        let mut a = sample();
        let mut b = sample();
        let offset = Vector3::new(-1.0, 2.0, 0.5);

        a.translate(&offset);
        b += offset;

        assert_eq!(a, b);
        assert_eq!(*a[1].position(), Point3::new(2.0, 2.0, 0.5));
    }

    #[test]
    fn centering_moves_centroid_to_origin() {
        let mut molecule = sample();
        let center = molecule.centroid().unwrap();
        molecule += -center.coords;
        assert!(molecule.centroid().unwrap().coords.norm() < 1e-12);
    }

    #[test]
    fn transformed_leaves_original_untouched() {
        let molecule = sample();
        let t = RigidTransform::new(
            Rotation3::from_euler_angles(0.0, 0.0, std::f64::consts::PI),
            Vector3::new(1.0, 1.0, 1.0),
        );
        let moved = molecule.transformed(&t);

        assert_eq!(molecule, sample());
        for (original, m) in molecule.iter().zip(moved.iter()) {
            assert!((t.apply(original.position()) - m.position()).norm() < 1e-12);
        }
    }

    #[test]
    fn select_keeps_matching_atoms_in_order() {
        let mut molecule = sample();
        molecule.push(Atom::new("CB", Point3::new(9.0, 9.0, 9.0)));
        molecule[0].name = String::from("N");
        molecule[0].name_field = String::from(" N  ");

        let selected = molecule.select(Atom::is_calpha);

        assert_eq!(selected.len(), 3);
        assert_eq!(*selected[0].position(), Point3::new(3.0, 0.0, 0.0));
    }
}
