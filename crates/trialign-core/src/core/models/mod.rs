//! # Models Module
//!
//! Data structures for the molecules being superposed.
//!
//! - [`atom`] - A single PDB atom record with backbone predicates, and the
//!   [`atom::BackboneKind`] selector choosing one representative atom per residue
//! - [`molecule`] - An ordered, index-addressed sequence of atoms supporting bulk
//!   translation, rigid transformation, centering and selection

pub mod atom;
pub mod molecule;
