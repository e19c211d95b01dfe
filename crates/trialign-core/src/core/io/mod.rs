//! Provides input/output functionality for molecular file formats.
//!
//! The [`traits::MolecularFile`] trait defines a format-independent API for reading
//! molecules (optionally filtered by an atom predicate) and writing them back.
//! [`pdb::PdbFile`] implements it for the Protein Data Bank format.

pub mod pdb;
pub mod traits;
