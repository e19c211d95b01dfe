//! # Core Module
//!
//! Stateless building blocks for rigid structural superposition: molecule
//! representation, file I/O and geometry.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, molecules and backbone selection
//! - **File I/O** ([`io`]) - Reading and writing PDB files with atom selectors
//! - **Geometry** ([`geometry`]) - Rigid transforms, triangle frames, the spatial hash
//!   and weighted Kabsch superposition
//!
//! Linear algebra is delegated to `nalgebra`; this module only adds the
//! structure-alignment specific pieces on top of it.

pub mod geometry;
pub mod io;
pub mod models;
