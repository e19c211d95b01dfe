//! # TriAlign Core Library
//!
//! Structural superposition of two molecules by exhaustive triangle matching.
//!
//! Every triangle of three consecutive backbone atoms of the target is paired with
//! every such triangle of the model. Each pairing proposes a rigid pose, the pose is
//! scored by how many model atoms it places within a distance threshold of distinct
//! target atoms, and it is refined by a weighted least-squares (Kabsch) fit over
//! those pairs. The pose pairing the most atoms wins.
//!
//! ## Architecture
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Molecule`),
//!   geometric primitives (rigid transforms, triangle frames, the spatial hash,
//!   weighted superposition) and PDB input/output.
//!
//! - **[`engine`]: The Search.** One-to-one correspondences and their best fit,
//!   the correspondence builder, the exhaustive triangle search (parallel over
//!   target rows with the `parallel` feature), configuration and progress events.
//!
//! - **[`workflows`]: The Public API.** Runs a complete alignment of two whole
//!   molecules: backbone selection, centering, search, and the transform of the
//!   original model coordinates.

pub mod core;
pub mod engine;
pub mod workflows;
