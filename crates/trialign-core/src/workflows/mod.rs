//! # Workflows Module
//!
//! High-level entry points that run a complete procedure on whole molecules.
//!
//! - **Alignment Workflow** ([`align`]) - Picks the backbone atoms of both
//!   molecules, runs the triangle search on their centered copies, and expresses
//!   the result as a transform of the original model coordinates.

pub mod align;
