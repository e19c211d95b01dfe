//! # Engine Module
//!
//! The triangle-based superposition search and the pieces it is built from.
//!
//! ## Overview
//!
//! For every pair of triangles (three consecutive target atoms, three consecutive
//! model atoms) the engine derives the pose overlaying the model triangle on the
//! target triangle, collects the atom pairs that pose brings within a distance
//! threshold, refines the pose by weighted least squares over those pairs, and
//! keeps the candidate that pairs the most atoms.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Distance threshold and backbone selection
//! - **Correspondences** ([`matching`], [`correspondence`]) - One-to-one scored
//!   atom pairs, their best fit, and how they are gathered from a spatial hash
//! - **Search** ([`search`]) - Exhaustive enumeration of triangle pairs, optionally
//!   parallel over target rows with a deterministic reduction
//! - **State Tracking** ([`state`]) - The best alignment found so far
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod correspondence;
pub mod error;
pub mod matching;
pub mod progress;
pub mod search;
pub mod state;
