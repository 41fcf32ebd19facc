//! # Config Crate
//!
//! Centralized constants for the RDWC plumbing generator.
//! Tolerances, tessellation defaults, wall ratios and layout factors live
//! here so the mesh kernel and the generator agree on every magic number.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{MIN_PIPE_LENGTH, WELD_DISTANCE};
//!
//! // A pipe shorter than the minimum is never generated
//! let length = 0.00005;
//! assert!(length < MIN_PIPE_LENGTH);
//!
//! // Seams closer than the weld distance collapse during finalization
//! assert!(0.0005 < WELD_DISTANCE);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Meters Internally**: Every length is in meters
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
