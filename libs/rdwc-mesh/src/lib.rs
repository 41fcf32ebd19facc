//! # RDWC Mesh
//!
//! Triangle mesh kernel used by the RDWC plumbing generator.
//!
//! ## Architecture
//!
//! ```text
//! primitives (closed solids) → ops::boolean (CSG) → ops::weld / ops::smooth → Mesh
//! ```
//!
//! ## Algorithms
//!
//! - **Boolean Operations**: BSP trees (csg.js algorithm), arena-allocated
//! - **Primitives**: Direct closed-mesh generation, including lathe profiles
//! - **Welding**: Spatial hashing with nearest-representative merging
//!
//! ## Usage
//!
//! ```rust
//! use glam::DVec3;
//! use rdwc_mesh::primitives::{create_cube, create_cylinder};
//! use rdwc_mesh::difference;
//!
//! let block = create_cube(DVec3::splat(2.0), true).unwrap();
//! let bore = create_cylinder(4.0, 0.5, 0.5, true, 16).unwrap();
//! let drilled = difference(&block, &bore).unwrap();
//! assert!(drilled.triangle_count() > block.triangle_count());
//! ```

pub mod error;
pub mod mesh;
pub mod ops;
pub mod primitives;

pub use error::{MeshError, MeshResult};
pub use mesh::Mesh;
pub use ops::boolean::{difference, union};
