//! # Mesh Operations
//!
//! Boolean operations (CSG) and the cleanup passes run on their output.

pub mod bevel;
pub mod boolean;
pub mod smooth;
pub mod weld;

pub use bevel::bevel_sharp_edges;
pub use boolean::{difference, union};
pub use smooth::split_normals;
pub use weld::{weld_vertices, WeldReport};
