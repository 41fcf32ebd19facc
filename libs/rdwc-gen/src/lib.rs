//! # RDWC Generator
//!
//! Procedural 3D models of recirculating deep water culture systems:
//! pots, manifolds, fittings, reservoir, balance tank, aeration and
//! lighting, laid out from one configuration record.
//!
//! ## Architecture
//!
//! ```text
//! GeneratorConfig → dims (sizes) → placement (ports, spans)
//!                 → parts (meshes via compose) → layout (Scene) → finalize
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rdwc_gen::{Generator, GeneratorConfig};
//! use rdwc_gen::settings::{LayoutType, Resolution};
//!
//! let mut config = GeneratorConfig::default();
//! config.layout.layout_type = LayoutType::Linear;
//! config.layout.columns = 3;
//! config.resolution = Resolution::preview();
//! config.lighting.enable_lighting = false;
//! config.features.enable_aeration = false;
//!
//! let mut generator = Generator::new();
//! let summary = generator.generate(&config).unwrap();
//! assert!(generator.scene().contains("Pot_0_2"));
//! assert!(summary.total > 3);
//! ```

pub mod compose;
pub mod dims;
pub mod error;
pub mod finalize;
pub mod layout;
pub mod parts;
pub mod placement;
pub mod scene;
pub mod settings;

pub use error::{CompositionError, ConfigError, DimensionError, GenerateError, SceneError};
pub use finalize::{finalize, FinalizeReport};
pub use layout::{GenerationSummary, Generator};
pub use scene::{Category, Scene, Solid};
pub use settings::GeneratorConfig;
