//! # Dimensions
//!
//! Pure functions deriving physical sizes from semantic inputs. Liters and
//! nominal pipe sizes are converted to meters here and nowhere else.
//!
//! ## Vessel Classes
//!
//! | Class | Height | Volume |
//! |-------|--------|--------|
//! | Pot | 2.5·r | 2.5·π·r³ |
//! | Reservoir | 1.5·(2r) | 3·π·r³ |
//! | Balance tank | 1.5·r | 1.5·π·r³ |
//!
//! ## Fitting Proportions
//!
//! Socket and arm lengths scale with the pipe's outer diameter `d`, socket
//! radii with its outer radius `r`. The connection offset (arm + socket) is
//! the distance from a fitting's center to each socket mouth.

use std::f64::consts::PI;
use std::fmt;

use crate::error::DimensionError;
use config::constants::{POT_WALL_THICKNESS, PIPE_WALL_RATIO, TANK_WALL_THICKNESS};
use glam::DVec3;
use serde::{Deserialize, Serialize};

// =============================================================================
// VESSELS
// =============================================================================

/// A vessel volume, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSpec {
    liters: f64,
}

impl VolumeSpec {
    /// Creates a volume from liters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rdwc_gen::dims::VolumeSpec;
    ///
    /// let pot = VolumeSpec::from_liters(25.0).unwrap();
    /// assert_eq!(pot.cubic_meters(), 0.025);
    /// assert!(VolumeSpec::from_liters(0.0).is_err());
    /// ```
    pub fn from_liters(liters: f64) -> Result<Self, DimensionError> {
        if !liters.is_finite() || liters <= 0.0 {
            return Err(DimensionError::InvalidVolume { liters });
        }
        Ok(Self { liters })
    }

    /// Volume in liters.
    pub fn liters(&self) -> f64 {
        self.liters
    }

    /// Volume in cubic meters.
    pub fn cubic_meters(&self) -> f64 {
        self.liters / 1000.0
    }
}

/// Shape family of a cylindrical vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselClass {
    Pot,
    Reservoir,
    BalanceTank,
}

impl VesselClass {
    /// Height as a multiple of radius.
    pub fn aspect(self) -> f64 {
        match self {
            Self::Pot => 2.5,
            Self::Reservoir => 3.0,
            Self::BalanceTank => 1.5,
        }
    }

    /// Shell thickness of the vessel wall.
    pub fn wall_thickness(self) -> f64 {
        match self {
            Self::Pot => POT_WALL_THICKNESS,
            Self::Reservoir | Self::BalanceTank => TANK_WALL_THICKNESS,
        }
    }
}

/// Radius and height of a cylindrical vessel, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderDims {
    pub radius: f64,
    pub height: f64,
}

impl CylinderDims {
    /// Enclosed volume in cubic meters.
    pub fn volume(&self) -> f64 {
        PI * self.radius * self.radius * self.height
    }
}

/// Inverts the class volume formula `V = aspect·π·r³`.
///
/// # Example
///
/// ```rust
/// use rdwc_gen::dims::{vessel_dims, VesselClass, VolumeSpec};
///
/// let volume = VolumeSpec::from_liters(25.0).unwrap();
/// let dims = vessel_dims(VesselClass::Pot, volume);
/// assert!((dims.height - 2.5 * dims.radius).abs() < 1e-12);
/// assert!((dims.volume() - 0.025).abs() < 1e-9);
/// ```
pub fn vessel_dims(class: VesselClass, volume: VolumeSpec) -> CylinderDims {
    let aspect = class.aspect();
    let radius = (volume.cubic_meters() / (aspect * PI)).cbrt();
    CylinderDims {
        radius,
        height: aspect * radius,
    }
}

// =============================================================================
// PIPES
// =============================================================================

/// Nominal pipe sizing standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipeStandard {
    /// Turkish PVC, nominal millimeters.
    Tr,
    /// Metric, nominal millimeters.
    Metric,
    /// Imperial NPS, nominal inches.
    Imperial,
}

impl fmt::Display for PipeStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tr => "TR",
            Self::Metric => "METRIC",
            Self::Imperial => "IMPERIAL",
        };
        f.write_str(name)
    }
}

const TR_SIZES_MM: [f64; 4] = [20.0, 25.0, 32.0, 50.0];
const METRIC_SIZES_MM: [f64; 5] = [15.0, 20.0, 25.0, 40.0, 50.0];

/// NPS size in inches and its actual outer diameter in millimeters.
const IMPERIAL_SIZES: [(f64, f64); 6] = [
    (0.5, 21.3),
    (0.75, 26.7),
    (1.0, 33.4),
    (1.25, 42.2),
    (1.5, 48.3),
    (2.0, 60.3),
];

/// Nominal sizes are matched with this tolerance.
const SIZE_TOLERANCE: f64 = 1e-6;

impl PipeStandard {
    /// Nominal sizes offered by the standard, in its own unit.
    pub fn sizes(self) -> Vec<f64> {
        match self {
            Self::Tr => TR_SIZES_MM.to_vec(),
            Self::Metric => METRIC_SIZES_MM.to_vec(),
            Self::Imperial => IMPERIAL_SIZES.iter().map(|(inches, _)| *inches).collect(),
        }
    }

    /// Outer diameter in millimeters for a nominal size.
    fn outer_diameter_mm(self, nominal: f64) -> Option<f64> {
        let matches = |size: f64| (size - nominal).abs() < SIZE_TOLERANCE;
        match self {
            Self::Tr => TR_SIZES_MM.iter().copied().find(|s| matches(*s)),
            Self::Metric => METRIC_SIZES_MM.iter().copied().find(|s| matches(*s)),
            Self::Imperial => IMPERIAL_SIZES
                .iter()
                .find(|(inches, _)| matches(*inches))
                .map(|(_, od)| *od),
        }
    }
}

/// A pipe size resolved to meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeSpec {
    diameter: f64,
}

impl PipeSpec {
    /// Resolves a nominal size within a standard.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rdwc_gen::dims::{PipeSpec, PipeStandard};
    ///
    /// let metric = PipeSpec::new(PipeStandard::Metric, 25.0).unwrap();
    /// assert!((metric.diameter() - 0.025).abs() < 1e-12);
    ///
    /// let imperial = PipeSpec::new(PipeStandard::Imperial, 1.0).unwrap();
    /// assert!((imperial.diameter() - 0.0334).abs() < 1e-12);
    ///
    /// assert!(PipeSpec::new(PipeStandard::Tr, 40.0).is_err());
    /// ```
    pub fn new(standard: PipeStandard, nominal: f64) -> Result<Self, DimensionError> {
        let mm = standard
            .outer_diameter_mm(nominal)
            .ok_or(DimensionError::UnsupportedPipeSize {
                standard,
                size: nominal,
            })?;
        Self::from_diameter(mm / 1000.0)
    }

    /// Creates a pipe size from an outer diameter in meters.
    pub fn from_diameter(diameter: f64) -> Result<Self, DimensionError> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(DimensionError::InvalidDiameter { diameter });
        }
        Ok(Self { diameter })
    }

    /// Outer diameter in meters.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Outer radius in meters.
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn wall_thickness(&self) -> f64 {
        self.diameter * PIPE_WALL_RATIO
    }

    /// Bore radius in meters.
    pub fn inner_radius(&self) -> f64 {
        self.radius() - self.wall_thickness()
    }
}

// =============================================================================
// FITTINGS
// =============================================================================

/// Every part that receives pipes in sockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FittingKind {
    Tee,
    Elbow,
    Union,
    BallValve,
    CheckValve,
    FlowMeter,
    Bulkhead,
    EndCap,
    ManifoldOutlet,
    DripEmitter,
}

impl FittingKind {
    /// `(socket radius × r, socket length × d, arm length × d)`.
    fn proportions(self) -> (f64, f64, f64) {
        match self {
            Self::Tee | Self::Elbow => (1.25, 0.6, 0.8),
            Self::Union => (1.3, 0.5, 0.75),
            Self::BallValve => (1.2, 0.4, 0.75),
            Self::CheckValve => (1.2, 0.4, 0.8),
            Self::FlowMeter => (1.2, 0.3, 0.8),
            Self::Bulkhead => (1.3, 0.2, 0.75),
            Self::EndCap => (1.25, 0.6, 0.75),
            Self::ManifoldOutlet => (1.2, 0.25, 0.75),
            Self::DripEmitter => (1.2, 0.4, 0.75),
        }
    }

    /// Outward socket axes in the fitting's local frame.
    ///
    /// Tees run along X with the branch on +Y, elbows turn from +X to +Y,
    /// and inline parts run along Z.
    pub fn socket_axes(self) -> &'static [DVec3] {
        match self {
            Self::Tee => &[DVec3::X, DVec3::NEG_X, DVec3::Y],
            Self::Elbow => &[DVec3::X, DVec3::Y],
            Self::Union
            | Self::BallValve
            | Self::CheckValve
            | Self::FlowMeter
            | Self::Bulkhead => &[DVec3::NEG_Z, DVec3::Z],
            Self::EndCap => &[DVec3::NEG_Z],
            Self::ManifoldOutlet | Self::DripEmitter => &[DVec3::Z],
        }
    }
}

/// Socket and arm sizes of one fitting kind for one pipe size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittingGeometry {
    pub kind: FittingKind,
    /// Outer radius of the pipe the fitting receives.
    pub pipe_radius: f64,
    /// Bore radius, matching the pipe's inner radius.
    pub inner_radius: f64,
    pub socket_outer_radius: f64,
    pub socket_length: f64,
    /// Length of the solid core from the center to where the socket begins.
    pub arm_length: f64,
    /// Wall thickness of the pipe.
    pub wall_thickness: f64,
}

impl FittingGeometry {
    /// Derives fitting geometry from a pipe size.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rdwc_gen::dims::{FittingGeometry, FittingKind, PipeSpec};
    ///
    /// let pipe = PipeSpec::from_diameter(0.025).unwrap();
    /// let tee = FittingGeometry::for_kind(FittingKind::Tee, &pipe);
    /// assert!((tee.connection_offset() - 0.035).abs() < 1e-12);
    /// ```
    pub fn for_kind(kind: FittingKind, pipe: &PipeSpec) -> Self {
        let (socket_ratio, socket_len_ratio, arm_ratio) = kind.proportions();
        let d = pipe.diameter();
        Self {
            kind,
            pipe_radius: pipe.radius(),
            inner_radius: pipe.inner_radius(),
            socket_outer_radius: pipe.radius() * socket_ratio,
            socket_length: d * socket_len_ratio,
            arm_length: d * arm_ratio,
            wall_thickness: pipe.wall_thickness(),
        }
    }

    /// Distance from the fitting center to every socket mouth.
    pub fn connection_offset(&self) -> f64 {
        self.arm_length + self.socket_length
    }
}

// =============================================================================
// TESTS
// =============================================================================
