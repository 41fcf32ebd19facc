//! # Generator Settings
//!
//! The configuration record a host hands to the generator. Every field has
//! a default, so a partial JSON document is a valid configuration.
//!
//! ## Example
//!
//! ```rust
//! use rdwc_gen::settings::{GeneratorConfig, LayoutType};
//!
//! let config = GeneratorConfig::from_json(r#"{ "layout": { "layout_type": "CIRCULAR" } }"#).unwrap();
//! assert_eq!(config.layout.layout_type, LayoutType::Circular);
//! assert_eq!(config.pot.volume_liters, 25.0);
//! ```

use crate::dims::{PipeSpec, PipeStandard};
use crate::error::ConfigError;
use config::constants::{
    BALANCE_VOLUME_FACTOR, DEFAULT_LIGHT_HEIGHT, DEFAULT_PIPE_HEIGHT_PERCENT, DEFAULT_SEGMENTS,
    DETAIL_SEGMENTS, FITTING_SEGMENTS, LED_PANEL_SIZE, MAX_SEGMENTS, MIN_SEGMENTS,
    PREVIEW_SEGMENTS, VESSEL_SEGMENTS,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// LAYOUT
// =============================================================================

/// Arrangement of the pots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutType {
    #[default]
    Grid,
    Linear,
    Circular,
}

impl std::fmt::Display for LayoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Grid => "GRID",
            Self::Linear => "LINEAR",
            Self::Circular => "CIRCULAR",
        };
        f.write_str(name)
    }
}

/// Pot arrangement parameters. Distances are meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub layout_type: LayoutType,
    pub rows: u32,
    pub columns: u32,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub circle_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout_type: LayoutType::Grid,
            rows: 2,
            columns: 2,
            spacing_x: 0.6,
            spacing_y: 0.6,
            circle_radius: 1.5,
        }
    }
}

impl LayoutConfig {
    /// Number of rows actually generated; LINEAR always has one.
    pub fn effective_rows(&self) -> u32 {
        match self.layout_type {
            LayoutType::Linear => 1,
            LayoutType::Grid | LayoutType::Circular => self.rows,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::layout(format!(
                "rows and columns must be at least 1 (got {} x {})",
                self.rows, self.columns
            )));
        }
        for (name, value) in [
            ("spacing_x", self.spacing_x),
            ("spacing_y", self.spacing_y),
            ("circle_radius", self.circle_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::layout(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

// =============================================================================
// COMPONENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotConfig {
    pub volume_liters: f64,
    /// Adds a lid with a net-pot aperture.
    pub add_net_pot: bool,
    pub net_pot_diameter_cm: f64,
}

impl Default for PotConfig {
    fn default() -> Self {
        Self {
            volume_liters: 25.0,
            add_net_pot: true,
            net_pot_diameter_cm: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservoirConfig {
    /// A volume of zero or less skips the reservoir subtree.
    pub volume_liters: f64,
    pub add_lid: bool,
}

impl Default for ReservoirConfig {
    fn default() -> Self {
        Self {
            volume_liters: 100.0,
            add_lid: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTankConfig {
    /// Tank volume as a multiple of one pot's volume.
    pub volume_factor: f64,
}

impl Default for BalanceTankConfig {
    fn default() -> Self {
        Self {
            volume_factor: BALANCE_VOLUME_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub standard: PipeStandard,
    /// Nominal size: millimeters for TR and METRIC, inches for IMPERIAL.
    pub size: f64,
    /// Pipe plane height as a percentage of pot height.
    pub height_percent: f64,
    pub slope_degrees: f64,
    /// How far pipe ends reach past each socket mouth.
    pub insertion_depth: f64,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            standard: PipeStandard::Metric,
            size: 25.0,
            height_percent: DEFAULT_PIPE_HEIGHT_PERCENT,
            slope_degrees: 0.0,
            insertion_depth: 0.0,
        }
    }
}

impl PipeConfig {
    pub fn spec(&self) -> Result<PipeSpec, ConfigError> {
        Ok(PipeSpec::new(self.standard, self.size)?)
    }
}

/// Shape of the air stones placed in each pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AirStoneType {
    #[default]
    Cylinder,
    Disk,
    Ball,
    Bar,
}

/// Optional subsystems and inline parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub enable_reservoir: bool,
    pub enable_balance_tank: bool,
    pub enable_aeration: bool,
    pub add_drain_valves: bool,
    pub add_check_valves: bool,
    pub add_flow_indicators: bool,
    pub add_water_level_sensors: bool,
    pub add_probe_holders: bool,
    pub use_unions: bool,
    pub probe_count: u32,
    pub air_stones_per_pot: u32,
    pub air_stone_type: AirStoneType,
    pub air_pump_outlets: u32,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            enable_reservoir: true,
            enable_balance_tank: true,
            enable_aeration: true,
            add_drain_valves: true,
            add_check_valves: false,
            add_flow_indicators: false,
            add_water_level_sensors: true,
            add_probe_holders: true,
            use_unions: false,
            probe_count: 2,
            air_stones_per_pot: 1,
            air_stone_type: AirStoneType::Cylinder,
            air_pump_outlets: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub enable_lighting: bool,
    /// Height of the panels above the tallest component.
    pub light_height: f64,
    pub panel_width: f64,
    pub panel_depth: f64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            enable_lighting: true,
            light_height: DEFAULT_LIGHT_HEIGHT,
            panel_width: LED_PANEL_SIZE,
            panel_depth: LED_PANEL_SIZE,
        }
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Segment counts per part family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolution {
    pub vessel_segments: u32,
    pub pipe_segments: u32,
    pub fitting_segments: u32,
    pub detail_segments: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self::standard()
    }
}

impl Resolution {
    /// Full quality output.
    pub fn standard() -> Self {
        Self {
            vessel_segments: VESSEL_SEGMENTS,
            pipe_segments: DEFAULT_SEGMENTS,
            fitting_segments: FITTING_SEGMENTS,
            detail_segments: DETAIL_SEGMENTS,
        }
    }

    /// Coarse output for quick iterations.
    pub fn preview() -> Self {
        Self {
            vessel_segments: 2 * PREVIEW_SEGMENTS,
            pipe_segments: PREVIEW_SEGMENTS,
            fitting_segments: PREVIEW_SEGMENTS,
            detail_segments: PREVIEW_SEGMENTS / 2,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("vessel_segments", self.vessel_segments),
            ("pipe_segments", self.pipe_segments),
            ("fitting_segments", self.fitting_segments),
            ("detail_segments", self.detail_segments),
        ] {
            if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&value) {
                return Err(ConfigError::Resolution {
                    message: format!(
                        "{name} must be between {MIN_SEGMENTS} and {MAX_SEGMENTS}, got {value}"
                    ),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// GENERATOR CONFIG
// =============================================================================

/// Complete input of one generation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub layout: LayoutConfig,
    pub pot: PotConfig,
    pub reservoir: ReservoirConfig,
    pub balance_tank: BalanceTankConfig,
    pub pipe: PipeConfig,
    pub features: FeatureToggles,
    pub lighting: LightingConfig,
    /// Welds and smooths the merged piping system.
    pub optimize_model: bool,
    /// Merges pipes and simple fittings into one system mesh.
    pub create_connections: bool,
    pub resolution: Resolution,
}

impl GeneratorConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })
    }

    /// Checks everything a run depends on before any state is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.pipe.spec()?;
        self.resolution.validate()?;

        if !self.pot.volume_liters.is_finite() || self.pot.volume_liters <= 0.0 {
            return Err(ConfigError::value(
                "pot.volume_liters",
                format!("must be positive, got {}", self.pot.volume_liters),
            ));
        }
        let pipe = &self.pipe;
        if !pipe.height_percent.is_finite() || !(0.0..=100.0).contains(&pipe.height_percent) {
            return Err(ConfigError::value(
                "pipe.height_percent",
                format!("must be within 0..=100, got {}", pipe.height_percent),
            ));
        }
        if !pipe.slope_degrees.is_finite() || pipe.slope_degrees.abs() >= 45.0 {
            return Err(ConfigError::value(
                "pipe.slope_degrees",
                format!("must be within -45..45, got {}", pipe.slope_degrees),
            ));
        }
        if !pipe.insertion_depth.is_finite() || pipe.insertion_depth < 0.0 {
            return Err(ConfigError::value(
                "pipe.insertion_depth",
                format!("must not be negative, got {}", pipe.insertion_depth),
            ));
        }
        let lighting = &self.lighting;
        if lighting.enable_lighting {
            for (field, value) in [
                ("lighting.panel_width", lighting.panel_width),
                ("lighting.panel_depth", lighting.panel_depth),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::value(field, format!("must be positive, got {value}")));
                }
            }
            if !lighting.light_height.is_finite() {
                return Err(ConfigError::value("lighting.light_height", "must be finite"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
