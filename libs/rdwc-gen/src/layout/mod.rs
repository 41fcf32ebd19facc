//! # Layout Orchestrator
//!
//! Drives one generation run: validates the configuration, clears the
//! scene, then places every component for the selected layout.
//!
//! ## Run Order
//!
//! ```text
//! validate → clear → pots & manifolds → reservoir → balance tank
//!          → aeration → lighting → finalization
//! ```
//!
//! Only configuration errors abort a run, and they are raised before the
//! scene is touched. Degenerate parts are skipped and failed booleans are
//! recorded; the run always ends with a [`GenerationSummary`].

mod aeration;
mod balance;
mod circular;
mod grid;
mod lighting;
mod reservoir;
mod route;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::compose::{BooleanSolver, Compositor};
use crate::dims::{
    vessel_dims, CylinderDims, FittingGeometry, FittingKind, PipeSpec, VesselClass, VolumeSpec,
};
use crate::error::{ConfigError, GenerateError, SceneError};
use crate::finalize::finalize;
use crate::parts::{self, BuildContext, Diagnostic, Lid};
use crate::placement::{connection_span, fitting_ports, Placement, Port};
use crate::scene::{Category, Scene, Solid};
use crate::settings::{GeneratorConfig, LayoutType};
use config::constants::END_CAP_STUB;
use glam::DVec3;
use log::{debug, info, warn};
use rdwc_mesh::{MeshError, MeshResult};

// =============================================================================
// GENERATOR
// =============================================================================

/// Owns the scene and rebuilds it from a configuration.
///
/// # Example
///
/// ```rust
/// use rdwc_gen::layout::Generator;
/// use rdwc_gen::scene::Category;
/// use rdwc_gen::settings::{GeneratorConfig, Resolution};
///
/// let mut config = GeneratorConfig::default();
/// config.resolution = Resolution::preview();
/// config.features.enable_reservoir = false;
/// config.features.enable_balance_tank = false;
/// config.features.enable_aeration = false;
/// config.lighting.enable_lighting = false;
///
/// let mut generator = Generator::new();
/// let summary = generator.generate(&config).unwrap();
/// assert_eq!(summary.count(Category::Pots), 4);
/// ```
#[derive(Debug, Default)]
pub struct Generator {
    scene: Scene,
    compositor: Compositor,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator using a custom boolean solver.
    pub fn with_solver(solver: Box<dyn BooleanSolver>) -> Self {
        Self {
            scene: Scene::new(),
            compositor: Compositor::new(solver),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Regenerates the whole system.
    ///
    /// On a configuration error the previous scene is left untouched.
    pub fn generate(&mut self, config: &GeneratorConfig) -> Result<GenerationSummary, GenerateError> {
        config.validate()?;
        let pipe = config.pipe.spec()?;
        let pot_volume = VolumeSpec::from_liters(config.pot.volume_liters)
            .map_err(|err| ConfigError::value("pot.volume_liters", err.to_string()))?;
        let pot = vessel_dims(VesselClass::Pot, pot_volume);

        let Self { scene, compositor } = self;
        scene.clear();
        let layout = config.layout.layout_type;
        info!(
            "Generating {layout} layout: {} pots, {} {} pipe",
            pot_count(config),
            config.pipe.size,
            config.pipe.standard
        );

        let mut run = Run {
            config,
            ctx: BuildContext::new(config.resolution, compositor),
            scene,
            pipe,
            pot,
            pot_volume,
            pots: Vec::new(),
            reservoir: None,
            skipped: 0,
        };

        match layout {
            LayoutType::Grid | LayoutType::Linear => grid::build(&mut run)?,
            LayoutType::Circular => circular::build(&mut run)?,
        }
        if config.features.enable_aeration && config.features.air_stones_per_pot > 0 {
            aeration::build(&mut run)?;
        }
        if config.lighting.enable_lighting {
            lighting::build(&mut run)?;
        }

        let Run {
            ctx,
            scene,
            skipped,
            ..
        } = run;
        if config.create_connections {
            finalize(scene, config.optimize_model)?;
        }

        let summary = GenerationSummary {
            layout,
            counts: Category::ALL
                .iter()
                .map(|c| (*c, scene.count(*c)))
                .filter(|(_, n)| *n > 0)
                .collect(),
            total: scene.total(),
            skipped,
            failures: ctx.into_diagnostics(),
        };
        info!("{summary}");
        Ok(summary)
    }
}

fn pot_count(config: &GeneratorConfig) -> u32 {
    config.layout.effective_rows() * config.layout.columns
}

// =============================================================================
// SUMMARY
// =============================================================================

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub layout: LayoutType,
    /// Solids per non-empty category, in category order.
    pub counts: Vec<(Category, usize)>,
    pub total: usize,
    /// Parts skipped because of degenerate dimensions.
    pub skipped: usize,
    /// Boolean steps that failed and were left out.
    pub failures: Vec<Diagnostic>,
}

impl GenerationSummary {
    pub fn count(&self, category: Category) -> usize {
        self.counts
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, n)| *n)
    }
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} layout: {} solids (", self.layout, self.total)?;
        for (i, (category, n)) in self.counts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{category} {n}")?;
        }
        write!(
            f,
            "), {} skipped, {} boolean failures",
            self.skipped,
            self.failures.len()
        )
    }
}

// =============================================================================
// RUN STATE
// =============================================================================

/// A placed vessel the later stages attach to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Vessel {
    pub name: String,
    /// Center of the cylinder.
    pub center: DVec3,
    pub dims: CylinderDims,
}

impl Vessel {
    pub fn floor(&self) -> f64 {
        self.center.z - self.dims.height / 2.0
    }
}

/// Working state of one generation run.
pub(crate) struct Run<'a> {
    pub config: &'a GeneratorConfig,
    pub ctx: BuildContext<'a>,
    pub scene: &'a mut Scene,
    pub pipe: PipeSpec,
    pub pot: CylinderDims,
    pub pot_volume: VolumeSpec,
    pub pots: Vec<Vessel>,
    pub reservoir: Option<Vessel>,
    pub skipped: usize,
}

impl<'a> Run<'a> {
    pub fn geometry(&self, kind: FittingKind) -> FittingGeometry {
        FittingGeometry::for_kind(kind, &self.pipe)
    }

    /// Links a built part, or logs and skips a degenerate one.
    pub fn add(&mut self, built: MeshResult<Solid>) -> Result<bool, SceneError> {
        match built {
            Ok(solid) => {
                debug!("placed {} at {}", solid.name, solid.location());
                self.scene.link(solid)?;
                Ok(true)
            }
            Err(err) => {
                debug!("skipping part: {err}");
                self.skipped += 1;
                Ok(false)
            }
        }
    }

    /// Builds and links a fitting, returning its world ports.
    ///
    /// The ports are returned even if the part itself was skipped, so the
    /// surrounding pipe work stays consistent.
    pub fn fitting(
        &mut self,
        kind: FittingKind,
        name: &str,
        placement: &Placement,
    ) -> Result<Vec<Port>, SceneError> {
        let g = self.geometry(kind);
        let ctx = &mut self.ctx;
        let built = match kind {
            FittingKind::Tee => parts::tee(ctx, name, placement, &g),
            FittingKind::Elbow => parts::elbow(ctx, name, placement, &g),
            FittingKind::Union => parts::union_fitting(ctx, name, placement, &g),
            FittingKind::BallValve => parts::ball_valve(ctx, name, placement, &g),
            FittingKind::CheckValve => parts::check_valve(ctx, name, placement, &g),
            FittingKind::FlowMeter => parts::flow_meter(ctx, name, placement, &g),
            FittingKind::Bulkhead => parts::bulkhead(ctx, name, placement, &g),
            FittingKind::EndCap => parts::end_cap(ctx, name, placement, &g),
            FittingKind::DripEmitter => parts::drip_emitter(ctx, name, placement, &g),
            FittingKind::ManifoldOutlet => Err(MeshError::degenerate(format!(
                "{name}: manifold outlets are built with their block"
            ))),
        };
        self.add(built)?;
        Ok(fitting_ports(&g, placement))
    }

    /// Lays a pipe between two ports. Returns whether a pipe was placed.
    pub fn connect(&mut self, name: &str, from: &Port, to: &Port) -> Result<bool, SceneError> {
        let insertion = self.config.pipe.insertion_depth;
        let Some(span) = connection_span(from, to, insertion) else {
            warn!(
                "{name}: no room for a pipe between {} and {}",
                from.position, to.position
            );
            return Ok(false);
        };
        match parts::pipe(&mut self.ctx, name, &span, self.pipe.radius()) {
            Ok(Some(solid)) => {
                self.scene.link(solid)?;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                debug!("skipping pipe: {err}");
                self.skipped += 1;
                Ok(false)
            }
        }
    }

    /// Closes a free port with a short stub pipe and an end cap.
    pub fn cap(&mut self, suffix: &str, port: &Port) -> Result<(), SceneError> {
        let offset = self.geometry(FittingKind::EndCap).connection_offset();
        let mouth = port.position + port.direction * END_CAP_STUB;
        let placement = Placement::along(mouth + port.direction * offset, port.direction);
        let ports = self.fitting(FittingKind::EndCap, &format!("EndCap_{suffix}"), &placement)?;
        self.connect(&format!("Stub_{suffix}"), port, &ports[0])?;
        Ok(())
    }

    /// Builds a vessel and links it. Returns `None` when it was skipped.
    pub fn vessel(
        &mut self,
        name: &str,
        class: VesselClass,
        dims: CylinderDims,
        center: DVec3,
        lid: Option<Lid>,
    ) -> Result<Option<Vessel>, SceneError> {
        let built = parts::vessel(&mut self.ctx, name, &Placement::at(center), class, &dims, lid);
        if !self.add(built)? {
            return Ok(None);
        }
        Ok(Some(Vessel {
            name: name.to_string(),
            center,
            dims,
        }))
    }

    /// Builds a pot centered above `floor_position` and records it.
    pub fn pot(&mut self, name: &str, floor_position: DVec3) -> Result<(), SceneError> {
        let dims = self.pot;
        let lid = self.config.pot.add_net_pot.then(|| Lid {
            aperture_radius: self.config.pot.net_pot_diameter_cm / 200.0,
        });
        let center = floor_position + DVec3::Z * dims.height / 2.0;
        if let Some(pot) = self.vessel(name, VesselClass::Pot, dims, center, lid)? {
            self.pots.push(pot);
        }
        Ok(())
    }
}
