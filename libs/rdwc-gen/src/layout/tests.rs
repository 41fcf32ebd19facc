use super::*;
use crate::compose::BooleanOp;
use crate::finalize::PIPING_SYSTEM_NAME;
use crate::settings::Resolution;
use approx::assert_relative_eq;
use rdwc_mesh::Mesh;
use std::f64::consts::TAU;

fn preview_config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.resolution = Resolution::preview();
    config
}

/// Preview config with every optional subsystem off.
fn bare_config() -> GeneratorConfig {
    let mut config = preview_config();
    config.features.enable_reservoir = false;
    config.features.enable_balance_tank = false;
    config.features.enable_aeration = false;
    config.lighting.enable_lighting = false;
    config
}

fn placements(scene: &Scene) -> Vec<(String, DVec3)> {
    let mut out: Vec<(String, DVec3)> = scene
        .solids()
        .map(|s| (s.name.clone(), s.location()))
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

struct FailingSolver;

impl BooleanSolver for FailingSolver {
    fn solve(&self, _op: BooleanOp, _base: &Mesh, _cutter: &Mesh) -> MeshResult<Mesh> {
        Err(MeshError::boolean_failed("injected"))
    }
}

// =============================================================================
// GRID & LINEAR
// =============================================================================

#[test]
fn test_grid_2x2_manifolds() {
    let mut generator = Generator::new();
    let summary = generator.generate(&bare_config()).unwrap();
    let scene = generator.scene();

    assert_eq!(summary.layout, LayoutType::Grid);
    assert_eq!(summary.count(Category::Pots), 4);
    for name in [
        "Pot_0_0",
        "Pot_1_1",
        "Tee_Inlet_0",
        "Tee_Inlet_1",
        "Tee_Outlet_0",
        "Tee_Outlet_1",
        "Manifold_Pipe_In_0",
        "Manifold_Pipe_Out_0",
        "Valve_In_0_0",
        "Pipe_to_valve_in_1_1",
        "Pot_Pipe_Out_1_0",
        "EndCap_In_First",
        "EndCap_Out_Last",
    ] {
        assert!(scene.contains(name), "missing {name}");
    }
    assert_eq!(summary.count(Category::Valves), 4);

    let with_prefix = |prefix: &str| scene.solids().filter(|s| s.name.starts_with(prefix)).count();
    assert_eq!(with_prefix("Tee_Inlet_"), 2);
    assert_eq!(with_prefix("Tee_Outlet_"), 2);
    assert_eq!(with_prefix("Manifold_Pipe_In_"), 1);
    assert_eq!(with_prefix("Manifold_Pipe_Out_"), 1);
    assert_eq!(with_prefix("Pot_Pipe_Out_"), 4);
    assert!(!scene.contains("Tee_Inlet_2"));
    assert!(!scene.contains("Pot_2_0"));
}

#[test]
fn test_manifold_pipe_seats_on_tee_mouths() {
    let mut generator = Generator::new();
    let config = bare_config();
    generator.generate(&config).unwrap();

    let pipe = config.pipe.spec().unwrap();
    let offset = FittingGeometry::for_kind(FittingKind::Tee, &pipe).connection_offset();
    let solid = generator.scene().find("Manifold_Pipe_Out_0").unwrap();
    let (min, max) = solid.bounding_box().unwrap();
    assert_relative_eq!(min.x, offset, epsilon = 1e-9);
    assert_relative_eq!(max.x, config.layout.spacing_x - offset, epsilon = 1e-9);
}

#[test]
fn test_unions_split_manifold_pipes() {
    let mut config = bare_config();
    config.features.use_unions = true;
    let mut generator = Generator::new();
    generator.generate(&config).unwrap();
    let scene = generator.scene();

    assert!(scene.contains("Union_In_0"));
    assert!(scene.contains("Manifold_Pipe_In_0_1"));
    assert!(scene.contains("Manifold_Pipe_In_0_2"));
    assert!(!scene.contains("Manifold_Pipe_In_0"));
}

#[test]
fn test_linear_is_one_row() {
    let mut config = bare_config();
    config.layout.layout_type = LayoutType::Linear;
    config.layout.rows = 5;
    config.layout.columns = 3;
    let mut generator = Generator::new();
    let summary = generator.generate(&config).unwrap();

    assert_eq!(summary.count(Category::Pots), 3);
    let group = generator.scene().group(Category::Pots).unwrap();
    assert!(group.solids.iter().all(|pot| pot.location().y == 0.0));
    assert!(!generator.scene().contains("Pot_1_0"));
}

// =============================================================================
// CIRCULAR
// =============================================================================

#[test]
fn test_circular_ring_positions() {
    let mut config = bare_config();
    config.layout.layout_type = LayoutType::Circular;
    config.layout.rows = 1;
    config.layout.columns = 6;
    config.layout.circle_radius = 1.5;
    let mut generator = Generator::new();
    let summary = generator.generate(&config).unwrap();
    let scene = generator.scene();

    assert_eq!(summary.count(Category::Pots), 6);
    for i in 0..6 {
        let pot = scene.find(&format!("Pot_circular_{i}")).unwrap();
        let at = pot.location();
        let angle = i as f64 * TAU / 6.0;
        assert_relative_eq!(at.truncate().length(), 1.5, epsilon = 1e-6);
        assert_relative_eq!(at.x, 1.5 * angle.cos(), epsilon = 1e-6);
        assert_relative_eq!(at.y, 1.5 * angle.sin(), epsilon = 1e-6);
        assert!(scene.contains(&format!("Drip_Emitter_{i}")));
        assert!(scene.contains(&format!("Pipe_radial_{i}")));
        assert!(scene.contains(&format!("Drop_{i}")));
    }
    assert!(scene.contains("Central_Manifold"));
    assert!(scene.contains("EndCap_Hub_Bottom"));
    assert!(scene.contains("EndCap_Hub_Top"));
}

#[test]
fn test_circular_reservoir_feeds_hub() {
    let mut config = bare_config();
    config.layout.layout_type = LayoutType::Circular;
    config.features.enable_reservoir = true;
    let mut generator = Generator::new();
    generator.generate(&config).unwrap();
    let scene = generator.scene();

    assert!(scene.contains("Main_Reservoir"));
    assert!(scene.contains("Feed_Pipe_0"));
    assert!(!scene.contains("EndCap_Hub_Top"));
    let reservoir = scene.find("Main_Reservoir").unwrap().location();
    assert!(reservoir.y < 0.0);
}

// =============================================================================
// SUBSYSTEMS
// =============================================================================

#[test]
fn test_full_grid_subsystems() {
    let mut generator = Generator::new();
    let summary = generator.generate(&preview_config()).unwrap();
    let scene = generator.scene();

    for name in [
        "Main_Reservoir",
        "Main_Pump",
        "Pump_Bulkhead",
        "Feed_Pipe_0",
        "Water_Level_High",
        "Water_Level_Low",
        "Probe_Holder",
        "Balance_Tank",
        "Balance_Junction",
        "Balance_Pipe_In",
        "Air_Pump",
        "Air_Stone_Pot_0_0",
        "LED_Panel_0",
    ] {
        assert!(scene.contains(name), "missing {name}");
    }
    // The balance loop takes the first mouths instead of end caps
    assert!(!scene.contains("EndCap_In_First"));
    // Four pots plus reservoir and balance tank
    assert_eq!(summary.count(Category::Pots), 6);
    assert_eq!(summary.count(Category::Aeration), 5);

    let (_, top) = scene
        .bounding_box(&[Category::Pots, Category::Pipes, Category::Fittings])
        .unwrap();
    let panel = scene.find("LED_Panel_0").unwrap().location();
    assert_relative_eq!(panel.z, top.z + config::constants::DEFAULT_LIGHT_HEIGHT, epsilon = 1e-9);
}

#[test]
fn test_toggles_disable_subsystems() {
    let mut generator = Generator::new();
    let summary = generator.generate(&bare_config()).unwrap();
    let scene = generator.scene();

    assert!(!scene.contains("Main_Reservoir"));
    assert!(!scene.contains("Balance_Tank"));
    assert_eq!(summary.count(Category::Aeration), 0);
    assert_eq!(summary.count(Category::Lighting), 0);
    assert_eq!(summary.count(Category::Pumps), 0);
}

#[test]
fn test_zero_reservoir_volume_skips_reservoir() {
    let mut config = bare_config();
    config.features.enable_reservoir = true;
    config.reservoir.volume_liters = 0.0;
    let mut generator = Generator::new();
    generator.generate(&config).unwrap();
    assert!(!generator.scene().contains("Main_Reservoir"));
    assert!(!generator.scene().contains("Main_Pump"));
}

#[test]
fn test_multiple_air_stones_per_pot() {
    let mut config = bare_config();
    config.features.enable_aeration = true;
    config.features.air_stones_per_pot = 3;
    let mut generator = Generator::new();
    let summary = generator.generate(&config).unwrap();

    // One pump plus three stones in each of four pots
    assert_eq!(summary.count(Category::Aeration), 13);
    let pot = generator.scene().find("Pot_0_0").unwrap().location();
    let stone = generator.scene().find("Air_Stone_Pot_0_0_1").unwrap().location();
    assert!(stone.truncate().distance(pot.truncate()) > 0.0);
}

// =============================================================================
// RUN SEMANTICS
// =============================================================================

#[test]
fn test_generation_is_idempotent() {
    let config = preview_config();
    let mut generator = Generator::new();
    generator.generate(&config).unwrap();
    let first = placements(generator.scene());
    generator.generate(&config).unwrap();
    let second = placements(generator.scene());

    assert_eq!(first.len(), second.len());
    for ((name_a, at_a), (name_b, at_b)) in first.iter().zip(&second) {
        assert_eq!(name_a, name_b);
        assert!(at_a.abs_diff_eq(*at_b, 1e-12), "{name_a} moved");
    }
}

#[test]
fn test_invalid_config_keeps_previous_scene() {
    let mut generator = Generator::new();
    generator.generate(&bare_config()).unwrap();
    let before = placements(generator.scene());

    let mut config = bare_config();
    config.layout.rows = 0;
    let err = generator.generate(&config).unwrap_err();
    assert!(matches!(err, GenerateError::Config(ConfigError::Layout { .. })));
    assert_eq!(placements(generator.scene()), before);
}

#[test]
fn test_failed_booleans_do_not_abort() {
    let mut generator = Generator::with_solver(Box::new(FailingSolver));
    let summary = generator.generate(&bare_config()).unwrap();

    assert_eq!(summary.count(Category::Pots), 4);
    assert!(!summary.failures.is_empty());
    assert!(generator.scene().contains("Tee_Inlet_0"));
}

#[test]
fn test_connections_merge_piping() {
    let mut config = bare_config();
    config.create_connections = true;
    config.optimize_model = true;
    let mut generator = Generator::new();
    let summary = generator.generate(&config).unwrap();
    let scene = generator.scene();

    let system = scene.find(PIPING_SYSTEM_NAME).unwrap();
    assert!(system.mesh.triangle_count() > 0);
    assert_eq!(summary.count(Category::Pipes), 0);
    assert_eq!(summary.count(Category::Fittings), 0);
    assert_eq!(summary.count(Category::System), 1);
    // Valves stay separate parts
    assert_eq!(summary.count(Category::Valves), 4);
}

#[test]
fn test_summary_display() {
    let mut generator = Generator::new();
    let summary = generator.generate(&bare_config()).unwrap();
    let text = summary.to_string();
    assert!(text.starts_with("GRID layout"));
    assert!(text.contains("Pots 4"));
}
