//! # Configuration Constants
//!
//! Centralized constants for the RDWC generator. All geometry tolerances,
//! tessellation parameters, part proportions and layout factors are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison and welding tolerances
//! - **Resolution**: Default segment counts per part family
//! - **Limits**: Safety bounds for the boolean kernel
//! - **Pipes & Fittings**: Wall ratios and finishing parameters
//! - **Vessels**: Shell thickness and rim proportions
//! - **Layout**: Placement factors used by the orchestrator

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Plane thickness used when classifying points during BSP booleans.
///
/// Lengths are in meters, so this is one micrometer. Points closer than
/// this to a splitting plane are treated as coplanar.
///
/// # Example
///
/// ```rust
/// use config::constants::BSP_EPSILON;
///
/// let distance_to_plane: f64 = 5e-7;
/// assert!(distance_to_plane.abs() < BSP_EPSILON);
/// ```
pub const BSP_EPSILON: f64 = 1e-6;

/// Epsilon for exact-duplicate vertex merging.
///
/// Used when rebuilding indexed meshes from boolean output, where the same
/// point is emitted once per polygon.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// fn vertices_should_merge(v1: [f64; 3], v2: [f64; 3]) -> bool {
///     let dx = v1[0] - v2[0];
///     let dy = v1[1] - v2[1];
///     let dz = v1[2] - v2[2];
///     (dx * dx + dy * dy + dz * dz).sqrt() < VERTEX_MERGE_EPSILON
/// }
///
/// assert!(vertices_should_merge([0.0; 3], [1e-10, 0.0, 0.0]));
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-9;

/// Weld distance applied to the merged piping system (1 mm).
///
/// Pipe ends and socket mouths closer than this collapse to a single
/// vertex, closing seams between separately generated parts.
///
/// # Example
///
/// ```rust
/// use config::constants::WELD_DISTANCE;
///
/// let seam_gap = 0.0004;
/// assert!(seam_gap < WELD_DISTANCE);
/// ```
pub const WELD_DISTANCE: f64 = 1e-3;

/// Shortest pipe that is still generated (0.1 mm).
///
/// Connections whose endpoints are closer than this are a no-op.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_PIPE_LENGTH;
///
/// let span = 0.00002;
/// let generate = span >= MIN_PIPE_LENGTH;
/// assert!(!generate);
/// ```
pub const MIN_PIPE_LENGTH: f64 = 1e-4;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default segment count for pipes.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SEGMENTS;
///
/// assert!(DEFAULT_SEGMENTS >= 12);
/// ```
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Segment count for pots, reservoirs and the balance tank.
pub const VESSEL_SEGMENTS: u32 = 64;

/// Segment count for fitting arms, sockets and their hollow cutters.
pub const FITTING_SEGMENTS: u32 = 32;

/// Segment count for small accessories (sensors, air stones, nozzles).
pub const DETAIL_SEGMENTS: u32 = 16;

/// Segment count used by the preview resolution preset.
pub const PREVIEW_SEGMENTS: u32 = 12;

/// Minimum number of segments for any circular primitive.
///
/// A circle needs at least 3 points to form a polygon.
pub const MIN_SEGMENTS: u32 = 3;

/// Maximum number of segments for any circular primitive.
pub const MAX_SEGMENTS: u32 = 512;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum depth of a BSP tree built during a boolean operation.
///
/// Trees deeper than this indicate pathological input and the boolean
/// reports failure instead of continuing.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_BSP_DEPTH;
///
/// let depth = 300;
/// assert!(depth < MAX_BSP_DEPTH);
/// ```
pub const MAX_BSP_DEPTH: usize = 20_000;

/// Maximum number of polygons a single boolean operation may produce.
pub const MAX_BOOLEAN_POLYGONS: usize = 1_000_000;

// =============================================================================
// PIPE & FITTING CONSTANTS
// =============================================================================

/// Pipe wall thickness as a fraction of the outer diameter.
///
/// # Example
///
/// ```rust
/// use config::constants::PIPE_WALL_RATIO;
///
/// let diameter = 0.025;
/// let wall = diameter * PIPE_WALL_RATIO;
/// assert!(wall < diameter / 2.0);
/// ```
pub const PIPE_WALL_RATIO: f64 = 0.15;

/// Length of a hollowing cutter relative to the reach it must clear.
///
/// Cutters overshoot every socket mouth so the mouth is opened cleanly.
pub const CUTTER_LENGTH_FACTOR: f64 = 2.5;

/// Bevel width as a fraction of the fitting wall thickness.
pub const BEVEL_WIDTH_RATIO: f64 = 0.2;

/// Number of relaxation steps used by a bevel.
pub const BEVEL_SEGMENTS: u32 = 2;

/// Dihedral angle (degrees) above which an edge is beveled.
pub const BEVEL_ANGLE_LIMIT_DEG: f64 = 30.0;

/// Dihedral angle (degrees) above which smooth normals are split.
pub const EDGE_SPLIT_ANGLE_DEG: f64 = 30.0;

// =============================================================================
// VESSEL CONSTANTS
// =============================================================================

/// Wall thickness of pots (3 mm).
pub const POT_WALL_THICKNESS: f64 = 0.003;

/// Wall thickness of the reservoir and balance tank (5 mm).
pub const TANK_WALL_THICKNESS: f64 = 0.005;

/// Outer radius of a vessel rim relative to the vessel radius.
pub const RIM_FLARE_SCALE: f64 = 1.1;

/// How far the rim skirt hangs below the top edge (2 cm).
pub const RIM_DROP: f64 = 0.02;

/// Largest net-pot aperture relative to the inner vessel radius.
pub const MAX_APERTURE_RATIO: f64 = 0.9;

// =============================================================================
// LAYOUT CONSTANTS
// =============================================================================

/// Distance of each manifold line beyond the outer pot row, in row spacings.
pub const MANIFOLD_OFFSET_FACTOR: f64 = 0.8;

/// Distance of the reservoir below the outlet manifold, in row spacings.
pub const RESERVOIR_OFFSET_FACTOR: f64 = 1.5;

/// Distance of the balance tank below the outlet manifold, in row spacings.
pub const BALANCE_OFFSET_FACTOR: f64 = 0.75;

/// Default balance tank volume relative to one pot.
pub const BALANCE_VOLUME_FACTOR: f64 = 1.5;

/// Default pipe height as a percentage of pot height.
pub const DEFAULT_PIPE_HEIGHT_PERCENT: f64 = 15.0;

/// Gap between a drain valve's outlet and the pot wall (5 cm).
pub const DRAIN_VALVE_SETBACK: f64 = 0.05;

/// Length of the stub pipe between a manifold's last tee and its end cap.
pub const END_CAP_STUB: f64 = 0.05;

/// Clearance used when routing feed lines around pots and tanks.
pub const ROUTE_CLEARANCE: f64 = 0.1;

/// Air stone height as a fraction of pot height.
pub const AIR_STONE_HEIGHT_RATIO: f64 = 0.15;

/// Radius of the air stone ring as a fraction of pot radius.
pub const AIR_STONE_RING_RATIO: f64 = 0.5;

/// Horizontal gap between the reservoir wall and the air pump.
pub const AIR_PUMP_SIDE_OFFSET: f64 = 0.3;

/// Default height of light panels above the tallest component.
pub const DEFAULT_LIGHT_HEIGHT: f64 = 0.6;

/// Default footprint of one LED panel (square, meters).
pub const LED_PANEL_SIZE: f64 = 0.6;

// =============================================================================
// EMISSION CONSTANTS
// =============================================================================

/// Emission color of LED panels (warm white).
pub const LED_EMISSION_COLOR: [f32; 4] = [1.0, 0.95, 0.85, 1.0];

/// Emission strength of LED panels.
pub const LED_EMISSION_STRENGTH: f32 = 5.0;
