//! # Tests for Config Constants
//!
//! Unit tests verifying the consistency of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_tolerances_are_ordered() {
    // Exact-duplicate merging must stay far below the seam weld distance
    assert!(EPSILON < VERTEX_MERGE_EPSILON);
    assert!(VERTEX_MERGE_EPSILON < BSP_EPSILON);
    assert!(BSP_EPSILON < MIN_PIPE_LENGTH);
    assert!(MIN_PIPE_LENGTH < WELD_DISTANCE);
}

#[test]
fn test_weld_distance_is_one_millimeter() {
    assert_eq!(WELD_DISTANCE, 0.001);
}

// =============================================================================
// RESOLUTION TESTS
// =============================================================================

#[test]
fn test_segment_defaults_within_bounds() {
    for segments in [
        DEFAULT_SEGMENTS,
        VESSEL_SEGMENTS,
        FITTING_SEGMENTS,
        DETAIL_SEGMENTS,
        PREVIEW_SEGMENTS,
    ] {
        assert!(segments >= MIN_SEGMENTS);
        assert!(segments <= MAX_SEGMENTS);
    }
}

// =============================================================================
// PROPORTION TESTS
// =============================================================================

#[test]
fn test_pipe_wall_leaves_a_bore() {
    // wall = 0.15 d < r = 0.5 d
    assert!(PIPE_WALL_RATIO < 0.5);
}

#[test]
fn test_rim_flares_outward() {
    assert!(RIM_FLARE_SCALE > 1.0);
    assert!(RIM_DROP > TANK_WALL_THICKNESS);
    assert!(POT_WALL_THICKNESS < TANK_WALL_THICKNESS);
}

#[test]
fn test_balance_tank_sits_between_manifold_and_reservoir() {
    assert!(BALANCE_OFFSET_FACTOR < RESERVOIR_OFFSET_FACTOR);
    assert!(MANIFOLD_OFFSET_FACTOR > 0.0);
}

// =============================================================================
// EMISSION TESTS
// =============================================================================

#[test]
fn test_emission_color_valid_rgba() {
    for component in LED_EMISSION_COLOR.iter() {
        assert!(*component >= 0.0 && *component <= 1.0);
    }
    assert!(LED_EMISSION_STRENGTH > 0.0);
}
