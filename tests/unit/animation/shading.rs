use super::*;

#[test]
fn progress_never_reaches_one() {
    assert_eq!(clamp_progress(1.0), MAX_PROGRESS);
    assert_eq!(clamp_progress(-0.5), 0.0);
    assert_eq!(clamp_progress(f64::NAN), 0.0);
    assert_eq!(frame_progress(9, 10), MAX_PROGRESS);
    assert!(fold_angle(1.0, QUARTER_TURN) < QUARTER_TURN);
}

#[test]
fn single_frame_sits_at_zero() {
    assert_eq!(frame_progress(0, 1), 0.0);
    assert_eq!(frame_progress(0, 0), 0.0);
    assert_eq!(frame_progress_inclusive(0, 1), 0.0);
}

#[test]
fn progress_is_linear_in_frame_index() {
    assert_eq!(frame_progress(0, 5), 0.0);
    assert_eq!(frame_progress(2, 5), 0.5);
    assert_eq!(frame_progress_inclusive(4, 5), 1.0);
}

#[test]
fn lighting_darkens_as_flap_turns_edge_on() {
    assert!((lighting_factor(0.0, 0.6) - 1.0).abs() < 1e-12);
    let mid = lighting_factor(QUARTER_TURN * 0.5, 0.6);
    let late = lighting_factor(QUARTER_TURN * 0.9, 0.6);
    assert!(mid < 1.0);
    assert!(late < mid);
    assert!((lighting_factor(QUARTER_TURN, 0.6) - 0.4).abs() < 1e-9);
    assert_eq!(lighting_factor(1.0, 0.0), 1.0);
}

#[test]
fn lighting_is_symmetric_past_a_quarter_turn() {
    let a = lighting_factor(HALF_TURN * 0.25, 0.5);
    let b = lighting_factor(HALF_TURN * 0.75, 0.5);
    assert!((a - b).abs() < 1e-9);
}

#[test]
fn seam_height_respects_floor() {
    assert_eq!(seam_height(1.0, 0.75), 0.75);
    assert_eq!(seam_height(0.0, 0.75), 1.0);
    assert!((seam_height(0.1, 0.75) - 0.9).abs() < 1e-12);
    assert_eq!(seam_height(0.5, 0.75), 0.75);
}
