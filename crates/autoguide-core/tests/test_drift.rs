mod common;

use approx::assert_abs_diff_eq;

use autoguide_core::config::AxisConfig;
use autoguide_core::control::{
    preview_pulses, Axis, AxisPhase, ControlParams, DriftController,
};
use autoguide_core::protocol::{CorrectionPulse, Direction};

use common::estimate;

fn params(interval_frames: u32) -> ControlParams {
    ControlParams {
        guiding: true,
        ra: AxisConfig::default(),
        dec: AxisConfig::default(),
        interval_frames,
        min_correction_ms: 100,
        ms_per_pixel: 100.0,
    }
}

#[test]
fn test_deadband_pixels() {
    let p = params(10);
    assert_abs_diff_eq!(p.deadband_pixels(), 1.0);
    let zero_scale = ControlParams {
        ms_per_pixel: 0.0,
        ..p
    };
    assert!(zero_scale.deadband_pixels().is_infinite());
}

#[test]
fn test_interval_due_after_count_exceeds_interval() {
    let mut ctl = DriftController::new();
    let p = params(3);
    for _ in 0..3 {
        let d = ctl.update(&estimate(5, 0), true, &p);
        assert!(!d.evaluated());
        assert_eq!(d.ra.phase, AxisPhase::Accumulating);
    }
    let d = ctl.update(&estimate(5, 0), true, &p);
    assert!(d.evaluated());
    assert_eq!(d.ra.phase, AxisPhase::Correcting);
    assert_eq!(d.ra.pulse, Some(CorrectionPulse::new(Direction::West, 500)));
    assert_eq!(d.dec.pulse, None);
    assert_eq!(ctl.axis(Axis::Ra).frame_count, 0);
    assert_eq!(ctl.axis(Axis::Ra).phase, AxisPhase::Accumulating);
}

#[test]
fn test_error_at_deadband_emits_nothing() {
    let mut ctl = DriftController::new();
    let p = params(1);
    ctl.update(&estimate(1, -1), true, &p);
    let d = ctl.update(&estimate(1, -1), true, &p);
    assert!(d.evaluated());
    assert_eq!(d.ra.mean_error, Some(1.0));
    assert!(!d.has_pulse());
}

#[test]
fn test_error_above_deadband_scales_duration() {
    let mut ctl = DriftController::new();
    let p = params(1);
    ctl.update(&estimate(2, -3), true, &p);
    let d = ctl.update(&estimate(3, -4), true, &p);
    // Means 2.5 and -3.5 pixels.
    assert_eq!(d.ra.pulse, Some(CorrectionPulse::new(Direction::West, 250)));
    assert_eq!(d.dec.pulse, Some(CorrectionPulse::new(Direction::North, 350)));
    assert_eq!(d.pulses().encode(), [*b":Mgw0250", *b":Mgn0350"]);
}

#[test]
fn test_half_pixel_drift_over_two_intervals() {
    let mut ctl = DriftController::new();
    let p = params(1);
    for _ in 0..2 {
        ctl.update(&estimate(0, 0), true, &p);
        let d = ctl.update(&estimate(1, 1), true, &p);
        assert!(d.evaluated());
        assert_eq!(d.ra.mean_error, Some(0.5));
        assert!(!d.has_pulse());
        for axis in [Axis::Ra, Axis::Dec] {
            assert_abs_diff_eq!(ctl.axis(axis).accumulated_error, 0.0);
            assert_eq!(ctl.axis(axis).frame_count, 0);
        }
    }
}

#[test]
fn test_large_drift_saturates() {
    let mut ctl = DriftController::new();
    let p = params(1);
    ctl.update(&estimate(-150, 0), true, &p);
    let d = ctl.update(&estimate(-150, 0), true, &p);
    assert_eq!(d.ra.pulse, Some(CorrectionPulse::new(Direction::East, 9999)));
}

#[test]
fn test_invalid_frames_do_not_accumulate() {
    let mut ctl = DriftController::new();
    let p = params(1);
    for _ in 0..5 {
        let d = ctl.update(&estimate(50, 50), false, &p);
        assert!(!d.evaluated());
    }
    assert_eq!(ctl.axis(Axis::Ra).frame_count, 0);
    assert_eq!(ctl.axis(Axis::Ra).phase, AxisPhase::Accumulating);
}

#[test]
fn test_disabled_dec_stays_idle() {
    let mut ctl = DriftController::new();
    let mut p = params(1);
    p.dec.enabled = false;
    let mut ra_pulses = 0;
    for i in 0..20 {
        let d = ctl.update(&estimate(4, 7 + i), true, &p);
        assert_eq!(d.dec.phase, AxisPhase::Idle);
        assert_eq!(d.dec.pulse, None);
        assert_eq!(ctl.axis(Axis::Dec).phase, AxisPhase::Idle);
        if d.ra.pulse.is_some() {
            ra_pulses += 1;
        }
    }
    assert_eq!(ra_pulses, 10);
}

#[test]
fn test_guiding_off_resets() {
    let mut ctl = DriftController::new();
    let mut p = params(10);
    ctl.update(&estimate(3, 3), true, &p);
    ctl.update(&estimate(3, 3), true, &p);
    assert_eq!(ctl.axis(Axis::Ra).frame_count, 2);

    p.guiding = false;
    let d = ctl.update(&estimate(3, 3), true, &p);
    assert!(!d.evaluated());
    assert_eq!(ctl.axis(Axis::Ra).phase, AxisPhase::Idle);
    assert_eq!(ctl.axis(Axis::Ra).frame_count, 0);
    assert_abs_diff_eq!(ctl.axis(Axis::Dec).accumulated_error, 0.0);
}

#[test]
fn test_preview_uses_single_frame() {
    let p = params(10);
    let pair = preview_pulses(&estimate(-3, 1), true, &p);
    assert_eq!(pair.ra, CorrectionPulse::new(Direction::East, 300));
    assert!(pair.dec.is_noop());

    let pair = preview_pulses(&estimate(-3, 5), false, &p);
    assert!(pair.is_noop());
}

#[test]
fn test_zero_length_correction_is_not_emitted() {
    let mut ctl = DriftController::new();
    let p = ControlParams {
        min_correction_ms: 0,
        ms_per_pixel: 0.4,
        ..params(1)
    };
    assert_abs_diff_eq!(p.deadband_pixels(), 0.0);

    ctl.update(&estimate(1, 0), true, &p);
    let d = ctl.update(&estimate(1, 0), true, &p);
    assert!(d.evaluated());
    assert_eq!(d.ra.mean_error, Some(1.0));
    // 1 px at 0.4 ms/px rounds to a 0 ms pulse.
    assert_eq!(d.ra.pulse, None);
    assert!(!d.has_pulse());
    assert!(preview_pulses(&estimate(1, 0), true, &p).is_noop());
}
