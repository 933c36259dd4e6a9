use approx::assert_abs_diff_eq;

use autoguide_core::error::GuideError;
use autoguide_core::io::{SimulatedSky, SkyModel};
use autoguide_core::link::{send_jog, send_pulses, MountLink, SimulatedMount};
use autoguide_core::protocol::{CorrectionPulse, Direction, JogCommand, PulsePair};

fn mount() -> (SimulatedMount, SimulatedSky) {
    let sky = SimulatedSky::new(SkyModel::default());
    (SimulatedMount::new(sky.clone()), sky)
}

#[test]
fn test_correction_event_writes_ra_then_dec() {
    let (mut mount, sky) = mount();
    let pair = PulsePair::new(Some(CorrectionPulse::new(Direction::West, 300)), None);

    send_pulses(&mut mount, &pair).unwrap();

    assert_eq!(mount.sent_bytes(), b":Mgw0300:Mgn0000");
    assert_eq!(
        mount.received(),
        &[
            CorrectionPulse::new(Direction::West, 300),
            CorrectionPulse::new(Direction::North, 0),
        ]
    );
    // Only the non-zero command moves the star.
    let (x, y) = sky.position();
    assert_abs_diff_eq!(x, 323.0, epsilon = 1e-9);
    assert_abs_diff_eq!(y, 240.0, epsilon = 1e-9);
}

#[test]
fn test_both_axes_in_one_event() {
    let (mut mount, _) = mount();
    let pair = PulsePair::new(
        Some(CorrectionPulse::new(Direction::East, 120)),
        Some(CorrectionPulse::new(Direction::South, 45)),
    );
    send_pulses(&mut mount, &pair).unwrap();
    assert_eq!(mount.sent_bytes(), b":Mge0120:Mgs0045");
    assert_eq!(mount.sent_bytes().len(), 16);
}

#[test]
fn test_jog_writes_prefixed_command() {
    let (mut mount, sky) = mount();
    send_jog(&mut mount, &JogCommand::new(Direction::North)).unwrap();
    assert_eq!(mount.sent_bytes(), b"#:Mgn0250");
    assert_eq!(mount.received(), &[CorrectionPulse::new(Direction::North, 250)]);
    assert_abs_diff_eq!(sky.position().1, 237.5, epsilon = 1e-9);
}

#[test]
fn test_timed_out_writes_send_nothing() {
    let (mut mount, sky) = mount();
    mount.set_timeout_writes(true);
    let pair = PulsePair::new(Some(CorrectionPulse::new(Direction::West, 300)), None);

    assert!(matches!(
        send_pulses(&mut mount, &pair),
        Err(GuideError::LinkTimeout(_))
    ));
    assert!(mount.sent_bytes().is_empty());
    assert!(mount.received().is_empty());
    assert_eq!(sky.position(), (320.0, 240.0));
    assert_eq!(mount.name(), "simulated");
}
