pub mod axis;
pub mod drift;

pub use axis::{Axis, AxisPhase, AxisState};
pub use drift::{preview_pulses, AxisOutcome, ControlParams, CorrectionDecision, DriftController};
