mod guider;
mod session;
mod types;

pub use guider::Guider;
pub use session::Session;
pub use types::{FrameReport, GuideReporter, NoOpReporter, SessionSummary, StopReason};
