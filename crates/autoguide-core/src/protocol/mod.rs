//! Mount serial protocol.
//!
//! Outbound guide pulses are fixed 8-byte ASCII commands:
//!
//! ```text
//! :Mg<dir><dddd>      dir in {e, w} for RA, {n, s} for DEC
//!                     dddd = duration in ms, zero-padded, <= 9999
//! ```
//!
//! A correction event always sends an RA command followed by a DEC command;
//! an axis without a correction is filled with a zero-duration command.
//! Manual jog commands carry a leading `#`. Inbound lines are status
//! telemetry for display only.

pub mod decode;
pub mod jog;
pub mod pulse;
pub mod telemetry;

pub use decode::decode_commands;
pub use jog::JogCommand;
pub use pulse::{CorrectionPulse, Direction, PulsePair};
pub use telemetry::{parse_telemetry_line, ReportTag, TelemetryRecord};
