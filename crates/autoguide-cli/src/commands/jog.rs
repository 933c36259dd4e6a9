use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use autoguide_core::consts::DEFAULT_JOG_MS;
use autoguide_core::link::{send_jog, SerialLink};
use autoguide_core::protocol::{Direction, JogCommand};

use super::PortArgs;

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    East,
    West,
    North,
    South,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::East => Self::East,
            DirectionArg::West => Self::West,
            DirectionArg::North => Self::North,
            DirectionArg::South => Self::South,
        }
    }
}

#[derive(Args)]
pub struct JogArgs {
    /// Direction to move
    #[arg(value_enum)]
    pub direction: DirectionArg,

    /// Pulse length in milliseconds (at most 9999)
    #[arg(long, default_value_t = DEFAULT_JOG_MS)]
    pub duration_ms: u32,

    #[command(flatten)]
    pub port: PortArgs,
}

pub fn run(args: &JogArgs) -> Result<()> {
    let mut link = SerialLink::open(&args.port.port, args.port.baud, args.port.timeout())
        .with_context(|| format!("Failed to open mount port {}", args.port.port))?;
    let jog = JogCommand::new(args.direction.into()).with_duration(args.duration_ms);
    send_jog(&mut link, &jog).context("Failed to send jog")?;
    println!("Sent {}", String::from_utf8_lossy(&jog.encode()));
    Ok(())
}
