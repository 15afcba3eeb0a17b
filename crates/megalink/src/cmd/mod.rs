use std::time::Duration;

use clap::{Args, Subcommand};
use megalink_link::{Link, LinkConfig};
use megalink_transport::{SerialConfig, Target};

use crate::exit::{link_error, transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod catalog;
pub mod monitor;
pub mod ports;
pub mod read;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read one sensor and print the reply.
    Read(ReadArgs),
    /// Send any catalog message by name.
    Send(SendArgs),
    /// Print every reply the board sends.
    Monitor(MonitorArgs),
    /// List the messages `send` understands.
    Catalog(CatalogArgs),
    /// List serial ports visible to this host.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, baud: u32) -> CliResult<i32> {
    match command {
        Command::Read(args) => read::run(args, format, baud),
        Command::Send(args) => send::run(args, format, baud),
        Command::Monitor(args) => monitor::run(args, format, baud),
        Command::Catalog(args) => catalog::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Serial device or `unix:<socket>`.
    pub target: String,
    /// Sensor name (e.g. ultrasonic, light, gyro).
    pub sensor: String,
    /// Board port the sensor is plugged into.
    #[arg(long, short = 'p')]
    pub port: u8,
    /// Extra selector byte (gyro/joystick axis, humiture reading type).
    #[arg(long)]
    pub param: Option<u8>,
    /// Maximum time to wait for the reply (e.g. 2s, 500ms).
    #[arg(long, default_value = "2s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device or `unix:<socket>`.
    pub target: String,
    /// Catalog message name (see `megalink catalog`).
    pub name: String,
    /// Board port.
    #[arg(long, short = 'p')]
    pub port: Option<u8>,
    /// Slot on the port or motor driver.
    #[arg(long, short = 's')]
    pub slot: Option<u8>,
    /// Numeric argument; repeat in the order the catalog lists them.
    #[arg(long = "value", short = 'v', allow_negative_numbers = true)]
    pub values: Vec<f64>,
    /// Text argument for matrix messages.
    #[arg(long)]
    pub text: Option<String>,
    /// Maximum time to wait for a reply when the message expects one.
    #[arg(long, default_value = "2s")]
    pub wait_timeout: String,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Serial device or `unix:<socket>`.
    pub target: String,
    /// Exit after printing N replies.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct CatalogArgs {
    /// Only list messages that expect a reply.
    #[arg(long)]
    pub reads: bool,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn open_link(target: &str, baud: u32) -> CliResult<Link> {
    let target: Target = target
        .parse()
        .map_err(|err| transport_error("invalid target", err))?;
    let config = LinkConfig {
        serial: SerialConfig {
            baud_rate: baud,
            ..SerialConfig::default()
        },
        ..LinkConfig::default()
    };
    megalink_link::open_with_config(&target, &config).map_err(|err| link_error("open failed", err))
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
