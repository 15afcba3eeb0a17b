use std::path::Path;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPortType, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::BoardStream;

/// Baud rate the MegaPi firmware listens on.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Serial port settings.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Line speed in bits per second. Default: 115200.
    pub baud_rate: u32,
    /// Per-read timeout. The reader loop wakes at least this often.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(100),
        }
    }
}

/// Open a serial device as 8N1 with no flow control.
pub fn open_serial(path: impl AsRef<Path>, config: &SerialConfig) -> Result<BoardStream> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    let port = serialport::new(name.as_ref(), config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.timeout)
        .open()
        .map_err(|source| TransportError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    info!(?path, baud = config.baud_rate, "opened serial port");
    Ok(BoardStream::from_serial(port))
}

/// A serial port visible to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Device path or name (e.g. `/dev/ttyUSB0`, `COM3`).
    pub name: String,
    /// Short description of the port hardware.
    pub kind: String,
}

/// Enumerate serial ports visible to the host.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()?;
    debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports
        .into_iter()
        .map(|port| PortInfo {
            name: port.port_name,
            kind: describe(&port.port_type),
        })
        .collect())
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let mut out = format!("usb {:04x}:{:04x}", usb.vid, usb.pid);
            if let Some(product) = &usb.product {
                out.push(' ');
                out.push_str(product);
            }
            out
        }
        SerialPortType::PciPort => "pci".to_string(),
        SerialPortType::BluetoothPort => "bluetooth".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}
