use serialport::{self, DataBits, ErrorKind, FlowControl, Parity, SerialPortType, StopBits};
use std::io::{self, Read, Write};
use std::time::Duration;

pub const BAUD_RATE: u32 = 9600;

/// An open serial line. Dropping it closes the port.
pub trait SerialLine: Read + Write {}

impl<T: Read + Write> SerialLine for T {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub is_serial: bool,
}

#[derive(Debug)]
pub enum OpenError {
    /// No such device on this host.
    Missing,
    /// Exclusively held by another process.
    Busy,
    Io(String),
}

/// Where ports come from. The system implementation talks to real hardware,
/// tests substitute scripted lines.
pub trait PortBackend {
    fn list_ports(&self) -> io::Result<Vec<PortInfo>>;

    /// Open `name` at 9600 baud, 8 data bits, no parity, 1 stop bit.
    /// `timeout` bounds each individual read or write.
    fn open(&self, name: &str, timeout: Duration) -> Result<Box<dyn SerialLine>, OpenError>;
}

pub struct SystemPorts;

impl PortBackend for SystemPorts {
    fn list_ports(&self) -> io::Result<Vec<PortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.description))?;

        Ok(ports
            .into_iter()
            .map(|p| PortInfo {
                is_serial: is_board_candidate(&p.port_type),
                name: p.port_name,
            })
            .collect())
    }

    fn open(&self, name: &str, timeout: Duration) -> Result<Box<dyn SerialLine>, OpenError> {
        let port = serialport::new(name, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()
            .map_err(classify_open_error)?;

        Ok(Box::new(port))
    }
}

// Opening an RFCOMM port starts a Bluetooth connect that can block far longer
// than the handshake window, and a board is never attached that way.
fn is_board_candidate(port_type: &SerialPortType) -> bool {
    match *port_type {
        SerialPortType::BluetoothPort => false,
        _ => true,
    }
}

fn classify_open_error(e: serialport::Error) -> OpenError {
    match e.kind {
        ErrorKind::NoDevice | ErrorKind::Io(io::ErrorKind::NotFound) => OpenError::Missing,
        ErrorKind::Io(io::ErrorKind::PermissionDenied) => OpenError::Busy,
        _ if e.description.to_lowercase().contains("busy") => OpenError::Busy,
        _ => OpenError::Io(e.description),
    }
}
