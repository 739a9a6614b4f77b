pub mod backend;
pub mod discovery;

use errors::{DiscoveryError, TransmitError};
use std::io::{self, Write};
use std::time::Duration;
use transport::backend::{OpenError, PortBackend};

/// Bounds each write to the board.
const WRITE_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Clone, Debug, PartialEq)]
pub struct TransportSettings {
    pub port_prefix: String,
    pub port_min: i64,
    pub port_max: i64,
    pub handshake_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> TransportSettings {
        TransportSettings {
            port_prefix: "COM".to_string(),
            port_min: 8,
            port_max: 20,
            handshake_timeout: Duration::from_millis(1000),
        }
    }
}

/// Owns the way to the board: which port it is on and how to write to it.
///
/// The port is opened for one write at a time and closed again right after.
pub struct SerialTransport<B: PortBackend> {
    backend: B,
    settings: TransportSettings,
    bound_port: Option<String>,
}

impl<B: PortBackend> SerialTransport<B> {
    pub fn new(backend: B, settings: TransportSettings) -> SerialTransport<B> {
        SerialTransport {
            backend,
            settings,
            bound_port: None,
        }
    }

    /// Run the challenge/response scan. A port found here is used for the rest
    /// of the process; without one every write guesses a port again.
    pub fn discover(&mut self) -> Option<&str> {
        if self.bound_port.is_none() {
            self.bound_port = discovery::scan(&self.backend, self.settings.handshake_timeout);
            match self.bound_port {
                Some(ref port) => info!("--Serial--: Using port {}", port),
                None => warn!(
                    "--Serial--: Serial port not found by challenge/response, will guess between {}{} and {}{} on every write.",
                    self.settings.port_prefix, self.settings.port_min,
                    self.settings.port_prefix, self.settings.port_max
                ),
            }
        }
        self.bound_port.as_ref().map(|p| p.as_str())
    }

    #[cfg(test)]
    pub fn bind(&mut self, port: &str) {
        self.bound_port = Some(port.to_string());
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The port the next message goes to.
    pub fn target_port(&self) -> Result<String, DiscoveryError> {
        match self.bound_port {
            Some(ref port) => Ok(port.clone()),
            None => discovery::guess_port(
                &self.backend,
                &self.settings.port_prefix,
                self.settings.port_min,
                self.settings.port_max,
            ),
        }
    }

    /// Send `message` to the board. Returns the port it went out on.
    pub fn transmit(&self, message: &[u8]) -> Result<String, TransmitError> {
        let port = self.target_port()?;
        self.write_to(&port, message)?;
        Ok(port)
    }

    pub fn write_to(&self, port: &str, message: &[u8]) -> Result<(), TransmitError> {
        let mut line = self.backend.open(port, WRITE_TIMEOUT).map_err(|e| match e {
            OpenError::Busy => TransmitError::PortBusy {
                port: port.to_string(),
            },
            OpenError::Missing => TransmitError::Io {
                port: port.to_string(),
                message: "no such device".to_string(),
            },
            OpenError::Io(message) => TransmitError::Io {
                port: port.to_string(),
                message,
            },
        })?;

        let to_io_error = |e: io::Error| TransmitError::Io {
            port: port.to_string(),
            message: e.to_string(),
        };
        line.write_all(message).map_err(&to_io_error)?;
        line.flush().map_err(&to_io_error)?;
        Ok(())
    }
}
