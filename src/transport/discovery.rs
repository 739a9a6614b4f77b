use errors::DiscoveryError;
use protocol::{is_board_response, CHALLENGE, RESPONSE_MIN_LEN};
use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};
use transport::backend::{OpenError, PortBackend, SerialLine};

// Upper bound for one blocking read while waiting for the board to answer.
const READ_SLICE: Duration = Duration::from_millis(50);

/// Find the board by sending the challenge to every serial port on the host.
///
/// The first port that answers correctly wins. Ports held by another process
/// are skipped without being touched.
pub fn scan<B: PortBackend>(backend: &B, window: Duration) -> Option<String> {
    let ports = match backend.list_ports() {
        Ok(ports) => ports,
        Err(e) => {
            warn!("--Serial--: Unable to enumerate serial ports: {}", e);
            return None;
        }
    };

    for port in ports.iter().filter(|p| p.is_serial) {
        if challenge_response(backend, &port.name, window) {
            return Some(port.name.clone());
        }
    }
    None
}

/// Send `?` to `port_name` and expect a reply starting with `!xfd` within `window`.
pub fn challenge_response<B: PortBackend>(backend: &B, port_name: &str, window: Duration) -> bool {
    let mut line = match backend.open(port_name, READ_SLICE.min(window)) {
        Ok(line) => line,
        Err(OpenError::Busy) => {
            debug!("--Serial--: Skipping {}, port is in use by other software.", port_name);
            return false;
        }
        Err(OpenError::Missing) => {
            debug!("--Serial--: Skipping {}, port has gone away.", port_name);
            return false;
        }
        Err(OpenError::Io(message)) => {
            warn!("--Serial--: Unable to open {} for discovery: {}", port_name, message);
            return false;
        }
    };

    match exchange(&mut *line, window) {
        Ok(response) => {
            let accepted = is_board_response(&response);
            info!(
                "--Serial--: {} answered {:?}, {}.",
                port_name,
                String::from_utf8_lossy(&response),
                if accepted { "accepted" } else { "rejected" }
            );
            accepted
        }
        Err(e) => {
            debug!("--Serial--: No usable answer from {}: {}", port_name, e);
            false
        }
    }
}

// Returns whatever arrived once enough bytes are buffered, or a timeout error.
fn exchange(line: &mut dyn SerialLine, window: Duration) -> io::Result<Vec<u8>> {
    line.write_all(CHALLENGE)?;
    line.flush()?;

    let started = Instant::now();
    let mut response = Vec::with_capacity(128);
    let mut buf = [0u8; 128];

    while started.elapsed() < window {
        match line.read(&mut buf) {
            Ok(0) => thread::sleep(Duration::from_millis(10)),
            Ok(n) => {
                response.extend_from_slice(&buf[..n]);
                if response.len() >= RESPONSE_MIN_LEN {
                    return Ok(response);
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut || e.kind() == io::ErrorKind::WouldBlock => {}
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("{} of {} bytes within {:?}", response.len(), RESPONSE_MIN_LEN, window),
    ))
}

/// Pick the first free serial port named `<prefix><n>` for n in `min..=max`.
///
/// Only ports the host lists are considered, tried in ascending `n`.
pub fn guess_port<B: PortBackend>(
    backend: &B,
    prefix: &str,
    min: i64,
    max: i64,
) -> Result<String, DiscoveryError> {
    let ports = backend.list_ports().unwrap_or_else(|e| {
        warn!("--Serial--: Unable to enumerate serial ports: {}", e);
        Vec::new()
    });

    let mut candidates: Vec<(i64, String)> = ports
        .into_iter()
        .filter(|p| p.is_serial)
        .filter_map(|p| port_number(&p.name, prefix).map(|n| (n, p.name)))
        .filter(|&(n, _)| n >= min && n <= max)
        .collect();
    candidates.sort();

    for (_, name) in candidates {
        // Probe once to make sure nobody else holds it; the line closes right away.
        match backend.open(&name, READ_SLICE) {
            Ok(_) => {
                info!("--Serial--: Guessing port {}", name);
                return Ok(name);
            }
            Err(OpenError::Busy) => debug!("--Serial--: {} is in use, trying the next one.", name),
            Err(OpenError::Missing) => {}
            Err(OpenError::Io(message)) => warn!("--Serial--: Unable to probe {}: {}", name, message),
        }
    }

    error!(
        "--Serial--: No suitable port found between {}{} and {}{}",
        prefix, min, prefix, max
    );
    Err(DiscoveryError::NoPortInRange {
        prefix: prefix.to_string(),
        min,
        max,
    })
}

// `n` for a port named exactly `<prefix><n>`, so "COM08" or "COM+8" do not count as COM8.
fn port_number(name: &str, prefix: &str) -> Option<i64> {
    if !name.starts_with(prefix) {
        return None;
    }
    let number = name[prefix.len()..].parse::<i64>().ok()?;
    if format!("{}{}", prefix, number) == name {
        Some(number)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport::testing::{FakeBackend, FakePort};

    const WINDOW: Duration = Duration::from_millis(120);

    #[test]
    fn board_reply_is_accepted() {
        let backend = FakeBackend::new(vec![FakePort::board("COM3")]);

        assert!(challenge_response(&backend, "COM3", WINDOW));
        assert_eq!(backend.written("COM3"), b"?".to_vec());
    }

    #[test]
    fn reply_split_over_reads_is_accumulated() {
        let backend = FakeBackend::new(vec![FakePort::board("COM3").in_chunks(3)]);
        assert!(challenge_response(&backend, "COM3", WINDOW));
    }

    #[test]
    fn six_byte_reply_is_below_minimum() {
        let backend = FakeBackend::new(vec![FakePort::replying("COM3", b"!xfdOK")]);
        assert!(!challenge_response(&backend, "COM3", WINDOW));
    }

    #[test]
    fn foreign_reply_is_rejected() {
        let backend = FakeBackend::new(vec![FakePort::replying("COM3", b"ATZ OK\r\n")]);
        assert!(!challenge_response(&backend, "COM3", WINDOW));
    }

    #[test]
    fn late_reply_is_rejected() {
        let backend = FakeBackend::new(vec![
            FakePort::board("COM3").replying_after(WINDOW * 2),
        ]);
        assert!(!challenge_response(&backend, "COM3", WINDOW));
    }

    #[test]
    fn busy_port_is_never_written() {
        let backend = FakeBackend::new(vec![FakePort::board("COM3").busy()]);

        assert!(!challenge_response(&backend, "COM3", WINDOW));
        assert!(backend.written("COM3").is_empty());
    }

    #[test]
    fn scan_stops_at_first_board() {
        let backend = FakeBackend::new(vec![
            FakePort::silent("COM1"),
            FakePort::board("COM4"),
            FakePort::board("COM5"),
        ]);

        assert_eq!(scan(&backend, WINDOW), Some("COM4".to_string()));
        assert!(backend.written("COM5").is_empty());
    }

    #[test]
    fn scan_skips_non_serial_ports() {
        let backend = FakeBackend::new(vec![
            FakePort::board("rfcomm0").not_serial(),
            FakePort::board("COM9"),
        ]);

        assert_eq!(scan(&backend, WINDOW), Some("COM9".to_string()));
        assert!(backend.written("rfcomm0").is_empty());
    }

    #[test]
    fn scan_without_board_finds_nothing() {
        let backend = FakeBackend::new(vec![FakePort::silent("COM1"), FakePort::board("COM2").busy()]);
        assert_eq!(scan(&backend, WINDOW), None);
    }

    #[test]
    fn guess_takes_first_free_port_in_range() {
        let backend = FakeBackend::new(vec![
            FakePort::silent("COM7"),
            FakePort::silent("COM9").busy(),
            FakePort::silent("COM12"),
            FakePort::silent("COM10"),
        ]);

        assert_eq!(guess_port(&backend, "COM", 8, 20), Ok("COM10".to_string()));
    }

    #[test]
    fn guess_range_is_inclusive() {
        let backend = FakeBackend::new(vec![FakePort::silent("COM20")]);
        assert_eq!(guess_port(&backend, "COM", 8, 20), Ok("COM20".to_string()));
    }

    #[test]
    fn guess_orders_by_number_not_listing() {
        let backend = FakeBackend::new(vec![
            FakePort::silent("COM15"),
            FakePort::silent("COM9"),
        ]);
        assert_eq!(guess_port(&backend, "COM", 8, 20), Ok("COM9".to_string()));
    }

    #[test]
    fn guess_accepts_widest_configured_range() {
        let backend = FakeBackend::new(vec![FakePort::silent("COM9")]);

        assert_eq!(guess_port(&backend, "COM", 8, i64::max_value()), Ok("COM9".to_string()));
        assert_eq!(
            guess_port(&backend, "COM", i64::min_value(), i64::max_value()),
            Ok("COM9".to_string())
        );
    }

    #[test]
    fn guess_needs_exact_port_name() {
        let backend = FakeBackend::new(vec![
            FakePort::silent("COM08"),
            FakePort::silent("COM+9"),
            FakePort::silent("/dev/COM10"),
        ]);
        assert!(guess_port(&backend, "COM", 8, 20).is_err());
    }

    #[test]
    fn guess_exhausting_range_fails_without_writing() {
        let backend = FakeBackend::new(vec![
            FakePort::silent("COM3"),
            FakePort::silent("COM8").busy(),
            FakePort::silent("COM21"),
        ]);

        assert_eq!(
            guess_port(&backend, "COM", 8, 20),
            Err(DiscoveryError::NoPortInRange {
                prefix: "COM".to_string(),
                min: 8,
                max: 20,
            })
        );
        assert!(backend.all_writes().is_empty());
    }
}
