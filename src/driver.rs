use channels::{resolve, ChannelSpec, ChannelState, JobMap};
use config_file::Settings;
use errors::{DiscoveryError, TransmitError};
use integrations::RemoteIntegration;
use protocol::{encode, Masks};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use transport::backend::PortBackend;
use transport::SerialTransport;

/// Polls both CI servers and keeps the board in sync with them.
pub struct Driver<B: PortBackend> {
    ci: Box<dyn RemoteIntegration>,
    alt: Box<dyn RemoteIntegration>,
    channels: Vec<ChannelSpec>,
    aggregate_to: i64,
    poll_interval: Duration,
    transport: SerialTransport<B>,
}

impl<B: PortBackend> Driver<B> {
    pub fn new(
        settings: Settings,
        ci: Box<dyn RemoteIntegration>,
        alt: Box<dyn RemoteIntegration>,
        backend: B,
    ) -> Driver<B> {
        Driver {
            ci,
            alt,
            channels: settings.channels,
            aggregate_to: settings.aggregate_to,
            poll_interval: settings.poll_interval,
            transport: SerialTransport::new(backend, settings.transport),
        }
    }

    /// Look for the board once before polling starts. Not finding it is not
    /// fatal yet, writes fall back to guessing a port.
    pub fn start(&mut self) -> Option<String> {
        self.transport.discover().map(|p| p.to_string())
    }

    /// One fetch, resolve, encode, transmit round.
    pub fn run_cycle(&mut self) -> Result<ChannelState, TransmitError> {
        let ci_jobs = fetch(&*self.ci);
        let alt_jobs = fetch(&*self.alt);

        let state = resolve(&self.channels, &ci_jobs, &alt_jobs, self.aggregate_to);
        let message = encode(&state);
        debug!("--Driver--: {}", Masks::from_channels(&state).describe());

        let port = self.transport.transmit(&message)?;
        debug!(
            "--Driver--: Sent {} to {}",
            String::from_utf8_lossy(&message),
            port
        );
        Ok(state)
    }

    /// Poll until `running` is cleared. Only running out of serial ports ends
    /// the loop early; every other failure skips the cycle.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), DiscoveryError> {
        while running.load(Ordering::SeqCst) {
            match self.run_cycle() {
                Ok(_) => {}
                Err(TransmitError::Discovery(e)) => return Err(e),
                Err(e @ TransmitError::PortBusy { .. }) => warn!("--Driver--: Skipping update: {}", e),
                Err(e) => error!("--Driver--: Update failed: {}", e),
            }

            if running.load(Ordering::SeqCst) {
                thread::sleep(self.poll_interval);
            }
        }
        info!("--Driver--: Stopped polling.");
        Ok(())
    }
}

// A failed fetch counts as a server without jobs for this cycle.
fn fetch(source: &dyn RemoteIntegration) -> JobMap {
    match source.get_jobs() {
        Ok(jobs) => jobs,
        Err(e) => {
            warn!("--Driver--: No jobs from {} this cycle: {}", source.name(), e);
            JobMap::new()
        }
    }
}
