#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[macro_use]
extern crate failure;

extern crate ctrlc;
extern crate log4rs;
extern crate regex;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate serialport;
extern crate toml;

mod aggregate;
mod channels;
mod config_file;
mod driver;
mod errors;
mod integrations;
mod logging;
mod network;
mod protocol;
mod status;
mod transport;

use config_file::{Config, Settings, DEFAULT_CONFIG_FILE};
use driver::Driver;
use integrations::JenkinsIntegration;
use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use transport::backend::SystemPorts;

const EXIT_CONFIG: i32 = 1;
const EXIT_NO_PORT: i32 = 2;

// Request timeouts are set per call, see `network::HTTP_TIMEOUT`.
lazy_static! {
    static ref HTTP_CLIENT: reqwest::blocking::Client = reqwest::blocking::Client::new();
}

// Config files are copied next to the executable by build.rs.
fn exe_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() {
    let dir = exe_dir();
    if let Err(e) = logging::init(&dir.join(logging::DEFAULT_LOG_CONFIG_FILE)) {
        eprintln!("Unable to initialize logging: {}", e);
        process::exit(EXIT_CONFIG);
    }

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| dir.join(DEFAULT_CONFIG_FILE));
    let settings = match Config::load(&config_path).and_then(|c| Settings::from_config(&c)) {
        Ok(settings) => settings,
        Err(e) => {
            error!("--Config--: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };
    info!(
        "--Config--: Loaded {} with {} channel definitions.",
        config_path.display(),
        settings.channels.len()
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("--Driver--: Unable to install termination handler: {}", e);
    }

    let ci = JenkinsIntegration::new("ci", &settings.ci_url);
    let alt = JenkinsIntegration::new("alt", &settings.alt_url);
    info!("--Driver--: Polling {} and {}", ci.url(), alt.url());

    let mut driver = Driver::new(settings, Box::new(ci), Box::new(alt), SystemPorts);
    driver.start();

    if let Err(e) = driver.run(&running) {
        error!("--Serial--: {}", e);
        process::exit(EXIT_NO_PORT);
    }
}
