#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(display = "Could not read configuration file {}: {}", path, reason)]
    Unreadable { path: String, reason: String },

    #[fail(display = "Required property '{}' is missing or empty.", key)]
    Missing { key: String },

    #[fail(display = "Could not parse value '{}' for property '{}'.", value, key)]
    Malformed { key: String, value: String },

    #[fail(
        display = "Pattern '{}' for channel {} is not a valid regular expression: {}",
        pattern, channel, reason
    )]
    InvalidPattern {
        channel: usize,
        pattern: String,
        reason: String,
    },
}

#[derive(Debug, Fail, PartialEq)]
pub enum DiscoveryError {
    #[fail(display = "No suitable port found between {}{} and {}{}.", prefix, min, prefix, max)]
    NoPortInRange { prefix: String, min: i64, max: i64 },
}

#[derive(Debug, Fail)]
pub enum TransmitError {
    #[fail(display = "Port {} is currently in use.", port)]
    PortBusy { port: String },

    #[fail(display = "I/O failure on port {}: {}", port, message)]
    Io { port: String, message: String },

    #[fail(display = "{}", _0)]
    Discovery(#[cause] DiscoveryError),
}

impl From<DiscoveryError> for TransmitError {
    fn from(e: DiscoveryError) -> TransmitError {
        TransmitError::Discovery(e)
    }
}

#[derive(Debug, Fail)]
pub enum FetchError {
    #[fail(display = "HTTP call to {} failed: {}", url, message)]
    Http { url: String, message: String },

    #[fail(display = "Unable to read job list from {}: {}", url, message)]
    Parse { url: String, message: String },
}
