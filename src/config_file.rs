use channels::{ChannelSpec, JobSource, FIRST_JOB_CHANNEL, LAST_JOB_CHANNEL};
use errors::ConfigError;
use std::fs;
use std::path::Path;
use std::time::Duration;
use toml::value::{Table, Value};
use transport::TransportSettings;

pub const DEFAULT_CONFIG_FILE: &str = "xfd.toml";

#[derive(Deserialize)]
struct ChannelEntry {
    source: Option<String>,
    pattern: Option<String>,
}

/// Key/value view of `xfd.toml`.
#[derive(Clone, Debug, Default)]
pub struct Config {
    values: Table,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let unreadable = |reason: String| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        Config::parse(&text).map_err(|e| unreadable(e.to_string()))
    }

    pub fn parse(text: &str) -> Result<Config, ::toml::de::Error> {
        let values = ::toml::from_str::<Table>(text)?;
        Ok(Config { values })
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    pub fn get_required_str(&self, key: &str) -> Result<String, ConfigError> {
        match self.get_str(key).map(|s| s.trim()) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(ConfigError::Missing {
                key: key.to_string(),
            }),
        }
    }

    /// Integer property, or `default` when it is absent or cannot be read as an integer.
    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        let parsed = match self.values.get(key) {
            None => return default,
            Some(&Value::Integer(i)) => Some(i),
            Some(&Value::String(ref s)) => s.trim().parse::<i64>().ok(),
            Some(_) => None,
        };

        match parsed {
            Some(i) => i,
            None => {
                let e = ConfigError::Malformed {
                    key: key.to_string(),
                    value: self.values.get(key).map(|v| v.to_string()).unwrap_or_default(),
                };
                warn!("--Config--: {} Using default value {}.", e, default);
                default
            }
        }
    }

    pub fn get_millis_or(&self, key: &str, default: u64) -> Duration {
        let millis = self.get_int_or(key, default as i64);
        if millis <= 0 {
            warn!(
                "--Config--: Property '{}' must be positive, using default value {}.",
                key, default
            );
            return Duration::from_millis(default);
        }
        Duration::from_millis(millis as u64)
    }

    /// Channel definitions from the `[channels.N]` tables.
    ///
    /// A broken definition is reported and left out, or kept without a matcher
    /// when only its pattern is at fault, so the channel shows blank.
    pub fn channel_specs(&self) -> Vec<ChannelSpec> {
        let table = match self.values.get("channels") {
            Some(&Value::Table(ref table)) => table,
            Some(_) => {
                warn!("--Config--: 'channels' must be a table of channel definitions.");
                return Vec::new();
            }
            None => return Vec::new(),
        };

        let mut specs = Vec::new();
        for (key, value) in table {
            let channel = match key.parse::<usize>() {
                Ok(ch) if ch >= FIRST_JOB_CHANNEL && ch <= LAST_JOB_CHANNEL => ch,
                _ => {
                    warn!(
                        "--Config--: Ignoring channel '{}', channels are numbered {} to {}.",
                        key, FIRST_JOB_CHANNEL, LAST_JOB_CHANNEL
                    );
                    continue;
                }
            };

            let entry: ChannelEntry = match value.clone().try_into() {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("--Config--: Ignoring channel {}: {}", channel, e);
                    continue;
                }
            };
            let (source, pattern) = match (entry.source, entry.pattern) {
                (Some(source), Some(pattern)) => (source, pattern),
                (None, _) => {
                    warn!("--Config--: {}", ConfigError::Missing { key: format!("channels.{}.source", channel) });
                    continue;
                }
                (_, None) => {
                    warn!("--Config--: {}", ConfigError::Missing { key: format!("channels.{}.pattern", channel) });
                    continue;
                }
            };

            let source = JobSource::from_setting(&source);
            match ChannelSpec::new(channel, source, &pattern) {
                Ok(spec) => specs.push(spec),
                Err(e) => {
                    error!("--Config--: {}", e);
                    specs.push(ChannelSpec::without_matcher(channel, source, &pattern));
                }
            }
        }
        specs.sort_by_key(|spec| spec.channel);
        specs
    }
}

/// Everything the driver needs, read once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub ci_url: String,
    pub alt_url: String,
    pub aggregate_to: i64,
    pub poll_interval: Duration,
    pub transport: TransportSettings,
    pub channels: Vec<ChannelSpec>,
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Settings, ConfigError> {
        let defaults = TransportSettings::default();

        Ok(Settings {
            ci_url: config.get_required_str("url_ci")?,
            alt_url: config.get_required_str("url_alt")?,
            aggregate_to: config.get_int_or("aggregate_to", 8),
            poll_interval: config.get_millis_or("poll_interval_ms", 1000),
            transport: TransportSettings {
                port_prefix: config
                    .get_str("port_prefix")
                    .map(|s| s.to_string())
                    .unwrap_or(defaults.port_prefix),
                port_min: config.get_int_or("port_min", defaults.port_min),
                port_max: config.get_int_or("port_max", defaults.port_max),
                handshake_timeout: config.get_millis_or("handshake_timeout_ms", 1000),
            },
            channels: config.channel_specs(),
        })
    }
}
