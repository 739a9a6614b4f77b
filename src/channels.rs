use aggregate::aggregate;
use errors::ConfigError;
use regex::Regex;
use status::Status;
use std::collections::HashMap;
use std::ops::Index;

pub const CHANNEL_COUNT: usize = 8;
pub const FIRST_JOB_CHANNEL: usize = 1;
pub const LAST_JOB_CHANNEL: usize = CHANNEL_COUNT - 1;

/// Job name to status, as produced by one CI server for one poll cycle.
pub type JobMap = HashMap<String, Status>;

/// Which CI server a channel takes its jobs from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobSource {
    Ci,
    Alt,
}

impl JobSource {
    /// Anything starting with "ci" selects the CI server, everything else the alternate one.
    pub fn from_setting(value: &str) -> JobSource {
        if value.trim().to_lowercase().starts_with("ci") {
            JobSource::Ci
        } else {
            JobSource::Alt
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChannelSpec {
    pub channel: usize,
    pub source: JobSource,
    pub pattern: String,
    matcher: Option<Regex>,
}

impl ChannelSpec {
    pub fn new(channel: usize, source: JobSource, pattern: &str) -> Result<ChannelSpec, ConfigError> {
        // Anchor so that only a full match of the job name counts.
        let anchored = format!("^(?:{})$", pattern);
        match Regex::new(&anchored) {
            Ok(matcher) => Ok(ChannelSpec {
                channel,
                source,
                pattern: pattern.to_string(),
                matcher: Some(matcher),
            }),
            Err(e) => Err(ConfigError::InvalidPattern {
                channel,
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// A spec whose pattern could not be compiled. Resolves to blank every cycle.
    pub fn without_matcher(channel: usize, source: JobSource, pattern: &str) -> ChannelSpec {
        ChannelSpec {
            channel,
            source,
            pattern: pattern.to_string(),
            matcher: None,
        }
    }

    pub fn matches(&self, job_name: &str) -> Result<bool, ConfigError> {
        match self.matcher {
            Some(ref matcher) => Ok(matcher.is_match(job_name)),
            None => Err(ConfigError::InvalidPattern {
                channel: self.channel,
                pattern: self.pattern.clone(),
                reason: "pattern was rejected at load time".to_string(),
            }),
        }
    }
}

/// One status per board channel. Index 0 is the overview channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ChannelState {
    channels: [Status; CHANNEL_COUNT],
}

impl ChannelState {
    pub fn new(channels: [Status; CHANNEL_COUNT]) -> ChannelState {
        ChannelState { channels }
    }

    pub fn iter(&self) -> ::std::slice::Iter<Status> {
        self.channels.iter()
    }
}

impl Index<usize> for ChannelState {
    type Output = Status;

    fn index(&self, channel: usize) -> &Status {
        &self.channels[channel]
    }
}

/// Clamp the configured overview range to the job channels that exist.
pub fn clamp_aggregation_bound(bound: i64) -> usize {
    if bound < FIRST_JOB_CHANNEL as i64 {
        FIRST_JOB_CHANNEL
    } else if bound > LAST_JOB_CHANNEL as i64 {
        LAST_JOB_CHANNEL
    } else {
        bound as usize
    }
}

/// Compute the status of every channel for one poll cycle.
///
/// Channels 1..7 aggregate the jobs of their source whose names fully match
/// the channel's pattern. Channel 0 aggregates channels 1..=`aggregation_bound`.
pub fn resolve(
    specs: &[ChannelSpec],
    ci_jobs: &JobMap,
    alt_jobs: &JobMap,
    aggregation_bound: i64,
) -> ChannelState {
    let mut channels = [Status::BLANK; CHANNEL_COUNT];

    for channel in FIRST_JOB_CHANNEL..CHANNEL_COUNT {
        if let Some(spec) = specs.iter().find(|spec| spec.channel == channel) {
            channels[channel] = resolve_channel(spec, ci_jobs, alt_jobs);
        }
    }

    let bound = clamp_aggregation_bound(aggregation_bound);
    channels[0] = aggregate(&channels[FIRST_JOB_CHANNEL..bound + 1]);

    ChannelState::new(channels)
}

fn resolve_channel(spec: &ChannelSpec, ci_jobs: &JobMap, alt_jobs: &JobMap) -> Status {
    let jobs = match spec.source {
        JobSource::Ci => ci_jobs,
        JobSource::Alt => alt_jobs,
    };

    let mut matching = Vec::new();
    for (name, status) in jobs {
        match spec.matches(name) {
            Ok(true) => matching.push(*status),
            Ok(false) => {}
            Err(e) => {
                debug!("--Channels--: Channel {} stays blank: {}", spec.channel, e);
                return Status::BLANK;
            }
        }
    }

    let status = aggregate(&matching);
    debug!(
        "--Channels--: Channel {} matched {} job(s), {}",
        spec.channel,
        matching.len(),
        status
    );
    status
}
