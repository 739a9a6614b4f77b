use failure::Error;
use log::LevelFilter;
use log4rs;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

pub const DEFAULT_LOG_CONFIG_FILE: &str = "log4rs.yml";

const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {m}{n}";

/// Use the log4rs file at `path` when there is one, plain console output otherwise.
pub fn init(path: &Path) -> Result<(), Error> {
    if path.exists() {
        log4rs::init_file(path, Default::default())
            .map_err(|e| format_err!("Unable to load log configuration {}: {}", path.display(), e))?;
        info!("--Logging--: Loaded log configuration from {}", path.display());
        return Ok(());
    }

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|e| format_err!("Invalid console log configuration: {}", e))?;
    log4rs::init_config(config).map_err(|e| format_err!("Unable to install logger: {}", e))?;

    info!(
        "--Logging--: No {} found, logging to console.",
        path.display()
    );
    Ok(())
}
