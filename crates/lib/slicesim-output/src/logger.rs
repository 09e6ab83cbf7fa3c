use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;

use crate::error::OutputError;

#[derive(Deserialize, Debug, Clone)]
pub struct LogSettings {
    pub log_path: String,
    pub log_level: String,
    pub log_file_name: String,
    pub log_overwrite: bool,
}

pub fn setup_logging(log_level: &str, log_file_path: &Path) -> Result<Config, OutputError> {
    let log_file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y.%m.%d %H:%M:%S)} | {({l}):5.5} | {({f}:{L}):>40.40} | {m}{n}",
        )))
        .build(log_file_path)
        .map_err(|e| OutputError::io(log_file_path, e))?;

    Config::builder()
        .appender(Appender::builder().build("x", Box::new(log_file)))
        .build(Root::builder().appender("x").build(logging_level(log_level)))
        .map_err(|e| OutputError::Logger(e.to_string()))
}

fn logging_level(log_level: &str) -> LevelFilter {
    match log_level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Picks the log file of the run. An existing file is either removed or left alone, in which
/// case the new file name gets a timestamp suffix.
pub fn log_file_path(
    config_path: &Path,
    log_settings: &LogSettings,
    scenario_id: Option<u32>,
) -> Result<PathBuf, OutputError> {
    let mut log_path = config_path.join(&log_settings.log_path);
    log_path = match scenario_id {
        Some(val) => log_path.join(val.to_string()).join("logs"),
        None => log_path.join("logs"),
    };

    if !log_path.exists() {
        fs::create_dir_all(&log_path).map_err(|e| OutputError::io(&log_path, e))?;
    }

    let log_file_path = log_path.join(&log_settings.log_file_name);
    if !log_file_path.exists() {
        return Ok(log_file_path);
    }
    if log_settings.log_overwrite {
        fs::remove_file(&log_file_path).map_err(|e| OutputError::io(&log_file_path, e))?;
        return Ok(log_file_path);
    }

    let suffix = Utc::now().format("_%d%m%Y_%H%M%S").to_string();
    let stem = log_settings
        .log_file_name
        .split('.')
        .next()
        .unwrap_or("slicesim");
    Ok(log_path.join(format!("{}{}.log", stem, suffix)))
}

pub fn initiate_logger(
    config_path: &Path,
    log_settings: &LogSettings,
    scenario_id: Option<u32>,
) -> Result<PathBuf, OutputError> {
    let log_file_path = log_file_path(config_path, log_settings, scenario_id)?;
    let logger_config = setup_logging(&log_settings.log_level, &log_file_path)?;
    log4rs::init_config(logger_config).map_err(|e| OutputError::Logger(e.to_string()))?;
    Ok(log_file_path)
}
