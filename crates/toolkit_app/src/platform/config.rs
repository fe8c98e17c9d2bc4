//! Front-end configuration, read from a RON file.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use toolkit_client::{ClientSettings, TrackerSettings};
use toolkit_core::Timings;
use toolkit_logging::LogDestination;

const CONFIG_FILENAME: &str = "toolkit.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    File,
    #[default]
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub progress_hide_delay_ms: u64,
    pub button_restore_delay_ms: u64,
    pub alert_dismiss_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub log_target: LogTarget,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: ClientSettings::default().base_url,
            poll_interval_ms: 1000,
            progress_hide_delay_ms: 2000,
            button_restore_delay_ms: 1000,
            alert_dismiss_ms: 5000,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            log_target: LogTarget::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            hide_delay: Duration::from_millis(self.progress_hide_delay_ms),
        }
    }

    pub fn timings(&self) -> Timings {
        Timings {
            button_restore: Duration::from_millis(self.button_restore_delay_ms),
            alert_dismiss: Duration::from_millis(self.alert_dismiss_ms),
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .with_context(|| format!("invalid log_level `{}`", self.log_level))
    }
}

/// Loads the configuration.
///
/// An explicit path must exist. Without one, `./toolkit.ron` is used when
/// present and defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => parse_file(path),
        None => {
            let path = Path::new(CONFIG_FILENAME);
            if path.exists() {
                parse_file(path)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

fn parse_file(path: &Path) -> Result<AppConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
