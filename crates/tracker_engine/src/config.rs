use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use tracker_core::{MonitorState, DEFAULT_INTERNAL_SCHEMES};
use tracker_logging::{tracker_info, tracker_warn, LogDestination};

/// Host configuration. Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// JSON file backing the status store; in-memory when unset.
    pub store_path: Option<PathBuf>,
    /// Address prefixes that never get a badge.
    pub internal_schemes: Vec<String>,
    /// Log file; logs go to the terminal when unset.
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            internal_schemes: DEFAULT_INTERNAL_SCHEMES
                .iter()
                .map(|scheme| scheme.to_string())
                .collect(),
            log_file: None,
            verbose: false,
        }
    }
}

impl TrackerConfig {
    pub fn default_with_store(store_path: PathBuf) -> Self {
        Self {
            store_path: Some(store_path),
            ..Self::default()
        }
    }

    /// Reads a JSON config file, falling back to defaults when it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                tracker_warn!("Failed to read config from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => {
                tracker_info!("Loaded config from {:?}", path);
                config
            }
            Err(err) => {
                tracker_warn!("Failed to parse config from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::File(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn monitor_state(&self) -> MonitorState {
        MonitorState::new(self.internal_schemes.clone())
    }
}
