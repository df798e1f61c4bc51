//! Advisor configuration.
//!
//! Provides the catalog location, the data directory for inventory and
//! queue files, and display settings. Configuration can be loaded from and
//! saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "nemesis.toml";

/// Application directory name under the platform config/data dirs.
pub const APP_DIR: &str = "nemesis";

/// Advisor configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Catalog file or directory (None = built-in catalog)
    pub catalog_path: Option<PathBuf>,
    /// Directory holding `inventory.json` and `queue.json`
    pub data_dir: PathBuf,
    /// Persist inventory and queue after every mutating command
    pub auto_save: bool,
    /// Print held counts next to recommended items
    pub show_counts: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            data_dir: default_data_dir(),
            auto_save: true,
            show_counts: false,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join(APP_DIR).join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, catalog_path: Option<PathBuf>, data_dir: Option<PathBuf>) {
        if let Some(path) = catalog_path {
            self.catalog_path = Some(path);
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
    }
}

/// Platform data directory for inventory files, falling back to the
/// current directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join(APP_DIR),
        None => PathBuf::from(".").join(APP_DIR),
    }
}
