//! Global eventdesk configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EventDeskError, EventDeskResult};
use crate::store::DEFAULT_STORAGE_KEY;

static DEFAULT_DATA_PATH: &str = "~/.local/share/eventdesk";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Global configuration at ~/.config/eventdesk/config.toml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DeskConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

impl DeskConfig {
    pub fn config_path() -> EventDeskResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventDeskError::Config("Could not determine config directory".into()))?
            .join("eventdesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventDeskResult<()> {
        let contents = format!(
            "\
# eventdesk configuration

# Where your events are stored:
# data_dir = \"{}\"

# Name of the storage entry holding the event list:
# storage_key = \"{}\"
",
            DEFAULT_DATA_PATH, DEFAULT_STORAGE_KEY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventDeskError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventDeskError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
