//! Entry point tying the configuration to the on-disk event store.

use std::path::{Path, PathBuf};

use config::{Config, File};

use crate::desk_config::DeskConfig;
use crate::error::{EventDeskError, EventDeskResult};
use crate::storage::FileStorage;
use crate::store::{EventStore, LoadStatus};

#[derive(Clone, Debug)]
pub struct EventDesk {
    config: DeskConfig,
}

impl EventDesk {
    /// Load from ~/.config/eventdesk/config.toml, creating it on first run.
    pub fn load() -> EventDeskResult<Self> {
        let config_path = DeskConfig::config_path()?;

        if !config_path.exists() {
            DeskConfig::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit config file. A missing file means defaults.
    pub fn load_from(config_path: &Path) -> EventDeskResult<Self> {
        let config: DeskConfig = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .build()
            .map_err(|e| EventDeskError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventDeskError::Config(e.to_string()))?;

        Ok(EventDesk { config })
    }

    pub fn from_config(config: DeskConfig) -> Self {
        EventDesk { config }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.config.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The data directory in display-friendly form, keeping `~` unexpanded.
    pub fn display_path(&self) -> PathBuf {
        self.config.data_dir.clone()
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.data_path())
    }

    /// Path of the file holding the event list.
    pub fn events_file(&self) -> PathBuf {
        self.storage().path_for(&self.config.storage_key)
    }

    pub fn open_store(&self) -> (EventStore<FileStorage>, LoadStatus) {
        EventStore::with_key(self.storage(), &self.config.storage_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyValueStorage;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();

        let desk = EventDesk::load_from(&tmp.path().join("absent.toml")).unwrap();

        assert_eq!(desk.config(), &DeskConfig::default());
        assert_eq!(desk.display_path(), PathBuf::from("~/.local/share/eventdesk"));
    }

    #[test]
    fn test_config_file_sets_data_dir_and_key() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("data");
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!(
                "data_dir = \"{}\"\nstorage_key = \"festival\"\n",
                data_dir.display()
            ),
        )
        .unwrap();

        let desk = EventDesk::load_from(&config_path).unwrap();

        assert_eq!(desk.data_path(), data_dir);
        assert_eq!(desk.events_file(), data_dir.join("festival.json"));
    }

    #[test]
    fn test_open_store_reads_configured_file() {
        let tmp = tempfile::tempdir().unwrap();
        let desk = EventDesk::from_config(DeskConfig {
            data_dir: tmp.path().to_path_buf(),
            storage_key: "events".to_string(),
        });
        desk.storage().set("events", "[]").unwrap();

        let (store, status) = desk.open_store();

        assert!(store.is_empty());
        assert!(matches!(status, LoadStatus::Loaded(0)));
    }
}
