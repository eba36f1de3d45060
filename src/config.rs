//! Configuration file handling for daybook.
//!
//! The configuration file is stored at `$DAYBOOK_HOME/config.json` and names the storage
//! directory and the keys the two stores persist under.

use crate::event_store::EVENTS_KEY;
use crate::organizer::{Organizer, OrganizerLoad};
use crate::storage::FileStorage;
use crate::transaction_store::TRANSACTIONS_KEY;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "daybook";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORAGE_DIR: &str = "storage";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$DAYBOOK_HOME` and from there it loads `$DAYBOOK_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, the storage directory and an initial `config.json` with
    /// default settings.
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists or any file operation fails.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative).context("Unable to create the daybook home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let config_file = ConfigFile::default();
        config_file.save(&config_path)?;

        let config = Self {
            root,
            config_path,
            config_file,
        };
        utils::make_dir(config.storage_dir())?;
        Ok(config)
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load the config file
    /// - return the loaded configuration object
    pub fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The daybook home directory is missing '{}', run 'daybook init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory holding one JSON file per store. A relative `storage_dir` is resolved
    /// against the home directory.
    pub fn storage_dir(&self) -> PathBuf {
        let p = self.config_file.storage_dir();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    pub fn events_key(&self) -> &str {
        self.config_file
            .events_key
            .as_deref()
            .unwrap_or(EVENTS_KEY)
    }

    pub fn transactions_key(&self) -> &str {
        self.config_file
            .transactions_key
            .as_deref()
            .unwrap_or(TRANSACTIONS_KEY)
    }

    /// Opens the file storage, creating its directory if needed.
    pub fn storage(&self) -> Result<FileStorage> {
        FileStorage::open(self.storage_dir())
    }

    /// Opens the storage and loads both stores from it, returning what the load found.
    pub fn open(&self) -> Result<(Organizer<FileStorage>, OrganizerLoad)> {
        let mut organizer =
            Organizer::with_keys(self.storage()?, self.events_key(), self.transactions_key());
        let load = organizer.load();
        Ok((organizer, load))
    }

    /// Like `open`, for callers that only need the organizer. Load problems are still logged.
    pub fn organizer(&self) -> Result<Organizer<FileStorage>> {
        Ok(self.open()?.0)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "daybook",
///   "config_version": 1,
///   "events_key": "calendarEvents",
///   "transactions_key": "financeTransactions",
///   "storage_dir": "storage"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "daybook"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The storage key of the calendar events, defaults to `calendarEvents`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    events_key: Option<String>,

    /// The storage key of the transactions, defaults to `financeTransactions`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transactions_key: Option<String>,

    /// The storage directory (relative to the home directory or absolute), defaults to `storage`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_dir: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            events_key: Some(EVENTS_KEY.to_string()),
            transactions_key: Some(TRANSACTIONS_KEY.to_string()),
            storage_dir: Some(PathBuf::from(STORAGE_DIR)),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or is not a daybook config
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }

    /// If None, defaults to `storage`, relative to the home directory.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(STORAGE_DIR))
    }
}
