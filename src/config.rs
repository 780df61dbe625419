//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSE_HOME/config.json` and contains settings for the
//! location of the transactions file and how many backups of it to keep.

use crate::backup::Backup;
use crate::ledger::Ledger;
use crate::store::{self, FileStore, Store};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "expense-tracker";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const TRANSACTIONS_JSON: &str = "transactions.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSE_HOME` and from there it loads `$EXPENSE_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its backups subdirectory and an initial `config.json` file with
    /// default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g.
    ///   `$HOME/expense-tracker`
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a `config.json`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expense tracker home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The expense tracker home directory is missing, run 'expense init'")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'expense init'",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Returns the stored `transactions_path` if it is absolute, otherwise resolves it against the
    /// home directory.
    pub fn transactions_path(&self) -> PathBuf {
        let p = self.config_file.transactions_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::from_config(self)
    }

    /// The store holding this home directory's transactions.
    pub fn store(&self) -> Box<dyn Store + Send> {
        store::file(FileStore::new(self.transactions_path()).with_backup(self.backup()))
    }

    /// Loads the ledger from this home directory's store.
    pub async fn ledger(&self) -> Ledger {
        Ledger::load(self.store()).await
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense-tracker",
///   "config_version": 1,
///   "backup_copies": 5,
///   "transactions_path": "transactions.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense-tracker"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies of the transactions file to keep, 0 disables backups
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Path to the transactions file (optional, relative to the home directory or absolute)
    /// Defaults to $EXPENSE_HOME/transactions.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transactions_path: Option<PathBuf>,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            transactions_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or was not written by this app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Failed to load config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config version {} is unsupported. Is a newer version of expense available?",
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn transactions_path(&self) -> PathBuf {
        self.transactions_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(TRANSACTIONS_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("expense_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.backups().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.backup_copies(), BACKUP_COPIES);
        assert_eq!(
            config.transactions_path(),
            config.root().join(TRANSACTIONS_JSON)
        );
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        let err = Config::create(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_config_load_after_create() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.config_file, loaded.config_file);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("The config file is missing"));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "expense-tracker",
            "config_version": 1
        }"#;
        utils::write(&path, json).await.unwrap();

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config.backup_copies, BACKUP_COPIES);
        assert_eq!(config.transactions_path(), PathBuf::from(TRANSACTIONS_JSON));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{"app_name": "wrong_app", "config_version": 1, "backup_copies": 5}"#;
        utils::write(&path, json).await.unwrap();

        let err = ConfigFile::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_newer_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{"app_name": "expense-tracker", "config_version": 99}"#;
        utils::write(&path, json).await.unwrap();

        assert!(ConfigFile::load(&path).await.is_err());
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("transactions_path"));
    }

    #[tokio::test]
    async fn test_custom_absolute_transactions_path() {
        let dir = TempDir::new().unwrap();
        let elsewhere = dir.path().join("elsewhere.json");
        let home = dir.path().join("home");
        let mut config = Config::create(&home).await.unwrap();
        config.config_file.transactions_path = Some(elsewhere.clone());
        config.config_file.save(config.config_path()).await.unwrap();

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.transactions_path(), elsewhere);
    }

    #[tokio::test]
    async fn test_ledger_persists_in_home() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();

        let mut ledger = config.ledger().await;
        ledger.add("Coffee", "-4.5", Category::Food).await.unwrap();
        ledger.add("Tea", "-3", Category::Food).await.unwrap();
        assert!(config.transactions_path().is_file());

        let reloaded = config.ledger().await;
        assert_eq!(reloaded.transactions(), ledger.transactions());
        // The second write backed up the first
        let mut entries = utils::read_dir(config.backups()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_some());
    }
}
