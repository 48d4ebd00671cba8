use anyhow::{Context, Result};
use roster_core::storage::{EmployeeStore, RedbEmployeeStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Explicit database file (from the command line or environment)
    #[serde(skip)]
    pub database_override: Option<PathBuf>,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_database_file() -> String {
    "employees.redb".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
        }
    }
}

impl ServerConfig {
    pub fn load(
        config_path: &Path,
        data_dir: PathBuf,
        database_override: Option<PathBuf>,
    ) -> Result<Self> {
        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        // Load config file if it exists, otherwise use defaults
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            Self::from_toml(&content)?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self {
                data_dir: data_dir.clone(),
                database_override: None,
                storage: Default::default(),
            }
        };

        config.data_dir = data_dir;
        config.database_override = database_override;

        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration file")
    }

    /// Get the database file path
    pub fn database_path(&self) -> PathBuf {
        match &self.database_override {
            Some(path) => path.clone(),
            None => self.data_dir.join(&self.storage.database_file),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EmployeeStore>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let store = RedbEmployeeStore::new(config.database_path())
            .context("Failed to open employee store")?;

        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }
}
