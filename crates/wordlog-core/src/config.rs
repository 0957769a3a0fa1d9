//! Tracker configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{CoreError, Result};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the vocabulary store file
    pub database_path: PathBuf,
    /// Directory backups are exported into
    pub export_dir: PathBuf,
    /// File name used for exported backups
    pub export_file_name: String,
    /// Page size used when a request does not carry one
    pub page_size: u32,
    /// Application driven for dictionary lookups
    pub lookup_app: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let export_dir = dirs::download_dir().unwrap_or_else(|| data_dir.join("Downloads"));

        Self {
            database_path: data_dir.join("vocabulary.sqlite"),
            export_dir,
            export_file_name: "vocabulary_backup.sqlite".to_string(),
            page_size: wordlog_vocabulary::DEFAULT_PAGE_SIZE,
            lookup_app: "Arc".to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Wordlog"))
            .unwrap_or_else(|| PathBuf::from(".wordlog"))
    }

    /// Read `config.json` from `data_dir`, falling back to defaults when the
    /// file does not exist. Missing fields take their default values.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<Config>(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::new(data_dir.to_path_buf()),
            Err(e) => return Err(e.into()),
        };

        if config.page_size == 0 {
            return Err(CoreError::Config("page_size must be at least 1".to_string()));
        }
        if config.export_file_name.trim().is_empty() {
            config.export_file_name = Self::new(data_dir.to_path_buf()).export_file_name;
        }

        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)?;
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(data_dir.join(CONFIG_FILE), raw)?;
        Ok(())
    }

    /// Where [`crate::Tracker::export_store`] writes the backup.
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
