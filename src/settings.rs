//! User settings: server location, downloads and form fields

use crate::constants::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS, SERVER_URL_ENV};
use crate::models::FieldSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.yaml";

/// User configuration, read from `~/.pricecast/config.yaml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    /// Where batch downloads are written; falls back to the user's download dir
    pub download_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
    /// Required form fields, in display order
    pub fields: Vec<FieldSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server_url: String::from(DEFAULT_SERVER_URL),
            download_dir: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            fields: default_fields(),
        }
    }
}

impl Settings {
    /// Load from the default location, applying environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_or_init(&Self::default_path())?;
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                settings.server_url = url.trim().to_string();
            }
        }
        Ok(settings)
    }

    /// Load a file, writing the defaults there first if it is missing
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let settings = Self::default();
        if let Err(err) = settings.save_to(path) {
            tracing::warn!(path = %path.display(), error = %err, "Could not write default config");
        }
        Ok(settings)
    }

    /// Load from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    /// Write to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pricecast")
            .join(CONFIG_FILE)
    }

    /// Full URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Brand", &["Dell", "HP", "Lenovo", "Asus", "Acer", "Apple", "MSI"]),
        FieldSpec::new(
            "Processor",
            &["Intel i3", "Intel i5", "Intel i7", "Intel i9", "AMD Ryzen 5", "AMD Ryzen 7"],
        ),
        FieldSpec::new("RAM", &["4GB", "8GB", "16GB", "32GB"]),
        FieldSpec::new("Storage", &["256GB SSD", "512GB SSD", "1TB SSD", "1TB HDD"]),
        FieldSpec::new(
            "GPU",
            &["Integrated", "NVIDIA GTX 1650", "NVIDIA RTX 3050", "NVIDIA RTX 4060", "AMD Radeon"],
        ),
        FieldSpec::new("Operating_System", &["Windows", "macOS", "Linux", "FreeDOS"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.fields[0].name, "Brand");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
server_url: "https://prices.example.com/"
fields:
  - name: Brand
    options: [Dell, HP]
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.endpoint("/predict"), "https://prices.example.com/predict");
        assert_eq!(settings.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.fields, vec![FieldSpec::new("Brand", &["Dell", "HP"])]);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".pricecast").join("config.yaml");

        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "request_timeout_secs: 5\n").unwrap();

        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "request_timeout_secs: 5\n");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let settings = Settings {
            download_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }
}
