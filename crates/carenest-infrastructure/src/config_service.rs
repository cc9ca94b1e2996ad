//! Configuration service.
//!
//! Loads `RootConfig` from `config.toml` and caches it. A missing file means
//! defaults; a malformed file is a configuration error.

use carenest_core::config::RootConfig;
use carenest_core::{CareNestError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached configuration, loading it on first access.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load()?;
        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = None;
    }

    /// Reads the file without touching the cache.
    pub fn load(&self) -> Result<RootConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", self.path.display());
                return Ok(RootConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content).map_err(|e| {
            CareNestError::config(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Writes the default configuration if no file exists yet. Returns
    /// whether a file was created.
    pub fn write_default(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&RootConfig::default())
            .map_err(|e| CareNestError::config(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        tracing::info!("Wrote default config to {}", self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.get_config().unwrap(), RootConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[logging\nlevel = ").unwrap();

        let err = ConfigService::new(path).get_config().unwrap_err();
        assert!(matches!(err, CareNestError::Config(_)));
    }

    #[test]
    fn test_write_default_then_reload_after_edit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::new(path.clone());

        assert!(service.write_default().unwrap());
        assert!(!service.write_default().unwrap());
        assert_eq!(service.get_config().unwrap(), RootConfig::default());

        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().logging.level, "info");
        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().logging.level, "debug");
    }
}
