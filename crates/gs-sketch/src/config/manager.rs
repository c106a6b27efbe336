//! Loading and saving the engine configuration

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::SketchConfig;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Owns the configuration and the file it lives in
pub struct ConfigManager {
    config: SketchConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Load from the OS config directory, or start from defaults
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Load from an explicit file, or start from defaults
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let config = Self::load_from_path(&config_path).unwrap_or_else(|| {
            tracing::info!("No config file at {:?}, using defaults", config_path);
            SketchConfig::new()
        });

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    /// Strictly load a configuration file, failing on any error
    pub fn read(path: &Path) -> Result<SketchConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("globe-sketch")
            .join("config.ron")
    }

    fn load_from_path(path: &Path) -> Option<SketchConfig> {
        if !path.exists() {
            return None;
        }
        match Self::read(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to load config file: {}", e);
                None
            }
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration (marks as dirty)
    pub fn config_mut(&mut self) -> &mut SketchConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the configuration if it has unsaved changes
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(&self.config_path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = SketchConfig::new();
        self.dirty = true;
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("gs-sketch-test-{}", Uuid::new_v4()))
            .join("config.ron")
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let manager = ConfigManager::with_path(temp_config_path());
        assert_eq!(manager.config(), &SketchConfig::new());
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_config_path();
        let mut manager = ConfigManager::with_path(&path);
        manager.config_mut().labels.area_suffix = " sq km".into();
        manager.config_mut().theme.enabled = true;
        assert!(manager.is_dirty());
        manager.save().unwrap();
        assert!(!manager.is_dirty());

        let reloaded = ConfigManager::with_path(&path);
        assert_eq!(reloaded.config().labels.area_suffix, " sq km");
        assert!(reloaded.config().theme.enabled);
        assert_eq!(ConfigManager::read(&path), Ok(reloaded.config().clone()));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_unparseable_file_falls_back() {
        let path = temp_config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not ron at all (").unwrap();

        assert!(matches!(ConfigManager::read(&path), Err(ConfigError::Deserialize(_))));
        let manager = ConfigManager::with_path(&path);
        assert_eq!(manager.config(), &SketchConfig::new());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_reset_marks_dirty() {
        let mut manager = ConfigManager::with_path(temp_config_path());
        manager.reset_to_defaults();
        assert!(manager.is_dirty());
    }
}
