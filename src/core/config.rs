use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("tick_ms must be greater than zero")]
    ZeroTick,
    #[error("invalid duration range: min_seconds={min} max_seconds={max}")]
    DurationRange { min: f64, max: f64 },
}

/// Simulation knobs recognised by the upload engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub tick_ms: u64,
    pub min_seconds: f64,
    pub max_seconds: f64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_ms: 120,
            min_seconds: 10.0,
            max_seconds: 15.0,
        }
    }
}

impl UploadConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        let ok = self.min_seconds.is_finite()
            && self.max_seconds.is_finite()
            && self.min_seconds >= 0.0
            && self.min_seconds <= self.max_seconds;
        if !ok {
            return Err(ConfigError::DurationRange { min: self.min_seconds, max: self.max_seconds });
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg = UploadConfig::from_toml("tick_ms = 50\n").unwrap();
        assert_eq!(cfg.tick_ms, 50);
        assert_eq!(cfg.min_seconds, 10.0);
        assert_eq!(cfg.max_seconds, 15.0);
    }

    #[test]
    fn rejects_inverted_range_and_zero_tick() {
        assert!(matches!(
            UploadConfig::from_toml("min_seconds = 20\nmax_seconds = 5\n"),
            Err(ConfigError::DurationRange { .. })
        ));
        assert!(matches!(UploadConfig::from_toml("tick_ms = 0\n"), Err(ConfigError::ZeroTick)));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uploader.toml");
        std::fs::write(&path, "min_seconds = 1.5\nmax_seconds = 2.0\n").unwrap();
        let cfg = UploadConfig::load(&path).unwrap();
        assert_eq!(cfg.min_seconds, 1.5);
        assert_eq!(cfg.tick(), Duration::from_millis(120));
    }
}
