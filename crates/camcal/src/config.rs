//! Engine configuration.

use camcal_pattern::ChessboardParams;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_min_frames() -> usize {
    10
}

fn default_thread_name() -> String {
    "camcal-worker".to_string()
}

/// Configuration of a [`CalibrationEngine`](crate::CalibrationEngine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Minimal number of frames per camera for a calibration run.
    #[serde(default = "default_min_frames")]
    pub min_frames: usize,
    #[serde(default)]
    pub chessboard: ChessboardParams,
    /// Worker pool size; `None` lets rayon pick one thread per core.
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_frames: default_min_frames(),
            chessboard: ChessboardParams::default(),
            worker_threads: None,
            thread_name: default_thread_name(),
        }
    }
}

impl CalibrationConfig {
    /// Load a JSON config from disk. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_frames == 0 {
            return Err(ConfigError::Invalid("min_frames must be positive".into()));
        }
        if self.chessboard.grid_size == 0 {
            return Err(ConfigError::Invalid("chessboard.grid_size must be positive".into()));
        }
        if self.chessboard.grid_size > ChessboardParams::MAX_GRID_SIZE {
            return Err(ConfigError::Invalid(format!(
                "chessboard.grid_size must not exceed {}",
                ChessboardParams::MAX_GRID_SIZE
            )));
        }
        if self.chessboard.ring_radius == 0 {
            return Err(ConfigError::Invalid("chessboard.ring_radius must be positive".into()));
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::Invalid("worker_threads must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let cfg = CalibrationConfig {
            min_frames: 12,
            worker_threads: Some(2),
            ..CalibrationConfig::default()
        };
        cfg.write_json(&path).expect("write");
        let back = CalibrationConfig::load_json(&path).expect("load");
        assert_eq!(cfg, back);
    }

    #[test]
    fn empty_object_is_default() {
        let cfg: CalibrationConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg, CalibrationConfig::default());
        assert_eq!(cfg.min_frames, 10);
        assert_eq!(cfg.chessboard.grid_size, 9);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"min_frames": 0}"#).expect("write");
        assert!(matches!(
            CalibrationConfig::load_json(&path),
            Err(ConfigError::Invalid(_))
        ));

        let cfg = CalibrationConfig {
            worker_threads: Some(0),
            ..CalibrationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn grid_size_is_bounded() {
        let mut cfg = CalibrationConfig::default();
        cfg.chessboard.grid_size = ChessboardParams::MAX_GRID_SIZE;
        assert!(cfg.validate().is_ok());
        cfg.chessboard.grid_size = 70_000;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }
}
