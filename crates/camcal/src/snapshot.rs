//! Exportable view of the store.

use std::{fs, path::Path};

use camcal_core::{CameraCalibration, StereoCalibration};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Every stored record at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSnapshot {
    pub cameras: Vec<CameraCalibration>,
    pub stereo: Vec<StereoCalibration>,
    /// Milliseconds since the Unix epoch.
    pub exported_at_ms: u64,
}

impl CalibrationSnapshot {
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty() && self.stereo.is_empty()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
