use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

const APP_DIR: &str = "jikan";
const RECORD_FILE: &str = "weather-location.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("東京", 35.6895, 139.6917)
    }
}

/// Holds the single saved location. Every save replaces the previous record.
#[derive(Debug, Clone)]
pub struct LocationStore {
    path: PathBuf,
}

impl LocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform configuration directory.
    pub fn in_config_dir() -> Result<Self, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(RECORD_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, location: &Location) -> Result<(), StoreError> {
        let json = serde_json::to_string(location)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!(
            "saved location {} to {}",
            location.name,
            self.path.display()
        );
        Ok(())
    }

    /// Missing, unreadable and unparsable records all read as `None`.
    pub fn load(&self) -> Option<Location> {
        let raw = fs::read_to_string(&self.path).ok()?;
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(location) => Some(location),
            Err(err) => {
                log::warn!(
                    "ignoring corrupt location record {}: {err}",
                    self.path.display()
                );
                None
            }
        }
    }
}
