///! Geolocation sources
///!
///! The tracker never caches a position: it asks its source on every fetch
///! attempt and defers the fetch while either coordinate is missing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A possibly incomplete `[latitude, longitude]` pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Both halves, or `None` while the position is still unknown.
    pub fn pair(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

pub trait LocationSource: Send + Sync {
    fn current(&self) -> Coordinates;
}

/// In-memory position that an embedding host keeps up to date.
#[derive(Debug, Clone, Default)]
pub struct SharedLocation {
    inner: Arc<RwLock<Coordinates>>,
}

impl SharedLocation {
    pub fn new(initial: Coordinates) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn set(&self, coordinates: Coordinates) {
        match self.inner.write() {
            Ok(mut guard) => *guard = coordinates,
            Err(poisoned) => *poisoned.into_inner() = coordinates,
        }
    }
}

impl LocationSource for SharedLocation {
    fn current(&self) -> Coordinates {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Position published by an external provider as a JSON `[lat, lng]` file.
#[derive(Debug, Clone)]
pub struct FileLocation {
    path: PathBuf,
}

impl FileLocation {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read(&self) -> anyhow::Result<Coordinates> {
        let content = std::fs::read_to_string(&self.path)?;
        let [latitude, longitude]: [Option<f64>; 2] = serde_json::from_str(&content)?;
        Ok(Coordinates { latitude, longitude })
    }
}

impl LocationSource for FileLocation {
    fn current(&self) -> Coordinates {
        match self.read() {
            Ok(coordinates) => coordinates,
            Err(e) => {
                tracing::debug!("No location available from {:?}: {}", self.path, e);
                Coordinates::default()
            }
        }
    }
}
