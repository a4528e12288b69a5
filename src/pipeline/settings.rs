//! Pipeline settings, persisted as JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{AxisSet, DEFAULT_WINDOW_CAPACITY};
use crate::geom::CompositionOrder;
use crate::util::{Error, Result};

/// Default lines drained per tick.
pub const DEFAULT_BATCH_SIZE: usize = 5;
/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 30;
/// Default stream read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;
/// Batches a background reader may queue ahead of the tick loop.
pub const QUEUED_BATCHES: usize = 4;

/// Everything needed to build a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fields per line: 2 (pitch, roll) or 3 (pitch, roll, yaw).
    pub axes: AxisSet,
    /// Samples kept per axis.
    pub window_capacity: usize,
    /// Upper bound on lines read per tick.
    pub batch_size: usize,
    pub tick_interval_ms: u64,
    pub read_timeout_ms: u64,
    pub composition_order: CompositionOrder,
    /// File or device to read; standard input when unset.
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            axes: AxisSet::PitchRollYaw,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            composition_order: CompositionOrder::Zyx,
            source: None,
        }
    }
}

impl Settings {
    /// Per-user settings file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("attitude");
            p.push("settings.json");
            p
        })
    }

    /// Load from the per-user file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(Error::SettingsNotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load and validate a settings file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::SettingsNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Save to the per-user file and return where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| Error::other("no configuration directory on this platform"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.window_capacity == 0 {
            return Err(Error::config("window_capacity must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(Error::config("batch_size must be at least 1"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Lines a background reader may buffer before it blocks.
    pub fn queue_capacity(&self) -> usize {
        self.batch_size.saturating_mul(QUEUED_BATCHES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.axes.field_count(), 3);
        assert_eq!(s.window_capacity, 200);
        assert_eq!(s.batch_size, 5);
        assert_eq!(s.tick_interval(), Duration::from_millis(30));
        assert_eq!(s.read_timeout(), Duration::from_secs(1));
        assert_eq!(s.queue_capacity(), crate::stream::DEFAULT_QUEUE_CAPACITY);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{"axes": 2, "window_capacity": 50}"#).unwrap();
        assert_eq!(s.axes, AxisSet::PitchRoll);
        assert_eq!(s.window_capacity, 50);
        assert_eq!(s.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(s.composition_order, CompositionOrder::Zyx);
    }

    #[test]
    fn test_invalid_field_count_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{"axes": 4}"#).is_err());
    }

    #[test]
    fn test_validate() {
        let s = Settings { batch_size: 0, ..Default::default() };
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
        let s = Settings { window_capacity: 0, ..Default::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let s = Settings {
            axes: AxisSet::PitchRoll,
            composition_order: CompositionOrder::Xyz,
            source: Some(PathBuf::from("/dev/ttyUSB0")),
            ..Default::default()
        };
        s.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_load_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        assert!(matches!(Settings::load_from(&missing), Err(Error::SettingsNotFound(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"batch_size": 0}"#).unwrap();
        assert!(matches!(Settings::load_from(&bad), Err(Error::InvalidConfig(_))));

        std::fs::write(&bad, "not json").unwrap();
        assert!(matches!(Settings::load_from(&bad), Err(Error::Json(_))));
    }
}
