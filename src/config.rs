//! Persisted tracker settings.
//!
//! Stored as JSON at `<config_dir>/dell-orders/config.json`. A missing file
//! yields the defaults; a malformed one is logged and ignored.

use crate::export::DEFAULT_FILE_PREFIX;
use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Order date the daily export is filtered to when nothing overrides it.
pub const DEFAULT_TARGET_ORDER_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 10, 30) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerSettings {
    /// Only orders placed on this day survive the date gate.
    pub target_order_date: NaiveDate,
    /// Download names are `<prefix>_<YYYYMMDD>.<ext>`.
    pub export_file_prefix: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            target_order_date: DEFAULT_TARGET_ORDER_DATE,
            export_file_prefix: DEFAULT_FILE_PREFIX.to_owned(),
        }
    }
}

impl TrackerSettings {
    /// An explicit date (command line or environment) beats the stored one.
    pub fn resolve_target_date(&self, explicit: Option<NaiveDate>) -> NaiveDate {
        explicit.unwrap_or(self.target_order_date)
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dell-orders").join("config.json"))
}

/// Load settings from the platform config path, falling back to defaults.
pub fn load_settings() -> TrackerSettings {
    match get_config_path() {
        Some(path) => load_settings_from(&path),
        None => TrackerSettings::default(),
    }
}

pub fn load_settings_from(path: &Path) -> TrackerSettings {
    if !path.exists() {
        return TrackerSettings::default();
    }

    match read_settings(path) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(path = %path.display(), "Ignoring config file: {err:#}");
            TrackerSettings::default()
        }
    }
}

fn read_settings(path: &Path) -> Result<TrackerSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context("Invalid settings JSON")
}

/// Write settings to the platform config path and return that path.
pub fn save_settings(settings: &TrackerSettings) -> Result<PathBuf> {
    let path = get_config_path().context("Failed to determine config directory")?;
    save_settings_to(settings, &path)?;
    Ok(path)
}

pub fn save_settings_to(settings: &TrackerSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TrackerSettings::default();
        assert_eq!(
            settings.target_order_date,
            NaiveDate::from_ymd_opt(2025, 10, 30).expect("valid date")
        );
        assert_eq!(settings.export_file_prefix, "dell_orders_filtered");
    }

    #[test]
    fn test_explicit_date_wins() {
        let settings = TrackerSettings::default();
        let other = NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date");
        assert_eq!(settings.resolve_target_date(Some(other)), other);
        assert_eq!(settings.resolve_target_date(None), DEFAULT_TARGET_ORDER_DATE);
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = load_settings_from(&dir.path().join("config.json"));
        assert_eq!(settings, TrackerSettings::default());
        Ok(())
    }

    #[test]
    fn test_malformed_file_gives_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json")?;
        assert_eq!(load_settings_from(&path), TrackerSettings::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "target_order_date": "2025-11-03" }"#)?;

        let settings = load_settings_from(&path);
        assert_eq!(
            settings.target_order_date,
            NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date")
        );
        assert_eq!(settings.export_file_prefix, DEFAULT_FILE_PREFIX);
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("config.json");
        let settings = TrackerSettings {
            target_order_date: NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"),
            export_file_prefix: "laptops".to_owned(),
        };
        save_settings_to(&settings, &path)?;
        assert_eq!(load_settings_from(&path), settings);
        Ok(())
    }
}
