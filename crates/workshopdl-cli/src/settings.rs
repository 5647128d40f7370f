//! Persistent CLI settings.
//!
//! Stores the last-used collection reference so `workshopdl download` can be
//! re-run without arguments. Lives at `<config_dir>/workshopdl/settings.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings persisted between invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliSettings {
    /// The collection reference from the most recent successful run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reference: Option<String>,
}

impl CliSettings {
    /// Load settings from the default location.
    ///
    /// A missing file is not an error; it yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_path()?)
    }

    /// Save settings to the default location, creating the directory if
    /// needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create settings directory {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }
}

fn settings_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("no user configuration directory available")?;
    Ok(base.join("workshopdl").join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let original = CliSettings {
            last_reference: Some("https://example.invalid/?id=555".to_string()),
        };
        original.save_to(&path).unwrap();

        let loaded = CliSettings::load_from(&path).unwrap();
        assert_eq!(loaded.last_reference, original.last_reference);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let loaded = CliSettings::load_from(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.last_reference.is_none());
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(CliSettings::load_from(&path).is_err());
    }
}
