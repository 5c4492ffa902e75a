// Application settings
// Loaded from ~/.config/codeplot/settings.json

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// User settings. All fields have defaults; unknown fields in the file are
/// ignored so older builds can read newer files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Record table opened at session start when no path is given on the
    /// command line.
    pub data_file: Option<PathBuf>,

    /// Grid filter applied at session start: "all", "selected", "modified".
    pub default_filter: String,

    /// Marker color for selected points (hex RGB).
    pub selected_color: String,

    /// Marker color for unselected points (hex RGB).
    pub default_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            default_filter: "all".to_string(),
            selected_color: "#0000FF".to_string(),
            default_color: "#ADD8E6".to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("codeplot")
            .join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");
                serde_json::from_str(&cleaned).unwrap_or_default()
            }
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_filter, "all");
        assert!(settings.data_file.is_none());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"default_filter": "selected"}"#).unwrap();
        assert_eq!(settings.default_filter, "selected");
        assert_eq!(settings.selected_color, "#0000FF");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let settings: Settings =
            serde_json::from_str(r#"{"future_option": true}"#).unwrap();
        assert_eq!(settings.default_filter, "all");
    }
}
