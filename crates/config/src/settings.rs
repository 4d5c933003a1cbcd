// Application settings
// Loaded from ~/.config/roilens/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Row store
    pub api_base: String,

    /// Quiet window in milliseconds before a scheduled row write flushes.
    pub debounce_ms: u64,

    // Local dataset file (None = platform data dir)
    pub data_file: Option<PathBuf>,

    // Reports (None = current year)
    pub default_year: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            debounce_ms: 250,
            data_file: None,
            default_year: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roilens");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file();
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error parsing settings.json: {}", e);
                    eprintln!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading settings.json: {}", e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(&path, json).map_err(|e| e.to_string())
    }

    /// Parse a TOML override file (`--config FILE`)
    pub fn from_toml_str(input: &str) -> Result<Self, String> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| format!("invalid settings override: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.api_base.is_empty()
            && !self.api_base.starts_with("http://")
            && !self.api_base.starts_with("https://")
        {
            return Err(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            ));
        }

        // A window past a minute means edits never flush in practice
        if self.debounce_ms > 60_000 {
            return Err(format!(
                "debounce_ms must be 60000 or less, got {}",
                self.debounce_ms
            ));
        }

        if let Some(year) = self.default_year {
            if year < 2000 {
                return Err(format!("default_year must be 2000 or later, got {}", year));
            }
        }

        Ok(())
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }

    // Strip comments (lines starting with //) before parsing
    fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
    }

    /// Create default settings file with comments
    fn create_default_file(&self) {
        let path = Self::config_path();

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Row store
    "api_base": "",
    "debounce_ms": 250,

    // Local dataset file (null = platform data dir)
    "data_file": null,

    // Reports (null = current year)
    "default_year": null
}
"#;

        if let Err(e) = fs::write(&path, default_config) {
            eprintln!("Error writing default settings.json: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings =
            Settings::from_json_str(r#"{"api_base": "https://rows.example.com"}"#).unwrap();
        assert_eq!(settings.api_base, "https://rows.example.com");
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.data_file, None);
        assert_eq!(settings.default_year, None);
    }

    #[test]
    fn comment_lines_are_ignored() {
        let contents = r#"{
    // Row store
    "api_base": "https://rows.example.com",
    "debounce_ms": 400
}
"#;
        let settings = Settings::from_json_str(contents).unwrap();
        assert_eq!(settings.debounce_ms, 400);
    }

    #[test]
    fn the_default_file_parses_back() {
        let settings = Settings::from_json_str(
            r#"{
    // Row store
    "api_base": "",
    "debounce_ms": 250,

    // Local dataset file (null = platform data dir)
    "data_file": null,

    // Reports (null = current year)
    "default_year": null
}
"#,
        )
        .unwrap();
        assert_eq!(settings.api_base, "");
        assert_eq!(settings.debounce_ms, 250);
    }

    #[test]
    fn toml_override_fills_missing_fields() {
        let settings = Settings::from_toml_str(
            r#"
api_base = "https://rows.example.com"
debounce_ms = 400
"#,
        )
        .unwrap();
        assert_eq!(settings.api_base, "https://rows.example.com");
        assert_eq!(settings.debounce_ms, 400);
        assert_eq!(settings.default_year, None);
    }

    #[test]
    fn rejects_a_runaway_debounce_window() {
        let err = Settings::from_toml_str("debounce_ms = 90000").unwrap_err();
        assert!(err.contains("debounce_ms"), "{err}");
    }

    #[test]
    fn rejects_a_pre_2000_default_year() {
        let err = Settings::from_toml_str("default_year = 1999").unwrap_err();
        assert!(err.contains("default_year"), "{err}");
    }

    #[test]
    fn rejects_a_non_http_api_base() {
        let err = Settings::from_toml_str(r#"api_base = "rows.example.com""#).unwrap_err();
        assert!(err.contains("api_base"), "{err}");
    }
}
