use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpendError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Exclusive lower bound of the detail window, MM/DD/YYYY
    #[serde(default = "default_window_from")]
    pub window_from: String,
    /// Exclusive upper bound of the detail window, MM/DD/YYYY
    #[serde(default = "default_window_to")]
    pub window_to: String,
    #[serde(default = "default_focus_category")]
    pub focus_category: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

fn default_window_from() -> String {
    "01/01/2024".to_string()
}

fn default_window_to() -> String {
    "02/01/2024".to_string()
}

fn default_focus_category() -> String {
    "Supermarkets".to_string()
}

fn default_output_dir() -> String {
    "charts".to_string()
}

fn default_chart_width() -> u32 {
    960
}

fn default_chart_height() -> u32 {
    600
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_from: default_window_from(),
            window_to: default_window_to(),
            focus_category: default_focus_category(),
            output_dir: default_output_dir(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 6] = [
        "window_from",
        "window_to",
        "focus_category",
        "output_dir",
        "chart_width",
        "chart_height",
    ];

    /// Update one field by key, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parse_px = |v: &str| -> Result<u32> {
            match v.parse::<u32>() {
                Ok(px) if px >= 100 => Ok(px),
                _ => Err(SpendError::Settings(format!(
                    "{key} must be a pixel size of at least 100, got '{v}'"
                ))),
            }
        };
        match key {
            "window_from" | "window_to" => {
                crate::loader::parse_bound(value)?;
                if key == "window_from" {
                    self.window_from = value.to_string();
                } else {
                    self.window_to = value.to_string();
                }
            }
            "focus_category" => self.focus_category = value.to_string(),
            "output_dir" => self.output_dir = value.to_string(),
            "chart_width" => self.chart_width = parse_px(value)?,
            "chart_height" => self.chart_height = parse_px(value)?,
            _ => {
                return Err(SpendError::Settings(format!(
                    "unknown key '{key}' (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("spendscope")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(&path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!("Ignoring unreadable {}: {e}", path.display());
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SpendError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            focus_category: "Restaurants".to_string(),
            chart_width: 1200,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.window_from, "01/01/2024");
        assert_eq!(s.window_to, "02/01/2024");
        assert_eq!(s.focus_category, "Supermarkets");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"focus_category": "Gasoline"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.focus_category, "Gasoline");
        assert_eq!(s.chart_height, 600);
        assert_eq!(s.window_to, "02/01/2024");
    }

    #[test]
    fn test_set_validates_values() {
        let mut s = Settings::default();
        s.set("window_from", "12/01/2023").unwrap();
        assert_eq!(s.window_from, "12/01/2023");
        assert!(s.set("window_to", "2024-02-01").is_err());
        assert!(s.set("chart_width", "12").is_err());
        s.set("chart_width", "1280").unwrap();
        assert_eq!(s.chart_width, 1280);
        let err = s.set("colour", "blue").unwrap_err();
        assert!(err.to_string().contains("unknown key"), "got: {err}");
    }
}
