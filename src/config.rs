//! Configuration management for minigfx.
//!
//! Settings are read from `~/.minigfx/config.toml`. Every section is
//! optional; anything missing falls back to the defaults below.
//!
//! ```toml
//! log_level = "info"
//!
//! [window]
//! width = 640
//! height = 480
//! title = "minigfx"
//!
//! [colors]
//! # auto, fast, palette
//! mode = "auto"
//! foreground = { r = 255, g = 255, b = 255 }
//! background = { r = 0, g = 0, b = 0 }
//!
//! [line]
//! width = 0
//! # solid, dashed
//! style = "solid"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::{ColorModePreference, Rgb};
use crate::core::display::LineStyle;
use crate::error::{GfxError, Result};

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter directive, e.g. `info` or `minigfx=debug`
    pub log_level: String,
    pub window: WindowConfig,
    pub colors: ColorConfig,
    pub line: LineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            colors: ColorConfig::default(),
            line: LineConfig::default(),
        }
    }
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "minigfx".to_string(),
        }
    }
}

/// Color settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub mode: ColorModePreference,
    pub foreground: Rgb,
    pub background: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            mode: ColorModePreference::Auto,
            foreground: Rgb::WHITE,
            background: Rgb::BLACK,
        }
    }
}

/// Line settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// 0 selects the server's fast thin line
    pub width: u32,
    pub style: LineStyle,
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::default(),
        }
    }

    /// Load from `path`, falling back to defaults when it cannot be read or
    /// parsed. Logging is not set up yet at this point, so failures also go
    /// to stderr.
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                eprintln!("minigfx: ignoring {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_toml(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Cannot parse {}: {}", path.display(), e);
                eprintln!("minigfx: ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GfxError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path()
            .ok_or_else(|| GfxError::Config("Could not determine config path".to_string()))?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| GfxError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| GfxError::Config(format!("Failed to write config: {}", e)))?;
        Ok(())
    }

    /// Directory holding the config file and the log
    pub fn config_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".minigfx"))
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        let dir = Self::config_dir()?;
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        Some(dir.join("config.toml"))
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "minigfx-{}-{}.toml",
            name,
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_bad_file_falls_back() {
        let path = scratch_file("bad", "[window\nwidth = ");
        assert_eq!(Config::load_from(&path), Config::default());
        fs::remove_file(&path).unwrap();

        let missing = std::env::temp_dir().join("minigfx-missing-config.toml");
        assert_eq!(Config::load_from(&missing), Config::default());
    }

    #[test]
    fn test_load_from_good_file() {
        let path = scratch_file("good", "[window]\nwidth = 320\n");
        let config = Config::load_from(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(config.window.width, 320);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
            log_level = "debug"

            [window]
            title = "demo"

            [colors]
            mode = "palette"
            background = { r = 10, g = 20, b = 30 }

            [line]
            width = 2
            style = "dashed"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.colors.mode, ColorModePreference::Palette);
        assert_eq!(config.colors.background, Rgb::new(10, 20, 30));
        assert_eq!(config.colors.foreground, Rgb::WHITE);
        assert_eq!(config.line.width, 2);
        assert_eq!(config.line.style, LineStyle::Dashed);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::from_toml("[colors]\nmode = \"sepia\""),
            Err(GfxError::Config(_))
        ));
        assert!(Config::from_toml("[colors]\nforeground = { r = 300, g = 0, b = 0 }").is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.window.width = 1024;
        config.colors.mode = ColorModePreference::Fast;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
