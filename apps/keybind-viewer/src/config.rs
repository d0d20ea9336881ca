//! Configuration for keybind viewer.

use ratatui::style::Color;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Directory of `key=binding` files. Defaults to `~/.config/shortcuts/keybinds`.
    #[serde(default)]
    pub keybinds_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub hyprland: bool,
    /// Defaults to `~/.config/hypr/hyprland.conf`.
    #[serde(default)]
    pub hyprland_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

fn default_true() -> bool {
    true
}

fn default_highlight_color() -> String {
    "yellow".to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            keybinds_dir: None,
            hyprland: true,
            hyprland_config: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            highlight_color: default_highlight_color(),
            show_status_bar: true,
        }
    }
}

impl DisplayConfig {
    /// Highlight color, falling back to yellow for unknown names.
    pub fn highlight_color(&self) -> Color {
        Color::from_str(&self.highlight_color).unwrap_or(Color::Yellow)
    }
}

impl Config {
    /// Load from the default location. Missing or broken files yield defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "using default configuration");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "keybind-viewer")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Directory the log file is written to.
    pub fn log_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "keybind-viewer").map(|d| d.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sources.hyprland);
        assert!(config.sources.keybinds_dir.is_none());
        assert_eq!(config.display.highlight_color(), Color::Yellow);
        assert!(config.display.show_status_bar);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "[sources]\nkeybinds_dir = \"/tmp/binds\"\nhyprland = false\n\n[display]\nhighlight_color = \"#ff8800\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sources.keybinds_dir, Some(PathBuf::from("/tmp/binds")));
        assert!(!config.sources.hyprland);
        assert_eq!(config.display.highlight_color(), Color::Rgb(0xff, 0x88, 0x00));
        assert!(config.display.show_status_bar);
    }

    #[test]
    fn test_unknown_color_falls_back() {
        let display = DisplayConfig {
            highlight_color: "not-a-color".into(),
            show_status_bar: true,
        };
        assert_eq!(display.highlight_color(), Color::Yellow);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[sources\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
