//! Keybind file discovery and parsing.

use crate::config::SourcesConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A file name with its `(key, binding)` pairs in source order.
pub type RawKeybindFile = (String, Vec<(String, String)>);

/// File name the Hyprland config is listed under.
pub const HYPRLAND_FILE_NAME: &str = "hyprland.conf";

/// Provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("could not find home directory")]
    NoHomeDir,
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file name is not valid UTF-8: {0:?}")]
    NonUtf8FileName(PathBuf),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ProviderError {
    let path = path.to_path_buf();
    move |source| ProviderError::Io { path, source }
}

/// Source of keybind files.
pub trait KeybindProvider {
    /// Return every keybind file, or fail as a whole.
    fn keybind_files(&self) -> ProviderResult<Vec<RawKeybindFile>>;
}

/// Reads `name=binding` files from a directory, plus `hyprland.conf`.
#[derive(Debug, Clone, Default)]
pub struct FsProvider {
    keybinds_dir: Option<PathBuf>,
    hyprland: bool,
    hyprland_config: Option<PathBuf>,
}

impl FsProvider {
    pub fn new(sources: &SourcesConfig) -> Self {
        Self {
            keybinds_dir: sources.keybinds_dir.clone(),
            hyprland: sources.hyprland,
            hyprland_config: sources.hyprland_config.clone(),
        }
    }

    fn home_dir() -> ProviderResult<PathBuf> {
        directories::BaseDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .ok_or(ProviderError::NoHomeDir)
    }

    fn keybinds_dir(&self) -> ProviderResult<PathBuf> {
        match &self.keybinds_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::home_dir()?.join(".config/shortcuts/keybinds")),
        }
    }

    fn hyprland_config(&self) -> ProviderResult<PathBuf> {
        match &self.hyprland_config {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::home_dir()?.join(".config/hypr/hyprland.conf")),
        }
    }

    fn read_keybinds_dir(&self, dir: &Path) -> ProviderResult<Vec<RawKeybindFile>> {
        tracing::debug!(dir = %dir.display(), "looking for keybind files");

        if !dir.exists() {
            tracing::info!(dir = %dir.display(), "keybinds directory missing, creating it");
            fs::create_dir_all(dir).map_err(io_err(dir))?;
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err(dir))? {
            let path = entry.map_err(io_err(dir))?.path();
            if !path.is_file() {
                continue;
            }

            let content = fs::read_to_string(&path).map_err(io_err(&path))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| ProviderError::NonUtf8FileName(path.clone()))?;

            files.push((name.to_string(), parse_keybind_lines(&content)));
        }

        Ok(files)
    }

    fn read_hyprland(&self) -> ProviderResult<Option<RawKeybindFile>> {
        let path = self.hyprland_config()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "hyprland config not found");
            return Ok(None);
        }

        tracing::debug!(path = %path.display(), "reading hyprland config");
        let content = fs::read_to_string(&path).map_err(io_err(&path))?;
        Ok(Some((
            HYPRLAND_FILE_NAME.to_string(),
            parse_hyprland_binds(&content),
        )))
    }
}

impl KeybindProvider for FsProvider {
    fn keybind_files(&self) -> ProviderResult<Vec<RawKeybindFile>> {
        let dir = self.keybinds_dir()?;
        let mut files = self.read_keybinds_dir(&dir)?;

        if self.hyprland {
            if let Some(hyprland) = self.read_hyprland()? {
                files.push(hyprland);
            }
        }

        Ok(files)
    }
}

/// Parse `key=binding` lines. Lines without exactly one `=` are skipped.
pub fn parse_keybind_lines(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(binding), None) => Some((key.to_string(), binding.to_string())),
                _ => {
                    tracing::debug!(line, "skipping malformed line");
                    None
                }
            }
        })
        .collect()
}

/// Parse `bind =` and `bindm =` lines of a Hyprland config into
/// `(action, "MODS+KEY")` pairs.
pub fn parse_hyprland_binds(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| line.starts_with("bind =") || line.starts_with("bindm ="))
        .filter_map(|line| {
            let parsed = line.split_once('=').and_then(|(_, rest)| {
                let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
                if parts.len() < 3 {
                    return None;
                }
                let modifiers = parts[0].replace('$', "").replace(' ', "+");
                let action = parts[2..].join(",");
                Some((action, format!("{}+{}", modifiers, parts[1])))
            });
            if parsed.is_none() {
                tracing::debug!(line, "skipping malformed bind");
            }
            parsed
        })
        .collect()
}
