//! Persisted light/dark preference.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(AppError::validation(format!("unknown theme: {other}"))),
        }
    }
}

/// On-disk shape of the theme file.
#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Theme from a `COLORFGBG` value (`fg;bg` or `fg;default;bg`).
///
/// Background colors 0-6 and 8 are dark.
pub fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(Theme::Dark),
        7 | 9..=15 => Some(Theme::Light),
        _ => None,
    }
}

/// Terminal background preference, if the environment tells us.
pub fn os_preference() -> Option<Theme> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| theme_from_colorfgbg(&v))
}

/// Current theme plus the file it is saved to.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
    current: Theme,
}

impl ThemeStore {
    /// Read the saved preference, or use `fallback` when none is saved.
    ///
    /// An unreadable file is logged and treated as absent.
    pub async fn load(path: impl Into<PathBuf>, fallback: Theme) -> Self {
        let path = path.into();
        let current = match Self::read(&path).await {
            Ok(Some(theme)) => theme,
            Ok(None) => fallback,
            Err(e) => {
                log::warn!("Ignoring theme file {}: {}", path.display(), e);
                fallback
            }
        };
        Self { path, current }
    }

    async fn read(path: &Path) -> Result<Option<Theme>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(toml::from_str::<ThemeFile>(&content)?.theme)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Switch theme. Saved only when it changes.
    pub async fn set(&mut self, theme: Theme) -> Result<bool> {
        if theme == self.current {
            return Ok(false);
        }
        let content = toml::to_string(&ThemeFile { theme })?;
        super::write_atomic(&self.path, content.as_bytes()).await?;
        self.current = theme;
        log::debug!("Theme set to {}", theme);
        Ok(true)
    }

    pub async fn toggle(&mut self) -> Result<Theme> {
        let next = self.current.toggled();
        self.set(next).await?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg() {
        assert_eq!(theme_from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(theme_from_colorfgbg("0;default;15"), Some(Theme::Light));
        assert_eq!(theme_from_colorfgbg("0;7"), Some(Theme::Light));
        assert_eq!(theme_from_colorfgbg("garbage"), None);
        assert_eq!(theme_from_colorfgbg("0;200"), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_missing_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::load(dir.path().join("theme.toml"), Theme::Dark).await;
        assert_eq!(store.current(), Theme::Dark);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");

        let mut store = ThemeStore::load(&path, Theme::Light).await;
        assert!(!store.set(Theme::Light).await.unwrap());
        assert!(!path.exists());

        assert_eq!(store.toggle().await.unwrap(), Theme::Dark);
        let reloaded = ThemeStore::load(&path, Theme::Light).await;
        assert_eq!(reloaded.current(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");
        std::fs::write(&path, "theme = 42").unwrap();
        let store = ThemeStore::load(&path, Theme::Light).await;
        assert_eq!(store.current(), Theme::Light);
    }
}
