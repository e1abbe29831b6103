//! Application configuration management utilities.

use camino::{Utf8Path, Utf8PathBuf};
use metk_toc::MeGame;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;

/// Application-wide configuration stored in config.toml.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub me3_path: Option<Utf8PathBuf>,
    pub le1_path: Option<Utf8PathBuf>,
    pub le2_path: Option<Utf8PathBuf>,
    pub le3_path: Option<Utf8PathBuf>,
}

impl AppConfig {
    /// The stored game directory of `game`.
    pub fn game_path(&self, game: MeGame) -> Option<&Utf8PathBuf> {
        match game {
            MeGame::Me3 => self.me3_path.as_ref(),
            MeGame::Le1 => self.le1_path.as_ref(),
            MeGame::Le2 => self.le2_path.as_ref(),
            MeGame::Le3 => self.le3_path.as_ref(),
        }
    }

    pub fn set_game_path(&mut self, game: MeGame, path: Option<Utf8PathBuf>) {
        let slot = match game {
            MeGame::Me3 => &mut self.me3_path,
            MeGame::Le1 => &mut self.le1_path,
            MeGame::Le2 => &mut self.le2_path,
            MeGame::Le3 => &mut self.le3_path,
        };
        *slot = path;
    }
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (config.toml next to the executable).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the application configuration from config.toml.
/// Returns default configuration if file doesn't exist or cannot be parsed.
pub fn load_config() -> AppConfig {
    default_config_path()
        .map(|path| load_config_from(&path))
        .unwrap_or_default()
}

pub fn load_config_from(path: &Utf8Path) -> AppConfig {
    let Ok(content) = fs::read_to_string(path.as_std_path()) else {
        return AppConfig::default();
    };

    match toml::from_str(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Ignoring malformed config file {}: {}", path, e);
            AppConfig::default()
        }
    }
}

/// Saves the application configuration to config.toml.
pub fn save_config(cfg: &AppConfig) -> io::Result<()> {
    let path = default_config_path().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine config path")
    })?;
    save_config_to(&path, cfg)
}

pub fn save_config_to(path: &Utf8Path, cfg: &AppConfig) -> io::Result<()> {
    let content = toml::to_string_pretty(cfg).map_err(io::Error::other)?;
    fs::write(path.as_std_path(), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_file() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("config.toml")).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_is_default() {
        let (_dir, path) = config_file();
        assert_eq!(load_config_from(&path), AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_default() {
        let (_dir, path) = config_file();
        fs::write(&path, "le2_path = [not a path").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, path) = config_file();
        let mut cfg = AppConfig::default();
        cfg.set_game_path(
            MeGame::Le2,
            Some(Utf8PathBuf::from("D:/Games/Mass Effect Legendary Edition/Game/ME2")),
        );
        save_config_to(&path, &cfg).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("le2_path"));

        let loaded = load_config_from(&path);
        assert_eq!(loaded, cfg);
        assert_eq!(
            loaded.game_path(MeGame::Le2).map(|p| p.as_str()),
            Some("D:/Games/Mass Effect Legendary Edition/Game/ME2")
        );
        assert_eq!(loaded.game_path(MeGame::Me3), None);
    }

    #[test]
    fn test_clear_game_path() {
        let mut cfg = AppConfig {
            me3_path: Some(Utf8PathBuf::from("C:/ME3")),
            ..Default::default()
        };
        cfg.set_game_path(MeGame::Me3, None);
        assert_eq!(cfg, AppConfig::default());
    }
}
