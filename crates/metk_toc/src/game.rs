//! Supported game releases and the directory layout rules each one follows.
//!
//! Traversal and resolution never branch on the game directly. Instead every
//! [`MeGame`] maps to a small [`GameLayout`] table that the discovery and
//! resolver passes consume.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Name of the TOC file written into every indexed directory.
pub const TOC_FILE_NAME: &str = "PCConsoleTOC.bin";

/// Name of the content root folder (`<game>/BIOGame`).
pub const CONTENT_ROOT_NAME: &str = "BIOGame";

/// Folder below the content root that holds DLC folders.
pub const DLC_FOLDER_NAME: &str = "DLC";

/// Content root subfolders that are always descended into.
pub const ROOT_SUBFOLDERS: [&str; 2] = ["CookedPCConsole", "Movies"];

/// Platform-localization folder, only descended into via [`LOCALIZATION_SUBPATH`].
pub const LOCALIZATION_FOLDER: &str = "Content";

/// Sub-path below [`LOCALIZATION_FOLDER`] that holds the audio banks.
pub const LOCALIZATION_SUBPATH: [&str; 2] = ["Packages", "ISACT"];

/// Shader cache folder, relative to the game directory.
pub const SHADER_SUBPATH: [&str; 2] = ["Engine", "Shaders"];

/// Separator used for every path stored in a TOC.
pub const TOC_PATH_SEPARATOR: char = '\\';

/// File extensions the game expects to find in a TOC.
pub const TOCABLE_EXTENSIONS: [&str; 13] = [
    "pcc", "afc", "bik", "bin", "tlk", "cnd", "upk", "tfc", "isb", "usf", "txt", "ini", "dlc",
];

/// A supported game release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeGame {
    /// Original Mass Effect 3.
    Me3,
    /// Legendary Edition Mass Effect.
    Le1,
    /// Legendary Edition Mass Effect 2.
    Le2,
    /// Legendary Edition Mass Effect 3.
    Le3,
}

/// Per-game traversal and resolution rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLayout {
    /// Fold `BIOGame/DLC` into the base game pass.
    pub descend_dlc: bool,
    /// Append `Engine/Shaders` to the base game TOC.
    pub shader_folder: bool,
    /// Resolve DLC overrides by mount priority into the base game TOC.
    pub override_resolution: bool,
    /// Write a separate TOC into every DLC folder.
    pub dlc_units: bool,
}

impl MeGame {
    pub const ALL: [MeGame; 4] = [MeGame::Me3, MeGame::Le1, MeGame::Le2, MeGame::Le3];

    /// The layout rules for this game.
    pub const fn layout(self) -> GameLayout {
        match self {
            MeGame::Me3 => GameLayout {
                descend_dlc: false,
                shader_folder: false,
                override_resolution: false,
                dlc_units: true,
            },
            MeGame::Le1 => GameLayout {
                descend_dlc: false,
                shader_folder: true,
                override_resolution: true,
                dlc_units: false,
            },
            MeGame::Le2 | MeGame::Le3 => GameLayout {
                descend_dlc: true,
                shader_folder: true,
                override_resolution: false,
                dlc_units: true,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MeGame::Me3 => "ME3",
            MeGame::Le1 => "LE1",
            MeGame::Le2 => "LE2",
            MeGame::Le3 => "LE3",
        }
    }
}

impl fmt::Display for MeGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeGame {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeGame::ALL
            .into_iter()
            .find(|game| game.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnsupportedRoot(s.to_string()))
    }
}

/// Whether `name` is the TOC file itself (case-insensitive).
pub fn is_toc_file_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(TOC_FILE_NAME)
}

/// Whether `name` has one of the [`TOCABLE_EXTENSIONS`] and is not the TOC itself.
pub fn is_tocable_file_name(name: &str) -> bool {
    if is_toc_file_name(name) {
        return false;
    }
    let Some((_, extension)) = name.rsplit_once('.') else {
        return false;
    };
    TOCABLE_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game() {
        assert_eq!("le2".parse::<MeGame>().unwrap(), MeGame::Le2);
        assert_eq!("ME3".parse::<MeGame>().unwrap(), MeGame::Me3);
        assert!("ME1".parse::<MeGame>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for game in MeGame::ALL {
            assert_eq!(game.to_string().parse::<MeGame>().unwrap(), game);
        }
    }

    #[test]
    fn test_layouts() {
        assert!(!MeGame::Me3.layout().shader_folder);
        assert!(MeGame::Le1.layout().override_resolution);
        assert!(!MeGame::Le1.layout().dlc_units);
        assert!(MeGame::Le2.layout().descend_dlc);
        assert_eq!(MeGame::Le2.layout(), MeGame::Le3.layout());
        assert_eq!(
            MeGame::ALL
                .iter()
                .filter(|game| game.layout().descend_dlc)
                .count(),
            2
        );
    }

    #[test]
    fn test_tocable_file_names() {
        assert!(is_tocable_file_name("BIOGame_INT.tlk"));
        assert!(is_tocable_file_name("Startup.PCC"));
        assert!(is_tocable_file_name("Mount.dlc"));
        assert!(!is_tocable_file_name("Default.sfar"));
        assert!(!is_tocable_file_name("pcc"));
        assert!(!is_tocable_file_name("pcconsoletoc.BIN"));
    }
}
