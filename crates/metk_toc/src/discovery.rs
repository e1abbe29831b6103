//! TOCable file discovery.
//!
//! When the root being scanned is the content root (`BIOGame`), only a fixed set of
//! subfolders is visited:
//!
//! - `CookedPCConsole` and `Movies`, always
//! - `Content`, but only through `Content/Packages/ISACT`
//! - `DLC`, when the game's [`GameLayout`](crate::game::GameLayout) folds DLC into the base pass
//!
//! Any other root (a DLC folder, the shader cache) is walked unconditionally.
//!
//! Within each directory files come first, then subdirectories, both sorted by name,
//! so repeated scans of the same tree return the same order. Every file named
//! `PCConsoleTOC.bin` is left out.

use crate::error::Result;
use crate::game::{
    is_tocable_file_name, MeGame, CONTENT_ROOT_NAME, DLC_FOLDER_NAME, LOCALIZATION_FOLDER,
    LOCALIZATION_SUBPATH, ROOT_SUBFOLDERS,
};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Find every TOCable file below `root`, following the layout rules of `game`.
pub fn discover(root: &Utf8Path, game: MeGame) -> Result<Vec<Utf8PathBuf>> {
    if !is_content_root(root) {
        return walk_all(root);
    }

    let layout = game.layout();
    let mut files = Vec::new();
    let mut subfolders = Vec::new();

    for entry in sorted_walk(root).min_depth(1).max_depth(1) {
        let entry = entry?;
        let Some(path) = utf8_path(&entry) else {
            continue;
        };

        if entry.file_type().is_dir() {
            subfolders.push(path);
        } else if entry.file_type().is_file() && is_tocable_entry(&path) {
            files.push(path);
        }
    }

    for folder in subfolders {
        let Some(name) = folder.file_name() else {
            continue;
        };

        if ROOT_SUBFOLDERS.iter().any(|f| f.eq_ignore_ascii_case(name))
            || (layout.descend_dlc && name.eq_ignore_ascii_case(DLC_FOLDER_NAME))
        {
            files.extend(walk_all(&folder)?);
        } else if name.eq_ignore_ascii_case(LOCALIZATION_FOLDER) {
            let isact = LOCALIZATION_SUBPATH
                .iter()
                .fold(folder.clone(), |path, part| path.join(part));
            if isact.as_std_path().is_dir() {
                files.extend(walk_all(&isact)?);
            } else {
                tracing::debug!("No localization audio folder at {}", isact);
            }
        } else {
            tracing::trace!("Skipping content root folder {}", folder);
        }
    }

    Ok(files)
}

/// List the immediate subfolders of `dir`, sorted by name.
pub fn list_subfolders(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut folders = Vec::new();
    for entry in sorted_walk(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(path) = utf8_path(&entry) {
            folders.push(path);
        }
    }
    Ok(folders)
}

/// Whether `dir` is a content root, judged by its folder name.
pub fn is_content_root(dir: &Utf8Path) -> bool {
    dir.file_name()
        .is_some_and(|name| name.eq_ignore_ascii_case(CONTENT_ROOT_NAME))
}

/// Recursively collect every TOCable file below `dir`.
fn walk_all(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for entry in sorted_walk(dir).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = utf8_path(&entry) else {
            continue;
        };
        if is_tocable_entry(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

/// A walker that yields files before directories, each group sorted by name.
fn sorted_walk(dir: &Utf8Path) -> WalkDir {
    WalkDir::new(dir.as_std_path()).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    })
}

fn utf8_path(entry: &DirEntry) -> Option<Utf8PathBuf> {
    match Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) {
        Ok(path) => Some(path),
        Err(path) => {
            tracing::warn!("Skipping non-UTF-8 path: {}", path.display());
            None
        }
    }
}

fn is_tocable_entry(path: &Utf8Path) -> bool {
    path.file_name().is_some_and(is_tocable_file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Utf8Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn relative(root: &Utf8Path, files: &[Utf8PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().as_str().replace('\\', "/"))
            .collect()
    }

    fn create_game_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempdir().unwrap();
        let game_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let biogame = game_dir.join("BIOGame");

        touch(&biogame, "PCConsoleTOC.bin");
        touch(&biogame, "Readme.txt");
        touch(&biogame, "Default.sfar");
        touch(&biogame, "CookedPCConsole/Startup.pcc");
        touch(&biogame, "CookedPCConsole/Textures.tfc");
        touch(&biogame, "CookedPCConsole/Sub/Nested.upk");
        touch(&biogame, "Movies/Intro.bik");
        touch(&biogame, "Config/BioEngine.ini");
        touch(&biogame, "Content/Sounds.isb");
        touch(&biogame, "Content/Packages/ISACT/Wwise.isb");
        touch(&biogame, "DLC/DLC_CON_END/CookedPCConsole/Mount.dlc");
        touch(&biogame, "DLC/DLC_CON_END/PCConsoleTOC.bin");

        (dir, biogame)
    }

    #[test]
    fn test_content_root_rules() {
        let (_dir, biogame) = create_game_dir();
        let files = discover(&biogame, MeGame::Me3).unwrap();

        assert_eq!(
            relative(&biogame, &files),
            [
                "Readme.txt",
                "Content/Packages/ISACT/Wwise.isb",
                "CookedPCConsole/Startup.pcc",
                "CookedPCConsole/Textures.tfc",
                "CookedPCConsole/Sub/Nested.upk",
                "Movies/Intro.bik",
            ]
        );
    }

    #[test]
    fn test_dlc_folded_into_base_pass() {
        let (_dir, biogame) = create_game_dir();
        let files = discover(&biogame, MeGame::Le3).unwrap();
        let rel = relative(&biogame, &files);

        assert!(rel.contains(&"DLC/DLC_CON_END/CookedPCConsole/Mount.dlc".to_string()));
        assert!(!rel.iter().any(|f| f.ends_with("PCConsoleTOC.bin")));

        let le1 = relative(&biogame, &discover(&biogame, MeGame::Le1).unwrap());
        assert!(!le1.iter().any(|f| f.starts_with("DLC/")));
    }

    #[test]
    fn test_non_root_walks_everything() {
        let (_dir, biogame) = create_game_dir();
        let dlc = biogame.join("DLC").join("DLC_CON_END");
        touch(&dlc, "Movies/Extra.bik");
        touch(&dlc, "Anything/Deep/Loc_INT.tlk");

        let files = discover(&dlc, MeGame::Me3).unwrap();
        assert_eq!(
            relative(&dlc, &files),
            [
                "Anything/Deep/Loc_INT.tlk",
                "CookedPCConsole/Mount.dlc",
                "Movies/Extra.bik",
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = Utf8PathBuf::from_path_buf(dir.path().join("nope")).unwrap();
        assert!(discover(&missing, MeGame::Me3).is_err());
    }

    #[test]
    fn test_list_subfolders() {
        let (_dir, biogame) = create_game_dir();
        let folders = list_subfolders(&biogame).unwrap();
        assert_eq!(
            relative(&biogame, &folders),
            ["Config", "Content", "CookedPCConsole", "DLC", "Movies"]
        );
    }

    #[test]
    fn test_is_content_root() {
        assert!(is_content_root(Utf8Path::new("/games/ME3/BioGame")));
        assert!(!is_content_root(Utf8Path::new("/games/ME3/BIOGame/DLC")));
    }
}
