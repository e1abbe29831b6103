//! Turns discovered absolute paths into TOC entries.
//!
//! Two addressing modes exist:
//!
//! - **Base game**: paths are stored from the content root folder name onwards
//!   (`BIOGame\CookedPCConsole\Startup.pcc`). Legendary Edition games also index the
//!   `Engine/Shaders` folder next to the content root, which ends up stored as
//!   `Engine\Shaders\...` by the same prefix cut.
//! - **DLC**: paths are stored relative to the inside of the DLC folder
//!   (`CookedPCConsole\Startup_DLC_CON_END.pcc`).
//!
//! Games with mount priority overrides fold their DLC folders into the base game
//! TOC, highest priority first, keeping only the first file of every name.
//!
//! Sizes are always read from the absolute path on disk.

use crate::discovery::{discover, list_subfolders};
use crate::error::{Error, Result};
use crate::game::{
    MeGame, CONTENT_ROOT_NAME, DLC_FOLDER_NAME, SHADER_SUBPATH, TOC_PATH_SEPARATOR,
};
use crate::mount::read_mount_priority;
use crate::table::IndexEntry;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;

/// Which kind of directory a TOC is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// The game's content root (`BIOGame`).
    Base,
    /// A single DLC folder (`BIOGame/DLC/DLC_*`).
    Dlc,
}

/// Resolve discovered files below `root` into TOC entries.
///
/// Fails with [`Error::NoTocableFiles`] when `files` is empty.
pub fn resolve(
    files: Vec<Utf8PathBuf>,
    root: &Utf8Path,
    game: MeGame,
    kind: UnitKind,
) -> Result<Vec<IndexEntry>> {
    if files.is_empty() {
        return Err(Error::NoTocableFiles(root.to_path_buf()));
    }

    match kind {
        UnitKind::Base => resolve_base(files, root, game),
        UnitKind::Dlc => resolve_dlc(files, root),
    }
}

fn resolve_base(
    files: Vec<Utf8PathBuf>,
    root: &Utf8Path,
    game: MeGame,
) -> Result<Vec<IndexEntry>> {
    let layout = game.layout();

    let mut files = if layout.override_resolution {
        apply_mount_overrides(files, root, game)?
    } else {
        files
    };

    if layout.shader_folder {
        if let Some(game_dir) = root.parent() {
            let shaders = SHADER_SUBPATH
                .iter()
                .fold(game_dir.to_path_buf(), |path, part| path.join(part));
            if shaders.as_std_path().is_dir() {
                files.extend(discover(&shaders, game)?);
            } else {
                tracing::warn!("Shader folder not found, skipping: {}", shaders);
            }
        }
    }

    let prefix = anchor_prefix(root, CONTENT_ROOT_NAME)
        .or_else(|| root.parent().map(Utf8Path::as_str))
        .unwrap_or_default();

    files
        .iter()
        .map(|file| {
            let stored = strip_prefix(file, prefix)?;
            make_entry(file, to_toc_path(stored))
        })
        .collect()
}

fn resolve_dlc(files: Vec<Utf8PathBuf>, root: &Utf8Path) -> Result<Vec<IndexEntry>> {
    files
        .iter()
        .map(|file| {
            let inside = file
                .strip_prefix(root)
                .map_err(|_| Error::InvalidPath(file.to_string()))?;
            make_entry(file, to_toc_path(inside.as_str()))
        })
        .collect()
}

/// Order DLC files by mount priority and let them claim filenames ahead of the base game.
///
/// DLC folders without a declared mount priority are skipped. Base game files are
/// only kept when no DLC provides a file with the same name.
fn apply_mount_overrides(
    base_files: Vec<Utf8PathBuf>,
    root: &Utf8Path,
    game: MeGame,
) -> Result<Vec<Utf8PathBuf>> {
    let dlc_dir = root.join(DLC_FOLDER_NAME);
    let mut mounts = Vec::new();

    if dlc_dir.as_std_path().is_dir() {
        for folder in list_subfolders(&dlc_dir)? {
            match read_mount_priority(&folder)? {
                Some(priority) => mounts.push((priority, folder)),
                None => tracing::warn!("Skipping DLC without a mount priority: {}", folder),
            }
        }
    }

    // Stable sort: equal priorities keep folder name order.
    mounts.sort_by(|a, b| b.0.cmp(&a.0));

    let mut claimed = HashSet::new();
    let mut files = Vec::new();

    for (priority, folder) in &mounts {
        let dlc_files = discover(folder, game)?;
        tracing::debug!(
            "Mounting DLC {} (priority {}, {} files)",
            folder,
            priority,
            dlc_files.len()
        );
        for file in dlc_files {
            if claimed.insert(upper_file_name(&file)) {
                files.push(file);
            } else {
                tracing::trace!("Overridden by higher priority DLC: {}", file);
            }
        }
    }

    let before = files.len();
    files.extend(
        base_files
            .into_iter()
            .filter(|file| !claimed.contains(&upper_file_name(file))),
    );

    tracing::info!(
        "Resolved {} DLC mounts: {} DLC files, {} base game files",
        mounts.len(),
        before,
        files.len() - before
    );

    Ok(files)
}

/// Everything in `root` before the first case-insensitive occurrence of `anchor`.
fn anchor_prefix<'a>(root: &'a Utf8Path, anchor: &str) -> Option<&'a str> {
    let position = root
        .as_str()
        .to_ascii_uppercase()
        .find(&anchor.to_ascii_uppercase())?;
    Some(&root.as_str()[..position])
}

fn strip_prefix<'a>(file: &'a Utf8Path, prefix: &str) -> Result<&'a str> {
    file.as_str()
        .strip_prefix(prefix)
        .ok_or_else(|| Error::InvalidPath(file.to_string()))
}

fn to_toc_path(path: &str) -> String {
    path.trim_start_matches(['/', '\\'])
        .replace('/', &TOC_PATH_SEPARATOR.to_string())
}

fn upper_file_name(path: &Utf8Path) -> String {
    path.file_name().unwrap_or_default().to_uppercase()
}

fn make_entry(file: &Utf8Path, stored: String) -> Result<IndexEntry> {
    let size = std::fs::metadata(file.as_std_path())?.len();
    let size = u32::try_from(size).map_err(|_| Error::FileTooLarge {
        path: file.to_path_buf(),
        size,
    })?;
    Ok(IndexEntry::new(stored, size))
}
