//! DLC mount priority lookup.
//!
//! Legendary Edition Mass Effect declares each DLC's mount priority in
//! `AutoLoad.ini`:
//!
//! ```ini
//! [ME1DLCMOUNT]
//! ModName=Example Mod
//! ModMount=4500
//! ```

use crate::error::Result;
use camino::Utf8Path;
use std::io;

/// File holding the mount priority, directly inside a DLC folder.
pub const MOUNT_FILE_NAME: &str = "AutoLoad.ini";

const MOUNT_SECTION: &str = "ME1DLCMOUNT";
const MOUNT_KEY: &str = "ModMount";

/// Read the mount priority of a DLC folder.
///
/// Returns `Ok(None)` when the folder has no `AutoLoad.ini` or the file does not
/// declare a usable priority. Mod tools often save the file in a legacy code page,
/// so it is decoded lossily.
pub fn read_mount_priority(dlc_dir: &Utf8Path) -> Result<Option<i32>> {
    let path = dlc_dir.join(MOUNT_FILE_NAME);
    let bytes = match std::fs::read(path.as_std_path()) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let priority = parse_mount_priority(&String::from_utf8_lossy(&bytes));
    if priority.is_none() {
        tracing::warn!("No {}/{} value in {}", MOUNT_SECTION, MOUNT_KEY, path);
    }
    Ok(priority)
}

/// Extract `[ME1DLCMOUNT] ModMount` from ini text.
pub fn parse_mount_priority(contents: &str) -> Option<i32> {
    let mut in_section = false;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = section.trim().eq_ignore_ascii_case(MOUNT_SECTION);
            continue;
        }

        if !in_section {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case(MOUNT_KEY) {
            return value.trim().parse().ok();
        }
    }

    None
}
