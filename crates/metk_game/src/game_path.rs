//! Mass Effect path detection and validation utilities.

use camino::{Utf8Path, Utf8PathBuf};
use metk_toc::game::CONTENT_ROOT_NAME;
use metk_toc::{Error, MeGame, Result};
use sysinfo::{Disks, System};

const BINARIES_FOLDER: &str = "Binaries";
const LEGACY_PLATFORM_FOLDER: &str = "Win32";

const ME3_REGISTRY_KEY: &str = "HKLM\\SOFTWARE\\Wow6432Node\\BioWare\\Mass Effect 3";

/// The Legendary Edition installer writes its key with a mis-encoded trademark sign
/// on some systems.
const LE_REGISTRY_KEYS: [&str; 3] = [
    "HKLM\\SOFTWARE\\BioWare\\Mass Effect\u{e2}\u{201e}\u{a2} Legendary Edition",
    "HKLM\\SOFTWARE\\BioWare\\Mass Effect\u{2122} Legendary Edition",
    "HKLM\\SOFTWARE\\BioWare\\Mass Effect Legendary Edition",
];

const INSTALL_DIR_VALUE: &str = "Install Dir";

/// Validates if a directory looks like a game directory (it contains `BIOGame`).
pub fn is_valid_game_dir(dir: &Utf8Path) -> bool {
    dir.join(CONTENT_ROOT_NAME).as_std_path().is_dir()
}

fn executable_name(game: MeGame) -> &'static str {
    match game {
        MeGame::Le1 => "MassEffect1.exe",
        MeGame::Le2 => "MassEffect2.exe",
        MeGame::Me3 | MeGame::Le3 => "MassEffect3.exe",
    }
}

/// Subfolder of the Legendary Edition install holding one game.
fn legendary_subfolder(game: MeGame) -> Option<&'static str> {
    match game {
        MeGame::Me3 => None,
        MeGame::Le1 => Some("ME1"),
        MeGame::Le2 => Some("ME2"),
        MeGame::Le3 => Some("ME3"),
    }
}

/// Resolve a game executable into its game directory and game.
///
/// The game directory is everything before the last `Binaries` folder of the path.
/// `MassEffect3.exe` is shared by the original Mass Effect 3 and its Legendary
/// Edition remaster; the original ships a 32-bit build under `Binaries/Win32`.
pub fn game_from_executable(path: &Utf8Path) -> Result<(Utf8PathBuf, MeGame)> {
    if !path.as_std_path().is_file() {
        return Err(Error::UnsupportedRoot(format!(
            "Executable file not found: {}",
            path
        )));
    }

    let file_name = path.file_name().unwrap_or_default();
    let game = if file_name.eq_ignore_ascii_case(executable_name(MeGame::Le1)) {
        MeGame::Le1
    } else if file_name.eq_ignore_ascii_case(executable_name(MeGame::Le2)) {
        MeGame::Le2
    } else if file_name.eq_ignore_ascii_case(executable_name(MeGame::Me3)) {
        let platform = path.parent().and_then(Utf8Path::file_name);
        if platform.is_some_and(|p| p.eq_ignore_ascii_case(LEGACY_PLATFORM_FOLDER)) {
            MeGame::Me3
        } else {
            MeGame::Le3
        }
    } else {
        return Err(Error::UnsupportedRoot(format!(
            "Executable file is not a supported Mass Effect game: {}",
            path
        )));
    };

    let game_dir = path
        .ancestors()
        .find(|dir| {
            dir.file_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(BINARIES_FOLDER))
        })
        .and_then(Utf8Path::parent)
        .ok_or_else(|| {
            Error::UnsupportedRoot(format!(
                "Executable is not inside a {} folder: {}",
                BINARIES_FOLDER, path
            ))
        })?;

    Ok((game_dir.to_path_buf(), game))
}

/// Detect a game directory from the Windows Registry.
///
/// Always `None` on other platforms.
pub fn game_from_registry(game: MeGame) -> Option<Utf8PathBuf> {
    match legendary_subfolder(game) {
        None => query_install_dir(ME3_REGISTRY_KEY),
        Some(subfolder) => LE_REGISTRY_KEYS
            .iter()
            .find_map(|key| query_install_dir(key))
            .map(|install_dir| install_dir.join("Game").join(subfolder)),
    }
}

fn query_install_dir(key: &str) -> Option<Utf8PathBuf> {
    if cfg!(not(target_os = "windows")) {
        return None;
    }

    let output = std::process::Command::new("reg")
        .args(["query", key, "/v", INSTALL_DIR_VALUE])
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!("Registry key not found: {}", key);
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_reg_value(&stdout, INSTALL_DIR_VALUE)
}

/// Extract a `REG_SZ` value from `reg query` output.
fn parse_reg_value(output: &str, value: &str) -> Option<Utf8PathBuf> {
    output.lines().find_map(|line| {
        let rest = line.trim().strip_prefix(value)?;
        let (_, data) = rest.split_once("REG_SZ")?;
        let data = data.trim();
        (!data.is_empty()).then(|| Utf8PathBuf::from(data))
    })
}

/// Get all available drives using sysinfo (cross-platform).
fn get_available_drives() -> Vec<String> {
    let disks = Disks::new_with_refreshed_list();

    let mut drives: Vec<String> = disks
        .iter()
        .filter_map(|disk| disk.mount_point().to_str().map(|s| s.to_string()))
        .collect();

    if drives.is_empty() && cfg!(target_os = "windows") {
        drives = ["C:", "D:", "E:", "F:"].into_iter().map(String::from).collect();
    }

    drives
}

/// Detect a game from a running game process.
fn detect_from_running_process(game: MeGame) -> Option<Utf8PathBuf> {
    let system = System::new_all();

    let found = system
        .processes_by_name(executable_name(game).as_ref())
        .filter_map(|process| {
            process
                .exe()
                .and_then(|p| Utf8PathBuf::from_path_buf(p.to_path_buf()).ok())
        })
        .filter_map(|exe| game_from_executable(&exe).ok())
        .find(|(_, found)| *found == game)
        .map(|(game_dir, _)| game_dir);
    found
}

/// Store install locations relative to a drive root.
fn common_install_dirs(game: MeGame) -> Vec<Utf8PathBuf> {
    const STORE_ROOTS: [&str; 5] = [
        "Program Files (x86)/Origin Games",
        "Program Files/EA Games",
        "Origin Games",
        "Program Files (x86)/Steam/steamapps/common",
        "SteamLibrary/steamapps/common",
    ];

    STORE_ROOTS
        .iter()
        .map(|root| match legendary_subfolder(game) {
            None => Utf8PathBuf::from(root).join("Mass Effect 3"),
            Some(subfolder) => Utf8PathBuf::from(root)
                .join("Mass Effect Legendary Edition")
                .join("Game")
                .join(subfolder),
        })
        .collect()
}

/// Check common installation paths on all available drives.
fn detect_from_common_paths(game: MeGame) -> Option<Utf8PathBuf> {
    let relative_dirs = common_install_dirs(game);

    get_available_drives()
        .iter()
        .flat_map(|drive| {
            let drive_root = Utf8PathBuf::from(drive.trim_end_matches(['\\', '/']));
            relative_dirs
                .iter()
                .map(move |dir| drive_root.join(dir))
                .collect::<Vec<_>>()
        })
        .find(|dir| is_valid_game_dir(dir))
}

/// Auto-detect a game installation.
///
/// Detection methods (in order of reliability):
/// 1. Windows Registry
/// 2. Running game process
/// 3. Common installation paths
pub fn auto_detect_game_dir(game: MeGame) -> Option<Utf8PathBuf> {
    let detected = game_from_registry(game)
        .filter(|dir| is_valid_game_dir(dir))
        .or_else(|| detect_from_running_process(game))
        .or_else(|| detect_from_common_paths(game));

    match &detected {
        Some(dir) => tracing::debug!("Detected {} at {}", game, dir),
        None => tracing::debug!("Could not detect {}", game),
    }
    detected
}
