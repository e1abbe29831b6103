//! Mass Effect installation detection and validation.
//!
//! Shared by the `autotoc` CLI to turn an executable path, a registry entry or a
//! well-known install location into a game directory and its [`MeGame`](metk_toc::MeGame).

mod game_path;

pub use game_path::{
    auto_detect_game_dir, game_from_executable, game_from_registry, is_valid_game_dir,
};
