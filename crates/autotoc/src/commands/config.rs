use crate::errors::CliError;
use crate::utils::config::{self, AppConfig};
use camino::Utf8PathBuf;
use colored::Colorize;
use metk_game::is_valid_game_dir;
use metk_toc::MeGame;
use miette::Result;

/// Print a config path entry with status indicator
fn print_path_config(name: &str, path: Option<&Utf8PathBuf>) {
    match path {
        Some(p) => {
            let status = if is_valid_game_dir(p) {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println!("  {} {} {}", format!("{}:", name).bright_white(), p, status);
        }
        None => {
            println!(
                "  {} {}",
                format!("{}:", name).bright_white(),
                "(not set)".bright_yellow()
            );
        }
    }
}

pub fn show_config() -> Result<()> {
    let cfg = config::load_config();
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);

    for game in MeGame::ALL {
        let name = format!("{}_path", game.as_str().to_ascii_lowercase());
        print_path_config(&name, cfg.game_path(game));
    }

    println!();
    Ok(())
}

pub fn set_game_path(game: MeGame, path: String) -> Result<()> {
    let path = Utf8PathBuf::from(path);
    if !is_valid_game_dir(&path) {
        eprintln!(
            "  {}",
            "The path must point to the game directory containing the BIOGame folder."
                .bright_yellow()
        );
        eprintln!(
            "  {}",
            "Example: D:\\Games\\Mass Effect Legendary Edition\\Game\\ME2".bright_yellow()
        );
        return Err(CliError::invalid_game_dir(path).into());
    }

    let mut cfg = config::load_config();
    cfg.set_game_path(game, Some(path.clone()));
    config::save_config(&cfg).map_err(CliError::config_save_failed)?;

    println!(
        "{}",
        "✓ Configuration updated successfully!"
            .bright_green()
            .bold()
    );
    println!();
    println!(
        "  {} {}",
        format!("{}:", game).bright_white().bold(),
        path.as_str().bright_green()
    );

    Ok(())
}

pub fn reset_config() -> Result<()> {
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    config::save_config(&AppConfig::default()).map_err(CliError::config_save_failed)?;

    println!(
        "{}",
        "✓ Configuration reset to defaults".bright_green().bold()
    );
    println!();
    println!("  {} {}", "Config file:".bright_white().bold(), config_path);
    println!();
    println!(
        "  {}",
        "Run 'autotoc config set-path <game> <dir>' to store a game directory".bright_cyan()
    );

    Ok(())
}
