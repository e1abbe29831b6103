use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config;
use crate::utils::format_size;
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use metk_game::{auto_detect_game_dir, game_from_executable, game_from_registry, is_valid_game_dir};
use metk_toc::{generate_all, GenerateOptions, GenerationReport, MeGame, UnitOutcome};
use miette::Result;

pub struct GenerateTocsArgs {
    pub path: Option<String>,
    pub game: Option<MeGame>,
    pub registry: bool,
    pub dry_run: bool,
}

/// The game assumed when neither an executable nor `--game` says otherwise.
const DEFAULT_GAME: MeGame = MeGame::Me3;

pub fn generate_tocs(args: GenerateTocsArgs) -> Result<()> {
    let (game_dir, game) = resolve_target(&args)?;

    if !is_valid_game_dir(&game_dir) {
        return Err(CliError::invalid_game_dir(game_dir).into());
    }

    println!(
        "{} {} {}",
        "📚 Generating TOCs for".bright_blue().bold(),
        game_dir.as_str().bright_cyan().bold(),
        format!("({})", game).dimmed()
    );

    let report = generate_all(
        &game_dir,
        game,
        GenerateOptions {
            dry_run: args.dry_run,
        },
    )
    .map_err(CliError::from)?;

    print_report(&report, args.dry_run);
    Ok(())
}

fn resolve_target(args: &GenerateTocsArgs) -> Result<(Utf8PathBuf, MeGame)> {
    let requested = args.game.unwrap_or(DEFAULT_GAME);

    if args.registry {
        let game_dir =
            game_from_registry(requested).ok_or_else(|| CliError::game_not_detected(requested))?;
        println!("{}", "Game location detected in registry".bright_green());
        return Ok((game_dir, requested));
    }

    if let Some(path) = &args.path {
        let path = Utf8Path::new(path);
        let is_exe = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
        if !is_exe {
            return Ok((path.to_path_buf(), requested));
        }

        let (game_dir, game) = game_from_executable(path).map_err(CliError::from)?;
        if args.game.is_some_and(|g| g != game) {
            tracing::warn!("{} belongs to {}, ignoring --game {}", path, game, requested);
        }
        return Ok((game_dir, game));
    }

    let cfg = config::load_config();
    if let Some(game_dir) = cfg.game_path(requested) {
        tracing::debug!("Using configured {} path {}", requested, game_dir);
        return Ok((game_dir.clone(), requested));
    }

    let game_dir =
        auto_detect_game_dir(requested).ok_or_else(|| CliError::game_not_detected(requested))?;
    Ok((game_dir, requested))
}

fn print_unit(outcome: &UnitOutcome) {
    println_pad!(
        "{} {} {}",
        "•".bright_cyan(),
        outcome.unit.output_path().as_str().bright_white(),
        format!(
            "({} files, {} buckets, {})",
            outcome.entry_count,
            outcome.table_size,
            format_size(outcome.byte_len as u64)
        )
        .dimmed()
    );
}

fn print_report(report: &GenerationReport, dry_run: bool) {
    println!();
    print_unit(&report.base);
    for outcome in &report.dlc {
        print_unit(outcome);
    }

    for skipped in &report.skipped {
        let reason = if skipped.reason.is_no_tocable_files() {
            "no TOCable files, may just be packed DLC".to_string()
        } else {
            skipped.reason.to_string()
        };
        println_pad!(
            "{} {} {}",
            "•".bright_yellow(),
            skipped.unit.dir.as_str().bright_yellow(),
            format!("(skipped: {})", reason).dimmed()
        );
    }

    println!();
    let verb = if dry_run { "Computed" } else { "Wrote" };
    println!(
        "{} {} {} in {:.2}s",
        "✓".bright_green().bold(),
        format!("{} {} TOC files", verb, report.toc_count())
            .bright_green()
            .bold(),
        if dry_run {
            "(dry run, nothing written)".dimmed().to_string()
        } else {
            String::new()
        },
        report.elapsed.as_secs_f64()
    );
}
