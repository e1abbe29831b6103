//! TOC generation for a whole game installation.
//!
//! # Generation Algorithm
//!
//! 1. Validate that `game_dir/BIOGame` exists.
//! 2. Plan one [`TocUnit`] for the content root, plus one per folder below
//!    `BIOGame/DLC` when the game keeps separate TOCs for its DLC.
//! 3. Run every unit on the rayon pool. Each unit discovers its files, resolves them
//!    into entries, lays them out in a [`BucketTable`], serializes the table and
//!    writes `PCConsoleTOC.bin` into its own directory.
//! 4. Join all units. A failed base game unit fails the whole run; failed DLC units
//!    are logged and reported as skipped.

use crate::discovery::{discover, list_subfolders};
use crate::error::{Error, Result};
use crate::format::serialize;
use crate::game::{MeGame, CONTENT_ROOT_NAME, DLC_FOLDER_NAME, TOC_FILE_NAME};
use crate::resolver::{resolve, UnitKind};
use crate::table::BucketTable;
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// One directory that receives its own `PCConsoleTOC.bin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocUnit {
    pub kind: UnitKind,
    pub dir: Utf8PathBuf,
}

impl TocUnit {
    pub fn base(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            kind: UnitKind::Base,
            dir: dir.into(),
        }
    }

    pub fn dlc(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            kind: UnitKind::Dlc,
            dir: dir.into(),
        }
    }

    /// Where this unit's TOC is written.
    pub fn output_path(&self) -> Utf8PathBuf {
        self.dir.join(TOC_FILE_NAME)
    }
}

/// Knobs for a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Compute every TOC but write nothing.
    pub dry_run: bool,
}

/// Result of a single unit that produced a TOC.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    pub unit: TocUnit,
    pub entry_count: usize,
    pub table_size: usize,
    /// Length of the serialized TOC.
    pub byte_len: usize,
    /// `false` for dry runs.
    pub written: bool,
    pub elapsed: Duration,
}

/// A DLC unit that produced no TOC, and why.
#[derive(Debug)]
pub struct SkippedUnit {
    pub unit: TocUnit,
    pub reason: Error,
}

/// Summary returned after [`generate_all`] completes.
#[derive(Debug)]
pub struct GenerationReport {
    pub game_dir: Utf8PathBuf,
    pub game: MeGame,
    pub base: UnitOutcome,
    pub dlc: Vec<UnitOutcome>,
    pub skipped: Vec<SkippedUnit>,
    /// Wall-clock time for the entire run.
    pub elapsed: Duration,
}

impl GenerationReport {
    /// Number of TOC files produced, base game included.
    pub fn toc_count(&self) -> usize {
        1 + self.dlc.len()
    }
}

/// Plan the units of work for a game installation.
pub fn plan_units(game_dir: &Utf8Path, game: MeGame) -> Result<Vec<TocUnit>> {
    let content_root = game_dir.join(CONTENT_ROOT_NAME);
    if !content_root.as_std_path().is_dir() {
        return Err(Error::UnsupportedRoot(format!(
            "{} has no {} folder",
            game_dir, CONTENT_ROOT_NAME
        )));
    }

    let mut units = vec![TocUnit::base(&content_root)];

    if game.layout().dlc_units {
        let dlc_dir = content_root.join(DLC_FOLDER_NAME);
        if dlc_dir.as_std_path().is_dir() {
            units.extend(list_subfolders(&dlc_dir)?.into_iter().map(TocUnit::dlc));
        } else {
            tracing::info!("DLC folder not detected, generating basegame TOC only");
        }
    }

    tracing::debug!("Planned {} TOC units for {}", units.len(), game_dir);
    Ok(units)
}

/// Generate the TOC of a single unit.
pub fn generate_unit(unit: &TocUnit, game: MeGame, options: GenerateOptions) -> Result<UnitOutcome> {
    let start = Instant::now();

    let files = discover(&unit.dir, game)?;
    let entries = resolve(files, &unit.dir, game, unit.kind)?;
    let table = BucketTable::build(entries);

    let bytes = serialize(&table)?.ok_or_else(|| Error::NoTocableFiles(unit.dir.clone()))?;

    let output_path = unit.output_path();
    if !options.dry_run {
        std::fs::write(output_path.as_std_path(), &bytes)?;
    }

    let outcome = UnitOutcome {
        unit: unit.clone(),
        entry_count: table.entry_count(),
        table_size: table.len(),
        byte_len: bytes.len(),
        written: !options.dry_run,
        elapsed: start.elapsed(),
    };

    tracing::info!(
        "TOC complete dst={} entries={} buckets={} bytes={} dry_run={} elapsed_ms={}",
        output_path,
        outcome.entry_count,
        outcome.table_size,
        outcome.byte_len,
        options.dry_run,
        outcome.elapsed.as_millis()
    );

    Ok(outcome)
}

/// Generate every TOC of a game installation.
///
/// Units run in parallel with no ordering between them. Only a base game failure
/// is returned as an error.
pub fn generate_all(
    game_dir: &Utf8Path,
    game: MeGame,
    options: GenerateOptions,
) -> Result<GenerationReport> {
    let start = Instant::now();
    tracing::info!("Generating TOCs for {} ({})", game_dir, game);

    let units = plan_units(game_dir, game)?;
    let results: Vec<(TocUnit, Result<UnitOutcome>)> = units
        .into_par_iter()
        .map(|unit| {
            let result = generate_unit(&unit, game, options);
            (unit, result)
        })
        .collect();

    let mut base = None;
    let mut dlc = Vec::new();
    let mut skipped = Vec::new();

    for (unit, result) in results {
        match (unit.kind, result) {
            (UnitKind::Base, Ok(outcome)) => base = Some(outcome),
            (UnitKind::Base, Err(e)) => return Err(e),
            (UnitKind::Dlc, Ok(outcome)) => dlc.push(outcome),
            (UnitKind::Dlc, Err(e)) => {
                if e.is_no_tocable_files() {
                    tracing::info!("No TOCable files in {}, may just be packed DLC", unit.dir);
                } else {
                    tracing::warn!("Failed to generate TOC for {}: {}", unit.dir, e);
                }
                skipped.push(SkippedUnit { unit, reason: e });
            }
        }
    }

    // The base unit is always planned first.
    let base = base.ok_or_else(|| Error::UnsupportedRoot(game_dir.to_string()))?;

    Ok(GenerationReport {
        game_dir: game_dir.to_path_buf(),
        game,
        base,
        dlc,
        skipped,
        elapsed: start.elapsed(),
    })
}
