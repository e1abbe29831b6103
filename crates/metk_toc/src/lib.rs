//! `PCConsoleTOC.bin` generation for Mass Effect 3 and the Mass Effect Legendary Edition.
//!
//! The games only load files that are listed, with their size, in a table of
//! contents next to the content. This crate rebuilds those tables from what is on
//! disk:
//!
//! - **Discovery**: per-game layout rules decide which folders and extensions count
//! - **Resolution**: absolute paths become stored TOC paths, with LE1 DLC mount
//!   priority overrides folded into the base game
//! - **Bucket table**: an adaptively sized hash table keyed on the uppercased filename
//! - **Serialization**: the exact binary layout, including the TOC's own size
//! - **Reading**: existing TOC files parsed back for inspection
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use metk_toc::{generate_all, GenerateOptions, MeGame};
//!
//! # fn main() -> metk_toc::Result<()> {
//! let game_dir = Utf8Path::new("D:/Games/Mass Effect Legendary Edition/Game/ME2");
//! let report = generate_all(game_dir, MeGame::Le2, GenerateOptions::default())?;
//! println!(
//!     "Wrote {} TOCs, skipped {} DLC folders",
//!     report.toc_count(),
//!     report.skipped.len()
//! );
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod format;
pub mod game;
pub mod generator;
pub mod hash;
pub mod mount;
pub mod resolver;
pub mod table;

pub use error::{Error, Result};
pub use format::{serialize, TocFile, TocHeader};
pub use game::{GameLayout, MeGame};
pub use generator::{
    generate_all, generate_unit, plan_units, GenerateOptions, GenerationReport, SkippedUnit,
    TocUnit, UnitOutcome,
};
pub use resolver::UnitKind;
pub use table::{BucketTable, IndexEntry};
