use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use commands::{generate_tocs, info_toc_file, GenerateTocsArgs, InfoTocFileArgs};
use metk_toc::MeGame;
use miette::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate PCConsoleTOC.bin files for a game installation
    Toc {
        /// The game executable (e.g. ...\Game\ME3\Binaries\Win64\MassEffect3.exe) or game directory
        path: Option<String>,

        /// The game to generate for when PATH is a directory or omitted
        #[arg(short, long, value_enum)]
        game: Option<GameArg>,

        /// Detect the game directory from the Windows Registry
        #[arg(short, long, conflicts_with = "path")]
        registry: bool,

        /// Compute every TOC without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the contents of a PCConsoleTOC.bin file
    Info {
        /// The path to the TOC file
        file_path: String,
    },
    /// Manage the stored game paths
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Store the game directory of a game
    SetPath {
        #[arg(value_enum)]
        game: GameArg,
        /// The game directory (the folder containing BIOGame)
        path: String,
    },
    /// Reset the configuration to defaults
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameArg {
    Me3,
    Le1,
    Le2,
    Le3,
}

impl From<GameArg> for MeGame {
    fn from(game: GameArg) -> Self {
        match game {
            GameArg::Me3 => MeGame::Me3,
            GameArg::Le1 => MeGame::Le1,
            GameArg::Le2 => MeGame::Le2,
            GameArg::Le3 => MeGame::Le3,
        }
    }
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "autotoc=info,metk_toc=info,metk_game=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let args = parse_args();

    match args.command {
        Commands::Toc {
            path,
            game,
            registry,
            dry_run,
        } => generate_tocs(GenerateTocsArgs {
            path,
            game: game.map(MeGame::from),
            registry,
            dry_run,
        }),
        Commands::Info { file_path } => info_toc_file(InfoTocFileArgs { file_path }),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show_config(),
            ConfigCommands::SetPath { game, path } => {
                commands::config::set_game_path(game.into(), path)
            }
            ConfigCommands::Reset => commands::config::reset_config(),
        },
    }
}
