use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Could not find a {game} installation")]
    #[diagnostic(
        code(game::not_detected),
        help("Pass the game executable, or store the game directory with 'autotoc config set-path <game> <dir>'")
    )]
    GameNotDetected { game: String },

    #[error("Not a game directory: {path}")]
    #[diagnostic(
        code(game::invalid_dir),
        help("The game directory is the folder containing BIOGame (e.g. ...\\Mass Effect Legendary Edition\\Game\\ME2)")
    )]
    InvalidGameDir { path: Utf8PathBuf },

    #[error("There are no TOCable files in {path}")]
    #[diagnostic(
        code(toc::no_tocable_files),
        help("The base game TOC needs at least one .pcc, .tfc, .afc, .bik, .tlk or similar file")
    )]
    NoTocableFiles { path: Utf8PathBuf },

    #[error("TOC operation failed")]
    #[diagnostic(code(toc::operation_failed))]
    Toc {
        #[source]
        source: metk_toc::Error,
    },

    #[error("Failed to save config file")]
    #[diagnostic(
        code(config::save_failed),
        help("Check file permissions of the folder containing autotoc")
    )]
    ConfigSaveFailed {
        #[source]
        source: std::io::Error,
    },
}

impl From<metk_toc::Error> for CliError {
    fn from(source: metk_toc::Error) -> Self {
        match source {
            metk_toc::Error::NoTocableFiles(path) => Self::NoTocableFiles { path },
            source => Self::Toc { source },
        }
    }
}

impl CliError {
    pub fn game_not_detected(game: metk_toc::MeGame) -> Self {
        Self::GameNotDetected {
            game: game.to_string(),
        }
    }

    pub fn invalid_game_dir(path: Utf8PathBuf) -> Self {
        Self::InvalidGameDir { path }
    }

    pub fn config_save_failed(source: std::io::Error) -> Self {
        Self::ConfigSaveFailed { source }
    }
}
