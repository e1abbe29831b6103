pub mod config;
mod info;
mod toc;

pub use info::{info_toc_file, InfoTocFileArgs};
pub use toc::{generate_tocs, GenerateTocsArgs};
