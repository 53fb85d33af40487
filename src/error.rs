// Fri Oct 16 2026 - Alex

use crate::symbol::SymbolError;
use crate::utils::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefError {
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot read symbol catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid pattern in catalog section [{section}]: {source}")]
    CatalogPattern {
        section: String,
        #[source]
        source: regex::Error,
    },
    #[error("Cannot write export listing {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Exit status for a command line that does not describe a runnable job.
pub const USAGE_EXIT_CODE: u8 = 2;

impl DefError {
    /// Process exit status for this failure. A failing decoder or dump tool
    /// hands its own exit code through, clamped to 1..=255.
    pub fn exit_code(&self) -> u8 {
        match self {
            DefError::Symbol(e) => e
                .tool_exit_code()
                .map_or(1, |code| code.clamp(1, 255) as u8),
            _ => 1,
        }
    }
}
