// Thu Oct 15 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("Cannot read symbol list {path}: {source}")]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot write scratch file {path}: {source}")]
    ScratchWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with code {code}")]
    ToolFailed { tool: String, code: i32 },
    #[error("Decoder returned {decoded} names for {requested} symbols")]
    CardinalityMismatch { requested: usize, decoded: usize },
    #[error("Cannot parse library {path}: {reason}")]
    LibraryParse { path: PathBuf, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SymbolError {
    /// Exit code reported by a failing external tool, if this error came from one.
    pub fn tool_exit_code(&self) -> Option<i32> {
        match self {
            SymbolError::ToolFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}
