// Thu Oct 15 2026 - Alex

use crate::symbol::error::SymbolError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Reads raw symbol listings and records every decorated name to a scratch
/// file for the name decoder.
pub struct RawSymbolReader {
    scratch_path: PathBuf,
}

impl RawSymbolReader {
    pub fn new<P: AsRef<Path>>(scratch_path: P) -> Self {
        Self {
            scratch_path: scratch_path.as_ref().to_path_buf(),
        }
    }

    /// Reads every input in order, keeping duplicates, then writes the
    /// scratch file. Nothing is written if any input is unreadable.
    pub fn read_all(&self, inputs: &[PathBuf]) -> Result<Vec<String>, SymbolError> {
        let mut symbols = Vec::new();

        for path in inputs {
            let before = symbols.len();
            read_symbol_list(path, &mut symbols)?;
            log::debug!("{}: {} symbols", path.display(), symbols.len() - before);
        }

        self.write_scratch(&symbols)?;
        Ok(symbols)
    }

    fn write_scratch(&self, symbols: &[String]) -> Result<(), SymbolError> {
        let scratch_err = |source| SymbolError::ScratchWrite {
            path: self.scratch_path.clone(),
            source,
        };

        let file = File::create(&self.scratch_path).map_err(scratch_err)?;
        let mut writer = BufWriter::new(file);
        for symbol in symbols {
            writeln!(writer, "{}", symbol).map_err(scratch_err)?;
        }
        writer.flush().map_err(scratch_err)
    }
}

/// Appends the first whitespace-delimited token of each non-empty line.
pub fn read_symbol_list(path: &Path, out: &mut Vec<String>) -> Result<(), SymbolError> {
    let input_err = |source| SymbolError::UnreadableInput {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(input_err)?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(input_err)?;
        if let Some(token) = first_token(&line) {
            out.push(token.to_string());
        }
    }

    Ok(())
}

pub fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}
