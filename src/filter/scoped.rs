// Fri Oct 16 2026 - Alex

use crate::error::DefError;
use crate::filter::catalog::SymbolCatalog;
use crate::filter::rules::combine;
use crate::symbol::LibrarySymbolReader;
use rayon::prelude::*;
use std::path::PathBuf;

/// Symbols one catalog section selected from one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedSymbols {
    pub library: PathBuf,
    pub section: String,
    pub symbols: Vec<String>,
}

/// Applies each sub-library's allowlist to that library's own symbol table.
pub struct LibraryScopedSelector<'a> {
    catalog: &'a SymbolCatalog,
    reader: &'a dyn LibrarySymbolReader,
    parallel: bool,
}

impl<'a> LibraryScopedSelector<'a> {
    pub fn new(catalog: &'a SymbolCatalog, reader: &'a dyn LibrarySymbolReader) -> Self {
        Self {
            catalog,
            reader,
            parallel: true,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Results come back in library order and, per library, catalog order,
    /// whether or not the scan ran in parallel.
    pub fn select(&self, libraries: &[PathBuf]) -> Result<Vec<ScopedSymbols>, DefError> {
        let per_library: Vec<Vec<ScopedSymbols>> = if self.parallel {
            libraries
                .par_iter()
                .map(|library| self.select_one(library))
                .collect::<Result<_, _>>()?
        } else {
            libraries
                .iter()
                .map(|library| self.select_one(library))
                .collect::<Result<_, _>>()?
        };

        Ok(per_library.into_iter().flatten().collect())
    }

    fn select_one(&self, library: &PathBuf) -> Result<Vec<ScopedSymbols>, DefError> {
        let path = library.to_string_lossy();
        let mut selected = Vec::new();

        for (section, patterns) in self.catalog.sections_for(&path) {
            let filter = match combine(patterns) {
                Ok(Some(filter)) => filter,
                Ok(None) => {
                    log::debug!("[{}] has no patterns, skipping {}", section, path);
                    continue;
                }
                Err(source) => {
                    return Err(DefError::CatalogPattern {
                        section: section.to_string(),
                        source,
                    })
                }
            };

            let symbols = self.reader.read_symbols(library, &filter)?;
            log::info!("[{}] {} symbols from {} via {}", section, symbols.len(), path, self.reader.name());

            selected.push(ScopedSymbols {
                library: library.clone(),
                section: section.to_string(),
                symbols,
            });
        }

        if selected.is_empty() {
            log::debug!("{} matches no catalog section", path);
        }

        Ok(selected)
    }
}
