// Sat Oct 17 2026 - Alex

use crate::error::DefError;
use crate::filter::dedup::TakenSet;
use crate::filter::rules::SymbolKind;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const DATA_MARKER: &str = " DATA";

/// Module-definition listing under construction. Owns the taken set, so a
/// symbol offered through any of the three blocks lands in the file once.
#[derive(Debug, Default)]
pub struct ExportListing {
    target: Option<String>,
    curated: Vec<String>,
    classified: Vec<(String, SymbolKind)>,
    scoped: Vec<String>,
    taken: TakenSet,
}

impl ExportListing {
    pub fn new(target: Option<String>) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn taken(&self) -> &TakenSet {
        &self.taken
    }

    pub fn taken_mut(&mut self) -> &mut TakenSet {
        &mut self.taken
    }

    pub fn add_curated(&mut self, decorated: &str) -> bool {
        let added = self.taken.take(decorated);
        if added {
            self.curated.push(decorated.to_string());
        }
        added
    }

    pub fn add_classified(&mut self, decorated: &str, kind: SymbolKind) -> bool {
        let added = self.taken.take(decorated);
        if added {
            self.classified.push((decorated.to_string(), kind));
        }
        added
    }

    pub fn add_scoped(&mut self, decorated: &str) -> bool {
        let added = self.taken.take(decorated);
        if added {
            self.scoped.push(decorated.to_string());
        }
        added
    }

    pub fn curated(&self) -> &[String] {
        &self.curated
    }

    pub fn classified(&self) -> &[(String, SymbolKind)] {
        &self.classified
    }

    pub fn scoped(&self) -> &[String] {
        &self.scoped
    }

    pub fn data_count(&self) -> usize {
        self.classified.iter().filter(|(_, kind)| *kind == SymbolKind::Data).count()
    }

    pub fn len(&self) -> usize {
        self.curated.len() + self.classified.len() + self.scoped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(target) = &self.target {
            writeln!(out, "LIBRARY {}", target)?;
        }
        writeln!(out, "EXPORTS")?;

        for symbol in &self.curated {
            writeln!(out, "\t{}", symbol)?;
        }
        for (symbol, kind) in &self.classified {
            match kind {
                SymbolKind::Code => writeln!(out, "\t{}", symbol)?,
                SymbolKind::Data => writeln!(out, "\t{}{}", symbol, DATA_MARKER)?,
            }
        }
        for symbol in &self.scoped {
            writeln!(out, "\t{}", symbol)?;
        }

        Ok(())
    }

    pub fn to_string_lossy(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.render(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Writes next to `path` and renames into place, so a failed run never
    /// leaves a half-written listing.
    pub fn write_to_path(&self, path: &Path) -> Result<(), DefError> {
        let output_err = |source| DefError::Output {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir).map_err(output_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            self.render(&mut writer).map_err(output_err)?;
            writer.flush().map_err(output_err)?;
        }
        tmp.persist(path).map_err(|e| output_err(e.error))?;

        log::info!("Wrote {} exports to {}", self.len(), path.display());
        Ok(())
    }
}
