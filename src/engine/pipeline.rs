// Sat Oct 17 2026 - Alex

use crate::config::{Config, DecoderKind, LibReaderKind};
use crate::error::DefError;
use crate::filter::catalog::SymbolCatalog;
use crate::filter::rules::{Decision, RuleSet};
use crate::filter::scoped::LibraryScopedSelector;
use crate::output::def_file::ExportListing;
use crate::output::stats::RunStats;
use crate::symbol::{
    ArchiveReader, BuiltinDecoder, DumpbinReader, LibrarySymbolReader, NameDecoder, RawSymbolReader,
    SymbolError, SymbolPairs, UndnameDecoder,
};
use crate::utils::config::load_rules;
use crate::utils::logging::stage_timer;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reading,
    Decoding,
    Classifying,
    Scoping,
    Writing,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Reading => "read",
            Stage::Decoding => "decode",
            Stage::Classifying => "classify",
            Stage::Scoping => "library scope",
            Stage::Writing => "write",
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub listing: ExportListing,
    pub stats: RunStats,
}

/// Symbol listings in, module-definition file out.
pub struct DefPipeline {
    config: Config,
    rules: RuleSet,
    curated: Vec<String>,
    decoder: Box<dyn NameDecoder>,
    lib_reader: Box<dyn LibrarySymbolReader>,
}

impl DefPipeline {
    /// Builds the pipeline described by `config`, loading and compiling any
    /// rules file up front.
    pub fn from_config(config: Config) -> Result<Self, DefError> {
        let (rules, curated) = match &config.rules_file {
            Some(path) => {
                let file = load_rules(path)?;
                let curated = file
                    .curated_symbols
                    .clone()
                    .unwrap_or_else(|| vec![config.bitness.opdef_destructor().to_string()]);
                (file.rule_set()?, curated)
            }
            None => (RuleSet::default(), vec![config.bitness.opdef_destructor().to_string()]),
        };

        let decoder: Box<dyn NameDecoder> = match config.decoder {
            DecoderKind::Undname => Box::new(UndnameDecoder::new(&config.undname_path)),
            DecoderKind::Builtin => Box::new(BuiltinDecoder),
        };

        let lib_reader: Box<dyn LibrarySymbolReader> = match config.lib_reader {
            LibReaderKind::Dumpbin => Box::new(DumpbinReader::new(&config.dumpbin_path)),
            LibReaderKind::Archive => Box::new(ArchiveReader),
        };

        Ok(Self {
            config,
            rules,
            curated,
            decoder,
            lib_reader,
        })
    }

    pub fn with_decoder(mut self, decoder: Box<dyn NameDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_lib_reader(mut self, reader: Box<dyn LibrarySymbolReader>) -> Self {
        self.lib_reader = reader;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self) -> Result<RunOutcome, DefError> {
        let catalog = self.load_catalog()?;
        let mut stats = RunStats::new(self.config.max_exports);

        let pairs = self.read_and_decode(&mut stats)?;

        let mut listing = ExportListing::new(self.config.target.clone());
        for symbol in &self.curated {
            listing.add_curated(symbol);
        }

        self.classify(pairs, &mut listing, &mut stats);

        if let (Some(catalog), Some((_, libraries))) = (&catalog, self.config.library_scope()) {
            self.add_library_scoped(catalog, libraries, &mut listing)?;
        }

        stats.finish(&listing);
        if let Some(over) = stats.over_budget() {
            log::warn!(
                "{} exports exceed the linker limit of {} by {}",
                stats.total_exports,
                stats.max_exports,
                over
            );
        }

        {
            let _timer = stage_timer(Stage::Writing.label());
            listing.write_to_path(&self.config.output)?;
        }

        if let Some(path) = &self.config.stats_json {
            stats.save_json(path).map_err(|source| DefError::Output {
                path: path.clone(),
                source,
            })?;
        }

        log::info!(
            "symbols: {}, taken: {}, dupes: {}",
            stats.symbols_read,
            listing.taken().len(),
            stats.duplicates
        );

        Ok(RunOutcome { listing, stats })
    }

    fn load_catalog(&self) -> Result<Option<SymbolCatalog>, DefError> {
        let Some((path, _)) = self.config.library_scope() else {
            if self.config.symbols_catalog.is_some() || !self.config.lib_paths.is_empty() {
                log::info!("Symbol catalog and library paths must both be given, skipping library-scoped symbols");
            }
            return Ok(None);
        };

        let catalog = SymbolCatalog::load(path).map_err(|source| DefError::Catalog {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded {} catalog sections from {}", catalog.len(), path.display());
        Ok(Some(catalog))
    }

    fn read_and_decode(&self, stats: &mut RunStats) -> Result<SymbolPairs, DefError> {
        // The temp file must outlive the decoder run.
        let (scratch_path, _guard): (PathBuf, Option<NamedTempFile>) = match &self.config.scratch_file {
            Some(path) => (path.clone(), None),
            None => {
                let tmp = NamedTempFile::new().map_err(|source| SymbolError::ScratchWrite {
                    path: std::env::temp_dir(),
                    source,
                })?;
                (tmp.path().to_path_buf(), Some(tmp))
            }
        };

        let decorated = {
            let _timer = stage_timer(Stage::Reading.label());
            RawSymbolReader::new(&scratch_path).read_all(&self.config.inputs)?
        };
        stats.symbols_read = decorated.len();
        log::info!("Read {} symbols from {} inputs", decorated.len(), self.config.inputs.len());

        let _timer = stage_timer(Stage::Decoding.label());
        let pairs = self.decoder.pair(&scratch_path, decorated)?;
        log::info!("Decoded {} symbols with {}", pairs.len(), self.decoder.name());
        Ok(pairs)
    }

    fn classify(&self, pairs: SymbolPairs, listing: &mut ExportListing, stats: &mut RunStats) {
        let _timer = stage_timer(Stage::Classifying.label());

        for record in pairs {
            if listing.taken_mut().reject_taken(&record.decorated) {
                continue;
            }

            match self.rules.classify(&record.undecorated) {
                Decision::Keep { tier, kind } => {
                    log::trace!("keep {:?} ({:?}, {:?}): {}", record.decorated, tier, kind, record.undecorated);
                    listing.add_classified(&record.decorated, kind);
                }
                Decision::Drop { tier } => {
                    log::trace!("drop {:?} ({:?}): {}", record.decorated, tier, record.undecorated);
                    stats.record_drop(tier);
                }
            }
        }
    }

    fn add_library_scoped(
        &self,
        catalog: &SymbolCatalog,
        libraries: &[PathBuf],
        listing: &mut ExportListing,
    ) -> Result<(), DefError> {
        let _timer = stage_timer(Stage::Scoping.label());
        let spinner = self.spinner(libraries.len());

        let mut selector = LibraryScopedSelector::new(catalog, self.lib_reader.as_ref());
        if !self.config.parallel_scan {
            selector = selector.sequential();
        }
        let selected = selector.select(libraries);

        if let Some(pb) = &spinner {
            pb.finish_and_clear();
        }

        for scoped in selected? {
            let before = listing.scoped().len();
            for symbol in &scoped.symbols {
                listing.add_scoped(symbol);
            }
            log::debug!(
                "[{}] added {} of {} symbols from {}",
                scoped.section,
                listing.scoped().len() - before,
                scoped.symbols.len(),
                scoped.library.display()
            );
        }

        Ok(())
    }

    fn spinner(&self, libraries: usize) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Scanning {} libraries...", libraries));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}
