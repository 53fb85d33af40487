// Sat Oct 17 2026 - Alex

use crate::filter::rules::Tier;
use crate::output::def_file::ExportListing;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub symbols_read: usize,
    pub classified_kept: usize,
    pub duplicates: usize,
    pub dropped: BTreeMap<String, usize>,
    pub curated: usize,
    pub library_scoped: usize,
    pub data_symbols: usize,
    pub total_exports: usize,
    pub max_exports: usize,
}

impl RunStats {
    pub fn new(max_exports: usize) -> Self {
        Self {
            max_exports,
            ..Self::default()
        }
    }

    pub fn record_drop(&mut self, tier: Tier) {
        *self.dropped.entry(tier_name(tier).to_string()).or_insert(0) += 1;
    }

    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    /// Fills in the totals from the finished listing.
    pub fn finish(&mut self, listing: &ExportListing) {
        self.classified_kept = listing.classified().len();
        self.curated = listing.curated().len();
        self.library_scoped = listing.scoped().len();
        self.data_symbols = listing.data_count();
        self.total_exports = listing.len();
        self.duplicates = listing.taken().duplicates();
    }

    pub fn over_budget(&self) -> Option<usize> {
        self.total_exports.checked_sub(self.max_exports).filter(|n| *n > 0)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(path, json)
    }

    pub fn print_summary(&self) {
        println!("{}", "Export Summary".cyan().bold());
        println!("{}", "-".repeat(40).cyan());
        println!("  Symbols read: {}", self.symbols_read.to_string().green());
        println!("  Kept by rules: {}", self.classified_kept.to_string().green());
        println!("  Dropped by rules: {}", self.dropped_total().to_string().yellow());
        for (tier, count) in &self.dropped {
            println!("    {}: {}", tier, count);
        }
        println!("  Duplicates: {}", self.duplicates.to_string().yellow());
        println!("  Curated: {}", self.curated.to_string().green());
        println!("  Library-scoped: {}", self.library_scoped.to_string().green());
        println!("  Data symbols: {}", self.data_symbols.to_string().green());

        let total = format!("{}/{}", self.total_exports, self.max_exports);
        match self.over_budget() {
            Some(_) => println!("  Total exports: {}", total.red().bold()),
            None => println!("  Total exports: {}", total.green()),
        }
    }
}

fn tier_name(tier: Tier) -> &'static str {
    match tier {
        Tier::PreInclude => "pre_include",
        Tier::Exclude => "exclude",
        Tier::Include => "include",
        Tier::Veto => "veto",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::rules::SymbolKind;

    #[test]
    fn test_finish_and_budget() {
        let mut listing = ExportListing::new(None);
        listing.add_curated("A");
        listing.add_classified("B", SymbolKind::Data);
        listing.add_classified("B", SymbolKind::Data);
        listing.add_scoped("C");

        let mut stats = RunStats::new(2);
        stats.finish(&listing);

        assert_eq!(stats.total_exports, 3);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.data_symbols, 1);
        assert_eq!(stats.over_budget(), Some(1));

        stats.max_exports = 3;
        assert_eq!(stats.over_budget(), None);
    }

    #[test]
    fn test_record_drop_by_tier() {
        let mut stats = RunStats::new(10);
        stats.record_drop(Tier::Exclude);
        stats.record_drop(Tier::Exclude);
        stats.record_drop(Tier::Veto);

        assert_eq!(stats.dropped["exclude"], 2);
        assert_eq!(stats.dropped_total(), 3);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"veto\":1"));
    }
}
