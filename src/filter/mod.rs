// Fri Oct 16 2026 - Alex

pub mod catalog;
pub mod dedup;
pub mod rules;
pub mod scoped;

pub use catalog::SymbolCatalog;
pub use dedup::TakenSet;
pub use rules::{Decision, PatternGroup, RuleSet, SymbolKind, Tier, Verdict};
pub use scoped::{LibraryScopedSelector, ScopedSymbols};
