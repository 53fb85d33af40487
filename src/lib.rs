// Thu Oct 15 2026 - Alex

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod output;
pub mod symbol;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use engine::DefPipeline;
pub use error::DefError;
pub use filter::{RuleSet, SymbolCatalog, TakenSet};
pub use output::ExportListing;
