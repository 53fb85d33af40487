// Fri Oct 16 2026 - Alex

pub mod config;
pub mod logging;

pub use config::RulesFile;
pub use logging::LoggingUtils;
