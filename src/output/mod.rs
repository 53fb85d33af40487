// Sat Oct 17 2026 - Alex

pub mod def_file;
pub mod stats;

pub use def_file::ExportListing;
pub use stats::RunStats;
