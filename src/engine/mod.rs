// Sat Oct 17 2026 - Alex

pub mod pipeline;

pub use pipeline::{DefPipeline, RunOutcome, Stage};
