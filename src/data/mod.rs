//! Data ingestion and harmonization
//!
//! CSV table reading, per-season join/clean, and training corpus assembly.

pub mod corpus;
pub mod loader;
pub mod table;

pub use corpus::{PredictionTarget, TrainingCorpus};
pub use loader::{SeasonLoader, SeasonTable};
pub use table::RawTable;
