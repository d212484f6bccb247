pub mod driver;
pub mod models;
pub mod parse;
pub mod synthesizer;

pub use driver::{BatchDriver, StorageProvider};
pub use models::{AnalysisResult, BatchSummary, FileRef, ItemOutcome, RenameError};
pub use synthesizer::{AnalysisProvider, FilenameSynthesizer};
