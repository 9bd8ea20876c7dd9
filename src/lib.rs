pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::CleaningConfig;
pub use error::{ProcessingError, Result};
pub use models::{CanonicalObservation, CleaningReport, RawCell, RawTable};
pub use processors::{clean, CleaningOutput, CleaningPipeline};
