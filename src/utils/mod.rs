pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{input_stem, OutputPaths};
pub use progress::ProgressReporter;
