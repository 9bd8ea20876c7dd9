pub mod cell_parser;
pub mod imputation;
pub mod integrity_checker;
pub mod pipeline;

pub use cell_parser::{CellParser, ParsedValue};
pub use imputation::{impute_column, ImputationStrategy, ImputedColumn};
pub use integrity_checker::{IntegrityChecker, IntegrityReport, IntegrityViolation, ViolationType};
pub use pipeline::{clean, CleaningOutput, CleaningPipeline};
