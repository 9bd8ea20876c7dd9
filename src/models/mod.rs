pub mod observation;
pub mod raw;
pub mod report;

pub use observation::{CanonicalObservation, ObservationField};
pub use raw::{RawCell, RawObservation, RawTable};
pub use report::{CleaningReport, DropCounts, FieldImputations, ImputationCounts};
