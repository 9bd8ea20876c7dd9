pub mod executive_summary;
pub mod station_analyzer;

pub use executive_summary::{Artifact, ExecutiveSummary};
pub use station_analyzer::{
    AnnualSummary, MonthlyAggregate, SeriesStats, StationAnalyzer, StationStatistics,
};
