//! Diagnostics returned alongside results: per-stage timings and the
//! distance transform report written by the demo.

pub mod report;
pub mod timing;

pub use report::DistanceReport;
pub use timing::{StageTiming, TimingBreakdown};
