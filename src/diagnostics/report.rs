use super::timing::TimingBreakdown;
use crate::distance::Norm;
use crate::parallel::Route;
use serde::Serialize;

/// Summary of one distance transform call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceReport {
    pub width: usize,
    pub height: usize,
    pub norm: Norm,
    pub route: Route,
    /// Workers the parallel passes fanned out to (1 on the serial route).
    pub workers: usize,
    pub timing: TimingBreakdown,
}
