#![doc = include_str!("../README.md")]

pub mod config;
pub mod diagnostics;
pub mod distance;
pub mod image;
pub mod parallel;
pub mod serial;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::ExecutorConfig;
pub use crate::diagnostics::{DistanceReport, StageTiming, TimingBreakdown};
pub use crate::distance::{distance_transform, DistanceTransformError, Norm, FAR};
pub use crate::parallel::{
    dispatch, CrossoverTable, GridExecutor, GridOp, PoolError, Route, WorkerPool,
};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use grid_distance::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (w, h) = (640usize, 480usize);
/// let mask = Image::from_fn(w, h, |x, y| u8::from(x == w / 2 && y == h / 2));
///
/// let exec = GridExecutor::default();
/// let (dist, report) = exec.distance_transform(&mask.view(), 1, Norm::Euclidean)?;
/// println!("route={:?} max={}", report.route, dist.get(0, 0));
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{Image, ImageF32, ImageMut, ImageRef, ImageView, ImageViewMut};
    pub use crate::{CrossoverTable, DistanceReport, GridExecutor, Norm, Route};
}
