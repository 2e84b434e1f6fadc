//! Distance transforms of seed grids.
//!
//! Every cell receives the distance to the nearest *seed* cell, a seed being
//! a cell whose value equals the caller's seed value; seeds themselves get 0.
//!
//! Above the distance-transform crossover the transform runs as two
//! separable passes over the worker pool (columns, then rows, see
//! [`separable`]). Small grids and the Chebyshev norm take the serial
//! reference path in [`crate::serial`]. Cells of a grid that has no seed at
//! all saturate at [`FAR`] (or `FAR.sqrt()` for the Euclidean norm).
pub mod line;
pub mod separable;

pub use self::line::{
    ChessboardLine, Envelope, EuclideanLine, LineScratch, LineTransform, ManhattanLine,
};

use crate::diagnostics::{DistanceReport, TimingBreakdown};
use crate::image::{ImageMut, ImageRef, ImageView, PixelValue};
use crate::parallel::{dispatch, CrossoverTable, GridOp, Route, WorkerPool};
use crate::serial;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use std::time::Instant;

/// Sentinel used as "+infinity" by the line transforms.
pub const FAR: f32 = f32::MAX;

/// True for outputs of cells that have no seed to measure against.
#[inline]
pub fn is_far(distance: f32) -> bool {
    distance >= FAR.sqrt()
}

/// Distance metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// L∞, `max(|dx|, |dy|)`
    Chessboard,
    /// L1, `|dx| + |dy|`
    Manhattan,
    /// L2
    #[default]
    Euclidean,
}

impl Norm {
    /// Map the classic integer selector: 0 → chessboard, 1 → Manhattan,
    /// anything else → Euclidean.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Norm::Chessboard,
            1 => Norm::Manhattan,
            _ => Norm::Euclidean,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Norm::Chessboard => 0,
            Norm::Manhattan => 1,
            Norm::Euclidean => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DistanceTransformError {
    #[error("output is {dest_width}x{dest_height} but input is {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        dest_width: usize,
        dest_height: usize,
    },
    #[error("failed to allocate {what} buffer of {len} elements: {source}")]
    Allocation {
        what: &'static str,
        len: usize,
        #[source]
        source: TryReserveError,
    },
}

pub(crate) fn try_buffer<T: Copy>(
    len: usize,
    fill: T,
    what: &'static str,
) -> Result<Vec<T>, DistanceTransformError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| DistanceTransformError::Allocation { what, len, source })?;
    buf.resize(len, fill);
    Ok(buf)
}

/// Routing for a distance transform: Chebyshev always stays serial, other
/// norms follow the crossover table.
pub fn distance_route(table: &CrossoverTable, area: usize, norm: Norm) -> Route {
    if norm == Norm::Chessboard {
        return Route::Serial;
    }
    dispatch(table, GridOp::DistanceTransform, area, true)
}

/// Compute the distance transform of `src` into `dest`.
///
/// `dest` must have the same dimensions as `src`. A zero-area grid is a
/// no-op. On error `dest` holds unspecified values.
pub fn distance_transform<T>(
    pool: &WorkerPool,
    crossover: &CrossoverTable,
    src: &ImageRef<'_, T>,
    mut dest: ImageMut<'_, f32>,
    seed: T,
    norm: Norm,
) -> Result<DistanceReport, DistanceTransformError>
where
    T: PixelValue + PartialEq,
{
    let (width, height) = src.dimensions();
    if dest.dimensions() != (width, height) {
        return Err(DistanceTransformError::DimensionMismatch {
            width,
            height,
            dest_width: dest.w,
            dest_height: dest.h,
        });
    }

    let start = Instant::now();
    let area = src.area();
    if area == 0 {
        return Ok(DistanceReport {
            width,
            height,
            norm,
            route: Route::Serial,
            workers: 1,
            timing: TimingBreakdown::default(),
        });
    }

    let route = distance_route(crossover, area, norm);
    debug!("distance_transform {width}x{height} norm={norm:?} -> {route:?}");

    let (mut timing, workers) = match route {
        Route::Serial => {
            let mut timing = TimingBreakdown::default();
            timing.time_stage("serial", || {
                serial::distance_transform(src, &mut dest, seed, norm)
            })?;
            (timing, 1)
        }
        Route::Parallel => (
            separable::transform(pool, src, dest, seed, norm)?,
            pool.current_num_threads(),
        ),
    };
    timing.total_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(DistanceReport {
        width,
        height,
        norm,
        route,
        workers,
        timing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_codes() {
        assert_eq!(Norm::from_code(0), Norm::Chessboard);
        assert_eq!(Norm::from_code(1), Norm::Manhattan);
        assert_eq!(Norm::from_code(2), Norm::Euclidean);
        assert_eq!(Norm::from_code(-7), Norm::Euclidean);
        for norm in [Norm::Chessboard, Norm::Manhattan, Norm::Euclidean] {
            assert_eq!(Norm::from_code(norm.id() as i32), norm);
        }
    }

    #[test]
    fn chessboard_never_routes_parallel() {
        let t = CrossoverTable::always_parallel();
        assert_eq!(distance_route(&t, 1 << 30, Norm::Chessboard), Route::Serial);
        assert_eq!(distance_route(&t, 1, Norm::Manhattan), Route::Parallel);
    }

    #[test]
    fn far_detection() {
        assert!(is_far(FAR));
        assert!(is_far(FAR.sqrt()));
        assert!(!is_far(1.0e6));
    }

    #[test]
    fn norm_deserializes_lowercase() {
        let n: Norm = serde_json::from_str("\"manhattan\"").expect("valid");
        assert_eq!(n, Norm::Manhattan);
    }
}
