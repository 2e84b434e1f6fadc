//! Crossover thresholds for switching from serial to strip-parallel execution.
//!
//! The table maps every grid operation to the pixel count from which fanning
//! out over the worker pool pays for itself. Composite cells (RGB triples,
//! arrays) do more work per pixel and therefore cross over earlier than
//! plain scalars. The distance transform has a single, metric-independent
//! threshold.
use serde::{Deserialize, Serialize};

/// Closed set of grid operations routed through the dispatch policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridOp {
    /// `dest = f(a, b)`
    CombineTwo,
    /// `dest = f(a, b)` where the mask is set
    CombineTwoMasked,
    /// `dest = f(a, b, c)`
    CombineThree,
    /// `dest = f(a)`
    Transform,
    /// `dest = f(a)` where the mask is set
    TransformMasked,
    DistanceTransform,
}

/// Routing decision returned by [`dispatch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Serial,
    Parallel,
}

/// Threshold pair for one operation kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossover {
    /// Minimum area for single-channel cells.
    pub scalar: usize,
    /// Minimum area for composite cells.
    pub composite: usize,
}

impl Crossover {
    pub const fn new(scalar: usize, composite: usize) -> Self {
        Self { scalar, composite }
    }

    pub const fn uniform(pixels: usize) -> Self {
        Self::new(pixels, pixels)
    }

    #[inline]
    pub fn pick(&self, is_scalar: bool) -> usize {
        if is_scalar {
            self.scalar
        } else {
            self.composite
        }
    }
}

pub const COMBINE_TWO: Crossover = Crossover::new(65_536, 16_384);
pub const COMBINE_THREE: Crossover = Crossover::new(46_656, 12_544);
pub const TRANSFORM: Crossover = Crossover::new(57_600, 32_768);
pub const DISTANCE_TRANSFORM: usize = 1_936;

/// Immutable per-process crossover configuration.
///
/// Masked variants share the thresholds of their unmasked counterparts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverTable {
    pub combine_two: Crossover,
    pub combine_three: Crossover,
    pub transform: Crossover,
    pub distance_transform: usize,
}

impl CrossoverTable {
    pub const DEFAULT: Self = Self {
        combine_two: COMBINE_TWO,
        combine_three: COMBINE_THREE,
        transform: TRANSFORM,
        distance_transform: DISTANCE_TRANSFORM,
    };

    /// Table that never leaves the calling thread.
    pub const fn serial_only() -> Self {
        Self {
            combine_two: Crossover::uniform(usize::MAX),
            combine_three: Crossover::uniform(usize::MAX),
            transform: Crossover::uniform(usize::MAX),
            distance_transform: usize::MAX,
        }
    }

    /// Table that parallelizes every non-empty grid.
    pub const fn always_parallel() -> Self {
        Self {
            combine_two: Crossover::uniform(1),
            combine_three: Crossover::uniform(1),
            transform: Crossover::uniform(1),
            distance_transform: 1,
        }
    }

    pub fn threshold(&self, op: GridOp, is_scalar: bool) -> usize {
        match op {
            GridOp::CombineTwo | GridOp::CombineTwoMasked => self.combine_two.pick(is_scalar),
            GridOp::CombineThree => self.combine_three.pick(is_scalar),
            GridOp::Transform | GridOp::TransformMasked => self.transform.pick(is_scalar),
            GridOp::DistanceTransform => self.distance_transform,
        }
    }

    #[inline]
    pub fn route(&self, op: GridOp, area: usize, is_scalar: bool) -> Route {
        dispatch(self, op, area, is_scalar)
    }
}

impl Default for CrossoverTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Decide whether `op` over `area` pixels runs serially or over the pool.
///
/// The threshold is inclusive: an area equal to it already goes parallel.
#[inline]
pub fn dispatch(table: &CrossoverTable, op: GridOp, area: usize, is_scalar: bool) -> Route {
    if area >= table.threshold(op, is_scalar) {
        Route::Parallel
    } else {
        Route::Serial
    }
}
