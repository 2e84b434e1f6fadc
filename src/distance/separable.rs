//! Two-pass separable distance transform over the worker pool.
//!
//! Pass 1 runs the line transform down every column of the seed indicator
//! (`0` at seeds, [`FAR`] elsewhere) and stores the result in an
//! intermediate buffer. Pass 2 runs it along every row of that buffer and
//! writes the destination, taking square roots for the Euclidean norm.
//!
//! The intermediate buffer is column-major (`inter[x * h + y]`), so each
//! column is one disjoint `&mut` chunk in pass 1 and rows are gathered with a
//! stride of `h` in pass 2. Pass 2 starts only after every column job has
//! returned. Each worker batch of lines owns one [`LineScratch`] sized for
//! the longest line.
use super::line::{ChessboardLine, EuclideanLine, LineScratch, LineTransform, ManhattanLine};
use super::{try_buffer, DistanceTransformError, Norm, FAR};
use crate::diagnostics::TimingBreakdown;
use crate::image::{ImageMut, ImageRef, ImageView, PixelValue};
use crate::parallel::WorkerPool;
use log::debug;

/// Run the separable transform for `norm`.
///
/// `Norm::Chessboard` has no separable line transform and panics; callers
/// route it to the serial chamfer instead.
pub fn transform<T>(
    pool: &WorkerPool,
    src: &ImageRef<'_, T>,
    dest: ImageMut<'_, f32>,
    seed: T,
    norm: Norm,
) -> Result<TimingBreakdown, DistanceTransformError>
where
    T: PixelValue + PartialEq,
{
    match norm {
        Norm::Manhattan => run(pool, src, dest, seed, &ManhattanLine),
        Norm::Euclidean => run(pool, src, dest, seed, &EuclideanLine),
        Norm::Chessboard => run(pool, src, dest, seed, &ChessboardLine),
    }
}

/// Run both passes with an explicit line strategy.
pub fn run<T, L>(
    pool: &WorkerPool,
    src: &ImageRef<'_, T>,
    dest: ImageMut<'_, f32>,
    seed: T,
    line: &L,
) -> Result<TimingBreakdown, DistanceTransformError>
where
    T: PixelValue + PartialEq,
    L: LineTransform,
{
    let (w, h) = src.dimensions();
    assert_eq!(
        dest.dimensions(),
        (w, h),
        "separable transform: source and destination sizes differ"
    );
    let mut timing = TimingBreakdown::default();
    if w == 0 || h == 0 {
        return Ok(timing);
    }

    let longest = w.max(h);
    let mut intermediate = try_buffer(w * h, FAR, "intermediate")?;

    timing.time_stage("column_pass", || {
        pool.try_for_each_chunk_init(
            &mut intermediate,
            h,
            || LineScratch::try_new(longest),
            |scratch, x, column| {
                let f = scratch.input_mut(h);
                for (y, slot) in f.iter_mut().enumerate() {
                    *slot = if src.row(y)[x] == seed { 0.0 } else { FAR };
                }
                column.copy_from_slice(scratch.run(line, h));
                Ok(())
            },
        )
    })?;

    let inter = &intermediate[..];
    let stride = dest.stride;
    let rows = &mut dest.data[..(h - 1) * stride + w];
    timing.time_stage("row_pass", || {
        pool.try_for_each_chunk_init(
            rows,
            stride,
            || LineScratch::try_new(longest),
            |scratch, y, row| {
                let f = scratch.input_mut(w);
                for (x, slot) in f.iter_mut().enumerate() {
                    *slot = inter[x * h + y];
                }
                let d = scratch.run(line, w);
                let out = &mut row[..w];
                if L::NORM == Norm::Euclidean {
                    for (o, &v) in out.iter_mut().zip(d) {
                        *o = v.sqrt();
                    }
                } else {
                    out.copy_from_slice(d);
                }
                Ok(())
            },
        )
    })?;

    debug!(
        "separable {:?} {w}x{h}: columns {:.3} ms, rows {:.3} ms",
        L::NORM,
        timing.stage_ms("column_pass").unwrap_or_default(),
        timing.stage_ms("row_pass").unwrap_or_default()
    );
    Ok(timing)
}
