//! Single-threaded reference paths.
//!
//! Used below the crossover thresholds, for the Chebyshev norm, and as the
//! oracle the parallel paths are tested against.
pub mod ops;

pub use self::ops::{combine_three, combine_two, combine_two_if, transform, transform_if};

use crate::distance::{separable, DistanceTransformError, EuclideanLine, Norm, FAR};
use crate::image::{ImageMut, ImageRef, ImageView, ImageViewMut, PixelValue};
use crate::parallel::WorkerPool;

/// Distance transform on the calling thread.
///
/// Chebyshev and Manhattan distances come from a two-raster-scan chamfer
/// propagation with unit steps over the 8- and 4-neighbourhood. Both are
/// exact for these metrics. Euclidean distances reuse the separable line
/// transforms on an inline pool.
pub fn distance_transform<T>(
    src: &ImageRef<'_, T>,
    dest: &mut ImageMut<'_, f32>,
    seed: T,
    norm: Norm,
) -> Result<(), DistanceTransformError>
where
    T: PixelValue + PartialEq,
{
    ops::assert_same_size("distance_transform", src, &*dest);
    match norm {
        Norm::Euclidean => {
            separable::run(
                &WorkerPool::sequential(),
                src,
                dest.reborrow(),
                seed,
                &EuclideanLine,
            )?;
        }
        Norm::Manhattan => chamfer(src, dest, seed, false),
        Norm::Chessboard => chamfer(src, dest, seed, true),
    }
    Ok(())
}

fn chamfer<T, D>(src: &ImageRef<'_, T>, dest: &mut D, seed: T, diagonals: bool)
where
    T: PixelValue + PartialEq,
    D: ImageViewMut<Pixel = f32>,
{
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    for y in 0..h {
        let (row_in, row_out) = (src.row(y), dest.row_mut(y));
        for (out, &v) in row_out.iter_mut().zip(row_in) {
            *out = if v == seed { 0.0 } else { FAR };
        }
    }

    // Forward scan: left, up, and for L∞ the two upper diagonals.
    for y in 0..h {
        for x in 0..w {
            let mut best = dest.get(x, y);
            if x > 0 {
                best = best.min(dest.get(x - 1, y) + 1.0);
            }
            if y > 0 {
                best = best.min(dest.get(x, y - 1) + 1.0);
                if diagonals {
                    if x > 0 {
                        best = best.min(dest.get(x - 1, y - 1) + 1.0);
                    }
                    if x + 1 < w {
                        best = best.min(dest.get(x + 1, y - 1) + 1.0);
                    }
                }
            }
            dest.set(x, y, best);
        }
    }

    // Backward scan: mirror image of the forward mask.
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let mut best = dest.get(x, y);
            if x + 1 < w {
                best = best.min(dest.get(x + 1, y) + 1.0);
            }
            if y + 1 < h {
                best = best.min(dest.get(x, y + 1) + 1.0);
                if diagonals {
                    if x + 1 < w {
                        best = best.min(dest.get(x + 1, y + 1) + 1.0);
                    }
                    if x > 0 {
                        best = best.min(dest.get(x - 1, y + 1) + 1.0);
                    }
                }
            }
            dest.set(x, y, best);
        }
    }
}
