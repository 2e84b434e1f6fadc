//! Grid executor: routes every operation through the crossover table and
//! either runs the serial kernel on the whole grid or fans it out over
//! horizontal row strips, one per worker.
//!
//! Sizes of all inputs must match the destination; a mismatch is a caller
//! bug and panics before any pixel is written.
use super::crossover::{dispatch, CrossoverTable, GridOp, Route};
use super::pool::{strip_partition, PoolError, WorkerPool};
use crate::config::ExecutorConfig;
use crate::diagnostics::DistanceReport;
use crate::distance::{self, DistanceTransformError, Norm};
use crate::image::{Image, ImageMut, ImageRef, ImageView, PixelValue};
use crate::serial::{self, ops::assert_same_size};
use log::{debug, trace};
use std::ops::Range;

#[derive(Debug, Default)]
pub struct GridExecutor {
    pool: WorkerPool,
    crossover: CrossoverTable,
}

impl GridExecutor {
    pub fn new(pool: WorkerPool, crossover: CrossoverTable) -> Self {
        Self { pool, crossover }
    }

    /// Build the pool described by `config` (global pool when `threads` is
    /// unset).
    pub fn from_config(config: &ExecutorConfig) -> Result<Self, PoolError> {
        let pool = WorkerPool::from_threads(config.threads)?;
        debug!(
            "GridExecutor: {} workers, distance crossover {} px",
            pool.current_num_threads(),
            config.crossover.distance_transform
        );
        Ok(Self::new(pool, config.crossover))
    }

    /// Single-threaded executor with the default thresholds.
    pub fn sequential() -> Self {
        Self::new(WorkerPool::sequential(), CrossoverTable::default())
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn crossover(&self) -> &CrossoverTable {
        &self.crossover
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    #[inline]
    pub fn route(&self, op: GridOp, area: usize, is_scalar: bool) -> Route {
        dispatch(&self.crossover, op, area, is_scalar)
    }

    /// Run `kernel` on the whole of `dest` or on one row strip per worker.
    ///
    /// The kernel receives the global row range of its strip together with
    /// the matching destination strip, and must only touch those rows.
    pub fn run_in_strips<D, K>(&self, op: GridOp, dest: ImageMut<'_, D>, kernel: K) -> Route
    where
        D: PixelValue,
        K: Fn(Range<usize>, ImageMut<'_, D>) + Sync + Send,
    {
        let (w, h) = dest.dimensions();
        let route = self.route(op, dest.area(), D::IS_SCALAR);
        debug!("{op:?} {w}x{h} -> {route:?}");
        match route {
            Route::Serial => kernel(0..h, dest),
            Route::Parallel => {
                let strips = strip_partition(h, self.pool.current_num_threads());
                trace!("{op:?} strips {strips:?}");
                let parts = dest.split_rows(&strips);
                let jobs: Vec<_> = strips.into_iter().zip(parts).collect();
                self.pool.for_each(jobs, |(rows, part)| {
                    if !rows.is_empty() {
                        kernel(rows, part);
                    }
                });
            }
        }
        route
    }

    /// `dest(x, y) = f(a(x, y), b(x, y))`
    pub fn combine_two<A, B, D, F>(
        &self,
        a: &ImageRef<'_, A>,
        b: &ImageRef<'_, B>,
        dest: ImageMut<'_, D>,
        f: F,
    ) -> Route
    where
        A: PixelValue,
        B: PixelValue,
        D: PixelValue,
        F: Fn(A, B) -> D + Sync + Send,
    {
        assert_same_size("combine_two", a, &dest);
        assert_same_size("combine_two", b, &dest);
        self.run_in_strips(GridOp::CombineTwo, dest, |rows, mut part| {
            serial::combine_two(&a.sub_rows(rows.clone()), &b.sub_rows(rows), &mut part, &f);
        })
    }

    /// Like [`GridExecutor::combine_two`], but pixels whose mask value equals
    /// `M::default()` keep their previous destination value.
    pub fn combine_two_if<A, B, M, D, F>(
        &self,
        a: &ImageRef<'_, A>,
        b: &ImageRef<'_, B>,
        mask: &ImageRef<'_, M>,
        dest: ImageMut<'_, D>,
        f: F,
    ) -> Route
    where
        A: PixelValue,
        B: PixelValue,
        M: PixelValue + Default + PartialEq,
        D: PixelValue,
        F: Fn(A, B) -> D + Sync + Send,
    {
        assert_same_size("combine_two_if", a, &dest);
        assert_same_size("combine_two_if", b, &dest);
        assert_same_size("combine_two_if", mask, &dest);
        self.run_in_strips(GridOp::CombineTwoMasked, dest, |rows, mut part| {
            serial::combine_two_if(
                &a.sub_rows(rows.clone()),
                &b.sub_rows(rows.clone()),
                &mask.sub_rows(rows),
                &mut part,
                &f,
            );
        })
    }

    /// `dest(x, y) = f(a(x, y), b(x, y), c(x, y))`
    pub fn combine_three<A, B, C, D, F>(
        &self,
        a: &ImageRef<'_, A>,
        b: &ImageRef<'_, B>,
        c: &ImageRef<'_, C>,
        dest: ImageMut<'_, D>,
        f: F,
    ) -> Route
    where
        A: PixelValue,
        B: PixelValue,
        C: PixelValue,
        D: PixelValue,
        F: Fn(A, B, C) -> D + Sync + Send,
    {
        assert_same_size("combine_three", a, &dest);
        assert_same_size("combine_three", b, &dest);
        assert_same_size("combine_three", c, &dest);
        self.run_in_strips(GridOp::CombineThree, dest, |rows, mut part| {
            serial::combine_three(
                &a.sub_rows(rows.clone()),
                &b.sub_rows(rows.clone()),
                &c.sub_rows(rows),
                &mut part,
                &f,
            );
        })
    }

    /// `dest(x, y) = f(a(x, y))`
    pub fn transform<A, D, F>(&self, a: &ImageRef<'_, A>, dest: ImageMut<'_, D>, f: F) -> Route
    where
        A: PixelValue,
        D: PixelValue,
        F: Fn(A) -> D + Sync + Send,
    {
        assert_same_size("transform", a, &dest);
        self.run_in_strips(GridOp::Transform, dest, |rows, mut part| {
            serial::transform(&a.sub_rows(rows), &mut part, &f);
        })
    }

    /// Like [`GridExecutor::transform`], restricted to pixels whose mask is
    /// set.
    pub fn transform_if<A, M, D, F>(
        &self,
        a: &ImageRef<'_, A>,
        mask: &ImageRef<'_, M>,
        dest: ImageMut<'_, D>,
        f: F,
    ) -> Route
    where
        A: PixelValue,
        M: PixelValue + Default + PartialEq,
        D: PixelValue,
        F: Fn(A) -> D + Sync + Send,
    {
        assert_same_size("transform_if", a, &dest);
        assert_same_size("transform_if", mask, &dest);
        self.run_in_strips(GridOp::TransformMasked, dest, |rows, mut part| {
            serial::transform_if(&a.sub_rows(rows.clone()), &mask.sub_rows(rows), &mut part, &f);
        })
    }

    /// Distance transform of `src` into a caller-provided destination.
    pub fn distance_transform_into<T>(
        &self,
        src: &ImageRef<'_, T>,
        dest: ImageMut<'_, f32>,
        seed: T,
        norm: Norm,
    ) -> Result<DistanceReport, DistanceTransformError>
    where
        T: PixelValue + PartialEq,
    {
        distance::distance_transform(&self.pool, &self.crossover, src, dest, seed, norm)
    }

    /// Distance transform of `src` into a freshly allocated map.
    pub fn distance_transform<T>(
        &self,
        src: &ImageRef<'_, T>,
        seed: T,
        norm: Norm,
    ) -> Result<(Image<f32>, DistanceReport), DistanceTransformError>
    where
        T: PixelValue + PartialEq,
    {
        let (w, h) = src.dimensions();
        let mut out = Image::try_filled(w, h, 0.0f32).map_err(|source| {
            DistanceTransformError::Allocation {
                what: "output",
                len: w * h,
                source,
            }
        })?;
        let report = self.distance_transform_into(src, out.view_mut(), seed, norm)?;
        Ok((out, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parallel(threads: usize) -> GridExecutor {
        GridExecutor::new(
            WorkerPool::with_threads(threads).expect("pool"),
            CrossoverTable::always_parallel(),
        )
    }

    fn noise(w: usize, h: usize, salt: u32) -> Image<u16> {
        Image::from_fn(w, h, |x, y| {
            ((x as u32 * 7919 + y as u32 * 104_729 + salt) % 1021) as u16
        })
    }

    #[test]
    fn small_grids_stay_serial() {
        let exec = GridExecutor::sequential();
        let a = noise(8, 8, 1);
        let mut out = Image::<u16>::new(8, 8);
        let route = exec.transform(&a.view(), out.view_mut(), |p: u16| p + 1);
        assert_eq!(route, Route::Serial);
        assert_eq!(out.get(3, 4), a.get(3, 4) + 1);
    }

    #[test]
    fn parallel_combine_matches_serial() {
        let (a, b, c) = (noise(37, 23, 1), noise(37, 23, 2), noise(37, 23, 3));
        let f2 = |p: u16, q: u16| p as u32 * 3 + q as u32;
        let f3 = |p: u16, q: u16, r: u16| p.max(q).max(r);

        let mut want2 = Image::<u32>::new(37, 23);
        serial::combine_two(&a, &b, &mut want2, &f2);
        let mut want3 = Image::<u16>::new(37, 23);
        serial::combine_three(&a, &b, &c, &mut want3, &f3);

        for threads in [1, 2, 4] {
            let exec = parallel(threads);
            let mut got2 = Image::<u32>::new(37, 23);
            let route = exec.combine_two(&a.view(), &b.view(), got2.view_mut(), f2);
            assert_eq!(route, Route::Parallel);
            assert_eq!(got2, want2, "threads={threads}");

            let mut got3 = Image::<u16>::new(37, 23);
            exec.combine_three(&a.view(), &b.view(), &c.view(), got3.view_mut(), f3);
            assert_eq!(got3, want3, "threads={threads}");
        }
    }

    #[test]
    fn masked_ops_respect_the_mask_in_every_strip() {
        let a = noise(16, 9, 5);
        let mask = Image::from_fn(16, 9, |x, y| (x + y) % 3 == 0);
        let exec = parallel(3);

        let mut out = Image::filled(16, 9, u16::MAX);
        exec.transform_if(&a.view(), &mask.view(), out.view_mut(), |p: u16| p / 2);
        let mut out2 = Image::filled(16, 9, 0u16);
        exec.combine_two_if(&a.view(), &a.view(), &mask.view(), out2.view_mut(), |p: u16, q: u16| {
            p.wrapping_add(q)
        });
        for y in 0..9 {
            for x in 0..16 {
                if mask.get(x, y) {
                    assert_eq!(out.get(x, y), a.get(x, y) / 2);
                    assert_eq!(out2.get(x, y), a.get(x, y).wrapping_add(a.get(x, y)));
                } else {
                    assert_eq!(out.get(x, y), u16::MAX);
                    assert_eq!(out2.get(x, y), 0);
                }
            }
        }
    }

    #[test]
    fn more_workers_than_rows() {
        let a = noise(5, 2, 9);
        let exec = parallel(4);
        let mut out = Image::<u16>::new(5, 2);
        exec.transform(&a.view(), out.view_mut(), |p: u16| p ^ 0xff);
        for (o, p) in out.data.iter().zip(&a.data) {
            assert_eq!(*o, p ^ 0xff);
        }
    }

    #[test]
    fn composite_pixels_use_their_own_threshold() {
        let exec = GridExecutor::sequential();
        // 200 x 200 is above the composite but below the scalar crossover.
        let rgb = Image::filled(200, 200, [1u8, 2, 3]);
        let mut gray = Image::<u8>::new(200, 200);
        let route = exec.transform(&rgb.view(), gray.view_mut(), |p: [u8; 3]| p[0] + p[1] + p[2]);
        assert_eq!(route, Route::Serial);

        let mut doubled = Image::filled(200, 200, [0u8; 3]);
        let route = exec.transform(&rgb.view(), doubled.view_mut(), |p: [u8; 3]| p.map(|v| v * 2));
        assert_eq!(route, Route::Parallel);
        assert!(doubled.data.iter().all(|&p| p == [2, 4, 6]));
    }

    #[test]
    fn writes_into_a_window_only() {
        let a = noise(6, 6, 4);
        let mut canvas = Image::filled(10, 10, 0u16);
        let mut full = canvas.view_mut();
        let window = full.sub_image_mut(2, 3, 6, 6);
        parallel(3).transform(&a.view(), window, |p: u16| p + 1);
        assert_eq!(canvas.get(2, 3), a.get(0, 0) + 1);
        assert_eq!(canvas.get(7, 8), a.get(5, 5) + 1);
        assert_eq!(canvas.get(1, 3), 0);
        assert_eq!(canvas.get(8, 3), 0);
        assert_eq!(canvas.get(2, 9), 0);
    }

    #[test]
    #[should_panic(expected = "sizes differ")]
    fn mismatched_inputs_panic() {
        let a = noise(4, 4, 0);
        let b = noise(4, 5, 0);
        let mut out = Image::<u16>::new(4, 4);
        let exec = GridExecutor::sequential();
        exec.combine_two(&a.view(), &b.view(), out.view_mut(), |p: u16, _q: u16| p);
    }

    #[test]
    fn distance_transform_allocates_the_output() {
        let grid = Image::from_fn(50, 50, |x, y| u8::from(x == 10 && y == 20));
        let (map, report) = parallel(2)
            .distance_transform(&grid.view(), 1, Norm::Manhattan)
            .expect("transform");
        assert_eq!((map.w, map.h), (50, 50));
        assert_eq!(report.route, Route::Parallel);
        assert_eq!(report.workers, 2);
        assert_eq!(map.get(10, 20), 0.0);
        assert_eq!(map.get(49, 49), 39.0 + 29.0);
    }
}
