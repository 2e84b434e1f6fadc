//! Borrowed strided views: read-only [`ImageRef`] and exclusive [`ImageMut`].
//!
//! A view's `data` slice is trimmed to exactly `(h - 1) * stride + w`
//! elements, so the last row may be shorter than `stride`. Sub-rectangles and
//! row strips are again views over the same storage.
use super::traits::{ImageView, ImageViewMut};
use std::ops::Range;

#[inline]
fn required_len(w: usize, h: usize, stride: usize) -> usize {
    if h == 0 {
        0
    } else {
        (h - 1) * stride + w
    }
}

#[derive(Debug)]
pub struct ImageRef<'a, T> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // elements between rows
    pub data: &'a [T],
}

impl<T> Clone for ImageRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ImageRef<'_, T> {}

impl<'a, T> ImageRef<'a, T> {
    /// Wrap `data` as a `w × h` view with the given row stride.
    ///
    /// Panics if `stride < w` or `data` is too short for the requested shape.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a [T]) -> Self {
        assert!(stride >= w || h == 0, "stride {stride} < width {w}");
        let len = required_len(w, h, stride);
        assert!(
            data.len() >= len,
            "view {w}x{h} (stride {stride}) needs {len} elements, got {}",
            data.len()
        );
        Self {
            w,
            h,
            stride,
            data: &data[..len],
        }
    }

    /// Read-only view of the rectangle at `(x0, y0)` with size `w × h`.
    pub fn sub_image(&self, x0: usize, y0: usize, w: usize, h: usize) -> ImageRef<'a, T> {
        assert!(
            x0 + w <= self.w && y0 + h <= self.h,
            "sub-image ({x0},{y0}) {w}x{h} exceeds {}x{}",
            self.w,
            self.h
        );
        if w == 0 || h == 0 {
            return ImageRef {
                w,
                h,
                stride: 0,
                data: &[],
            };
        }
        let offset = y0 * self.stride + x0;
        ImageRef::new(w, h, self.stride, &self.data[offset..])
    }

    /// Full-width view of the rows in `rows`.
    pub fn sub_rows(&self, rows: Range<usize>) -> ImageRef<'a, T> {
        self.sub_image(0, rows.start, self.w, rows.len())
    }
}

impl<'a, T: Copy> ImageView for ImageRef<'a, T> {
    type Pixel = T;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[T] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[derive(Debug)]
pub struct ImageMut<'a, T> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a mut [T],
}

impl<'a, T> ImageMut<'a, T> {
    /// Wrap `data` as a mutable `w × h` view with the given row stride.
    ///
    /// Panics if `stride < w` or `data` is too short for the requested shape.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a mut [T]) -> Self {
        assert!(stride >= w || h == 0, "stride {stride} < width {w}");
        let len = required_len(w, h, stride);
        assert!(
            data.len() >= len,
            "view {w}x{h} (stride {stride}) needs {len} elements, got {}",
            data.len()
        );
        Self {
            w,
            h,
            stride,
            data: &mut data[..len],
        }
    }

    /// Shorter-lived mutable view over the same pixels.
    pub fn reborrow(&mut self) -> ImageMut<'_, T> {
        ImageMut {
            w: self.w,
            h: self.h,
            stride: self.stride,
            data: &mut *self.data,
        }
    }

    /// Mutable view of the rectangle at `(x0, y0)` with size `w × h`.
    pub fn sub_image_mut(&mut self, x0: usize, y0: usize, w: usize, h: usize) -> ImageMut<'_, T> {
        assert!(
            x0 + w <= self.w && y0 + h <= self.h,
            "sub-image ({x0},{y0}) {w}x{h} exceeds {}x{}",
            self.w,
            self.h
        );
        if w == 0 || h == 0 {
            return ImageMut {
                w,
                h,
                stride: 0,
                data: &mut [],
            };
        }
        let offset = y0 * self.stride + x0;
        ImageMut::new(w, h, self.stride, &mut self.data[offset..])
    }

    /// Split into disjoint full-width strips, one per entry of `strips`.
    ///
    /// `strips` must be contiguous, start at row 0 and end at `h`; empty
    /// ranges are allowed and yield zero-height views.
    pub fn split_rows(self, strips: &[Range<usize>]) -> Vec<ImageMut<'a, T>> {
        let ImageMut {
            w,
            h,
            stride,
            mut data,
        } = self;
        let mut next_row = 0usize;
        let mut parts = Vec::with_capacity(strips.len());
        for strip in strips {
            assert_eq!(strip.start, next_row, "row strips must be contiguous");
            assert!(strip.end <= h, "row strip {strip:?} exceeds height {h}");
            let rows = strip.len();
            let take = if strip.end == h {
                data.len()
            } else {
                rows * stride
            };
            let (head, tail) = std::mem::take(&mut data).split_at_mut(take);
            parts.push(if rows == 0 {
                ImageMut {
                    w,
                    h: 0,
                    stride,
                    data: &mut [],
                }
            } else {
                ImageMut::new(w, rows, stride, head)
            });
            data = tail;
            next_row = strip.end;
        }
        assert_eq!(next_row, h, "row strips must cover all {h} rows");
        parts
    }
}

impl<'a, T: Copy> ImageView for ImageMut<'a, T> {
    type Pixel = T;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[T] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl<'a, T: Copy> ImageViewMut for ImageMut<'a, T> {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
