//! Owned grid in row-major layout (stride == width).
//!
//! Used for both inputs (masks, label images, RGB triples) and outputs such
//! as distance maps. Borrow it as [`ImageRef`] or [`ImageMut`] to hand it to
//! the executor.
use super::traits::{ImageView, ImageViewMut};
use super::view::{ImageMut, ImageRef};
use std::collections::TryReserveError;

#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<T>,
}

/// Single-channel float image, the output type of the distance transform.
pub type ImageF32 = Image<f32>;

impl<T: Copy + Default> Image<T> {
    /// Construct a default-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, T::default())
    }
}

impl<T: Copy> Image<T> {
    pub fn filled(w: usize, h: usize, value: T) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Like [`Image::filled`] but reports allocation failure instead of aborting.
    pub fn try_filled(w: usize, h: usize, value: T) -> Result<Self, TryReserveError> {
        let len = w * h;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, value);
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Panics if `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            w * h,
            "buffer length does not match {w}x{h} image"
        );
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self::from_vec(w, h, data)
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Borrow as a read-only view.
    pub fn view(&self) -> ImageRef<'_, T> {
        ImageRef::new(self.w, self.h, self.stride, &self.data)
    }

    /// Borrow as a mutable view.
    pub fn view_mut(&mut self) -> ImageMut<'_, T> {
        ImageMut::new(self.w, self.h, self.stride, &mut self.data)
    }
}

impl<T: Copy> ImageView for Image<T> {
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

impl<T: Copy> ImageViewMut for Image<T> {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
