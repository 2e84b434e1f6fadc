//! Row-oriented access traits shared by owned images and borrowed views.
//!
//! Every grid in the crate is stored row-major with a `stride` (elements
//! between consecutive row starts) that is at least the width. Kernels only
//! ever touch pixels through `row`/`row_mut`, so they work the same on a full
//! image and on a strip or sub-rectangle of it.

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    #[inline]
    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Number of pixels, `width * height`.
    #[inline]
    fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> Self::Pixel {
        self.row(y)[x]
    }

    fn is_contiguous(&self) -> bool {
        self.stride() == self.width()
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    #[inline]
    fn set(&mut self, x: usize, y: usize, value: Self::Pixel) {
        self.row_mut(y)[x] = value;
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.image.height().saturating_sub(self.y);
        (left, Some(left))
    }
}

impl<'a, I: ImageView> ExactSizeIterator for Rows<'a, I> {}
