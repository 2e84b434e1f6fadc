//! Row-loop reference kernels for the per-pixel operations.
//!
//! These run on whatever rectangle they are given; the executor calls them
//! once for the whole grid or once per row strip.
use crate::image::{ImageView, ImageViewMut};

pub(crate) fn assert_same_size<A, B>(what: &str, src: &A, dest: &B)
where
    A: ImageView + ?Sized,
    B: ImageView + ?Sized,
{
    assert_eq!(
        src.dimensions(),
        dest.dimensions(),
        "{what}: source and destination sizes differ"
    );
}

#[inline]
fn is_set<M: Copy + Default + PartialEq>(m: M) -> bool {
    m != M::default()
}

/// `dest(x, y) = f(a(x, y), b(x, y))`
pub fn combine_two<SA, SB, D, F>(a: &SA, b: &SB, dest: &mut D, f: &F)
where
    SA: ImageView,
    SB: ImageView,
    D: ImageViewMut,
    F: Fn(SA::Pixel, SB::Pixel) -> D::Pixel,
{
    assert_same_size("combine_two", a, dest);
    assert_same_size("combine_two", b, dest);
    for y in 0..dest.height() {
        let (ra, rb) = (a.row(y), b.row(y));
        for ((out, &pa), &pb) in dest.row_mut(y).iter_mut().zip(ra).zip(rb) {
            *out = f(pa, pb);
        }
    }
}

/// Like [`combine_two`] but only where `mask` differs from its default value.
pub fn combine_two_if<SA, SB, M, D, F>(a: &SA, b: &SB, mask: &M, dest: &mut D, f: &F)
where
    SA: ImageView,
    SB: ImageView,
    M: ImageView,
    M::Pixel: Default + PartialEq,
    D: ImageViewMut,
    F: Fn(SA::Pixel, SB::Pixel) -> D::Pixel,
{
    assert_same_size("combine_two_if", a, dest);
    assert_same_size("combine_two_if", b, dest);
    assert_same_size("combine_two_if", mask, dest);
    for y in 0..dest.height() {
        let (ra, rb, rm) = (a.row(y), b.row(y), mask.row(y));
        let out = dest.row_mut(y);
        for x in 0..out.len() {
            if is_set(rm[x]) {
                out[x] = f(ra[x], rb[x]);
            }
        }
    }
}

/// `dest(x, y) = f(a(x, y), b(x, y), c(x, y))`
pub fn combine_three<SA, SB, SC, D, F>(a: &SA, b: &SB, c: &SC, dest: &mut D, f: &F)
where
    SA: ImageView,
    SB: ImageView,
    SC: ImageView,
    D: ImageViewMut,
    F: Fn(SA::Pixel, SB::Pixel, SC::Pixel) -> D::Pixel,
{
    assert_same_size("combine_three", a, dest);
    assert_same_size("combine_three", b, dest);
    assert_same_size("combine_three", c, dest);
    for y in 0..dest.height() {
        let (ra, rb, rc) = (a.row(y), b.row(y), c.row(y));
        let out = dest.row_mut(y);
        for x in 0..out.len() {
            out[x] = f(ra[x], rb[x], rc[x]);
        }
    }
}

/// `dest(x, y) = f(a(x, y))`
pub fn transform<SA, D, F>(a: &SA, dest: &mut D, f: &F)
where
    SA: ImageView,
    D: ImageViewMut,
    F: Fn(SA::Pixel) -> D::Pixel,
{
    assert_same_size("transform", a, dest);
    for y in 0..dest.height() {
        let src = a.row(y);
        for (out, &pa) in dest.row_mut(y).iter_mut().zip(src) {
            *out = f(pa);
        }
    }
}

/// Like [`transform`] but only where `mask` differs from its default value.
pub fn transform_if<SA, M, D, F>(a: &SA, mask: &M, dest: &mut D, f: &F)
where
    SA: ImageView,
    M: ImageView,
    M::Pixel: Default + PartialEq,
    D: ImageViewMut,
    F: Fn(SA::Pixel) -> D::Pixel,
{
    assert_same_size("transform_if", a, dest);
    assert_same_size("transform_if", mask, dest);
    for y in 0..dest.height() {
        let (src, rm) = (a.row(y), mask.row(y));
        let out = dest.row_mut(y);
        for x in 0..out.len() {
            if is_set(rm[x]) {
                out[x] = f(src[x]);
            }
        }
    }
}
