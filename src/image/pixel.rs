/// Cell types that can flow through the strip-parallel kernels.
///
/// `IS_SCALAR` separates single-channel cells from composite ones (RGB
/// triples and the like). Composite cells carry more work per pixel, so the
/// crossover table switches them to parallel execution at smaller areas.
pub trait PixelValue: Copy + Send + Sync + 'static {
    const IS_SCALAR: bool;
}

macro_rules! scalar_pixel {
    ($($t:ty),* $(,)?) => {
        $(
            impl PixelValue for $t {
                const IS_SCALAR: bool = true;
            }
        )*
    };
}

scalar_pixel!(bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

impl<T: PixelValue, const N: usize> PixelValue for [T; N] {
    const IS_SCALAR: bool = false;
}
