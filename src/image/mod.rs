//! Pixel-grid abstraction: owned images, strided views and access traits.
pub mod buffer;
pub mod io;
pub mod pixel;
pub mod traits;
pub mod view;

pub use self::buffer::{Image, ImageF32};
pub use self::pixel::PixelValue;
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::view::{ImageMut, ImageRef};
