pub mod buffer;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::buffer::{GrayBuffer, RgbBuffer};
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::{GrayU8, RgbU8};
