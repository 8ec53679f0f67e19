//! Owned image buffers and borrowed views used by every pipeline stage.
//!
//! - [`RgbImageU8`]: interleaved 8-bit RGB frame (the pipeline's Frame).
//! - [`GrayImageU8`]: owned single-channel 8-bit plane (masks, edge maps).
//! - [`ImageF32`]: owned float plane for gradient buffers.
//!
//! All owned buffers are tightly packed (`stride == width`).

pub mod f32;
pub mod io;
pub mod rgb;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::rgb::RgbImageU8;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::GrayImageU8;
