//! Driver library for the DMA2D (Chrom-ART) blit engine found on STM32 microcontrollers, and a
//! small set of drawable objects that render into frame buffers either with a CPU pixel loop or
//! through the engine.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate core;

pub mod blit;
pub mod buffer;
pub mod color;
pub mod config;
pub mod drawable;
pub mod geometry;
pub mod interface;
pub mod register;
pub mod timing;

use core::fmt;

// Re-exports for primary API.
pub use blit::{BlitEngine, Blitter};
pub use buffer::{Bitmap, BufferDescriptor, PixelBuffer};
pub use color::{Color, ColorFormat};
pub use config::{BitmapDescription, Config, RectangleDescription};
pub use drawable::bitmap::BitmapImage;
pub use drawable::rectangle::SolidRectangle;
pub use drawable::{Drawable, Hardware};
pub use geometry::{Dimension, Position, Tag};
pub use interface::mmio::Mmio;
pub use timing::Clock;

/// Errors returned by the engine and the drawables.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A transfer is outstanding; nothing was changed.
    Busy,
    /// A color channel exceeds what the destination pixel format can represent.
    ColorValueOutOfRange,
    /// The frame buffer a bitmap is drawn onto is not RGB888.
    UnsupportedFbuffColorFormat,
    /// The bitmap is neither RGB888 nor ARGB8888.
    UnsupportedBitmapColorFormat,
    /// Buffer storage does not hold exactly `width * height` pixels.
    BufferSizeMismatch,
    /// A drawable with zero width or height, sampling outside its bitmap, or a transfer larger
    /// than the engine's line and offset registers can express.
    InvalidDimension,
    /// Draw was called with a buffer other than the one the drawable is bound to.
    TargetMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Error::Busy => "blit engine busy",
            Error::ColorValueOutOfRange => "color value out of range for pixel format",
            Error::UnsupportedFbuffColorFormat => "unsupported frame buffer color format",
            Error::UnsupportedBitmapColorFormat => "unsupported bitmap color format",
            Error::BufferSizeMismatch => "buffer storage size does not match its dimension",
            Error::InvalidDimension => "invalid drawable dimension",
            Error::TargetMismatch => "drawn onto a buffer it is not bound to",
        };
        f.write_str(msg)
    }
}
