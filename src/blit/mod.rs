//! The blit engine: a peripheral that fills, copies and blends rectangles of pixel buffers
//! without CPU involvement.
//!
//! Transfers are asynchronous. Issuing one returns as soon as the registers are programmed, and
//! the engine's interrupt handler marks completion later. At most one transfer is outstanding at
//! a time; issuing another meanwhile fails with `Error::Busy` and leaves the engine untouched.

pub mod engine;
pub mod transfer;

#[cfg(test)]
pub mod emulated;

use crate::color::Color;
use crate::Error;

pub use self::engine::BlitEngine;
pub use self::transfer::{BlendConfig, CopyConfig, FillConfig, Layer};

/// The operations drawables need from a blit engine.
///
/// All methods take `&self`: a single engine is shared by every drawable and by the interrupt
/// handler. The at-most-one-transfer rule is enforced by the engine itself, not by borrowing.
pub trait Blitter {
    /// Fill `config.dimension` pixels of the destination with `color`.
    fn fill_rectangle(&self, color: Color, config: &FillConfig) -> Result<(), Error>;

    /// Copy pixels from the source to the destination, converting the pixel format.
    fn copy_bitmap(&self, config: &CopyConfig) -> Result<(), Error>;

    /// Blend the foreground over the background into the destination.
    fn blend_bitmap(&self, config: &BlendConfig) -> Result<(), Error>;

    fn is_transfer_ongoing(&self) -> bool;
}
