//! Transfer descriptions handed to a `Blitter`.

use crate::buffer::BufferDescriptor;
use crate::geometry::{Dimension, Position};

/// One buffer taking part in a transfer, and where in it the transfer rectangle starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layer {
    pub position: Position,
    pub buffer: BufferDescriptor,
}

impl Layer {
    pub fn new(buffer: BufferDescriptor, position: Position) -> Self {
        Layer { position, buffer }
    }

    /// Address of the first pixel of the transfer rectangle:
    /// `base + pixel_size * (x + y * buffer_width)`.
    pub fn start_address(&self) -> usize {
        self.buffer
            .pixel_address(self.position.x, self.position.y)
    }

    /// Bytes skipped between consecutive lines of a transfer of `dimension`:
    /// `pixel_size * (buffer_width - width)`.
    pub fn line_offset(&self, dimension: Dimension) -> usize {
        self.buffer.line_offset(dimension.width)
    }
}

/// Fill a rectangle of the destination with a constant color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillConfig {
    pub dimension: Dimension,
    pub destination: Layer,
}

/// Copy a rectangle from `source` to `destination`, converting the pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyConfig {
    pub dimension: Dimension,
    pub source: Layer,
    pub destination: Layer,
}

/// Blend a rectangle of `foreground` over `background` into `destination`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendConfig {
    pub dimension: Dimension,
    pub foreground: Layer,
    pub background: Layer,
    pub destination: Layer,
}
