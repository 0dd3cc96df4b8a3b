//! Pixel buffers: frame buffers the display scans out, and bitmap assets drawn onto them.
//!
//! A buffer is a row-major block of `width * height` pixels of one `ColorFormat`, with no padding
//! between rows. The storage is generic so that buffers can live in a static array sized at
//! compile time, borrow a slice of flash, or wrap a memory region handed over by the platform.
//! Storage is never reallocated after construction.

use crate::color::ColorFormat;
use crate::geometry::Dimension;
use crate::Error;

/// A contiguous block of pixels.
pub struct PixelBuffer<S> {
    dimension: Dimension,
    format: ColorFormat,
    data: S,
}

/// A read-only bitmap, typically a `static` asset in flash.
pub type Bitmap<'a> = PixelBuffer<&'a [u8]>;

impl<S> PixelBuffer<S>
where
    S: AsRef<[u8]>,
{
    /// Wrap `data` as a buffer of `dimension` pixels in `format`. The storage must hold exactly
    /// `width * height * pixel_size` bytes.
    pub fn new(dimension: Dimension, format: ColorFormat, data: S) -> Result<Self, Error> {
        let expected = dimension.width as usize * dimension.height as usize * format.pixel_size();
        if data.as_ref().len() != expected {
            return Err(Error::BufferSizeMismatch);
        }
        Ok(PixelBuffer {
            dimension,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.dimension.width
    }

    pub fn height(&self) -> u32 {
        self.dimension.height
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn color_format(&self) -> ColorFormat {
        self.format
    }

    pub fn size_bytes(&self) -> usize {
        self.data.as_ref().len()
    }

    pub fn pointer(&self) -> *const u8 {
        self.data.as_ref().as_ptr()
    }

    pub fn bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Describe this buffer for a transfer. The descriptor carries the buffer's address, so the
    /// buffer must stay in place for as long as a transfer using it is outstanding.
    pub fn descriptor(&self) -> BufferDescriptor {
        BufferDescriptor {
            dimension: self.dimension,
            format: self.format,
            address: self.pointer() as usize,
        }
    }

    pub fn into_inner(self) -> S {
        self.data
    }
}

impl<S> PixelBuffer<S>
where
    S: AsRef<[u8]> + AsMut<[u8]>,
{
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }

    /// Descriptor for a buffer the engine will write into.
    pub fn descriptor_mut(&mut self) -> BufferDescriptor {
        let address = self.data.as_mut().as_mut_ptr() as usize;
        BufferDescriptor {
            dimension: self.dimension,
            format: self.format,
            address,
        }
    }
}

/// The geometry, format and address of a buffer, as seen by the blit engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub dimension: Dimension,
    pub format: ColorFormat,
    pub address: usize,
}

impl BufferDescriptor {
    /// Byte address of the pixel at `(x, y)`. Coordinates outside the buffer yield addresses
    /// outside it as well; callers pass clipped positions.
    pub fn pixel_address(&self, x: i32, y: i32) -> usize {
        let pixel = x as i64 + y as i64 * self.dimension.width as i64;
        (self.address as i64 + self.format.pixel_size() as i64 * pixel) as usize
    }

    /// Number of bytes to skip at the end of each line of a `width` pixels wide transfer.
    pub fn line_offset(&self, width: u32) -> usize {
        let skipped = self.dimension.width.saturating_sub(width) as usize;
        self.format.pixel_size() * skipped
    }
}
