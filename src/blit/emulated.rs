//! A software stand-in for the blit engine, for tests that compare CPU and hardware drawing.
//!
//! Transfers are accepted and recorded like the real engine does, and only executed against
//! memory when the test calls `complete`, which plays the part of the completion interrupt.

use std::cell::RefCell;
use std::vec::Vec;

use crate::blit::transfer::{BlendConfig, CopyConfig, FillConfig, Layer};
use crate::blit::Blitter;
use crate::color::{Color, ColorFormat};
use crate::geometry::Dimension;
use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Job {
    Fill(Color, FillConfig),
    Copy(CopyConfig),
    Blend(BlendConfig),
}

pub struct EmulatedBlitter {
    pending: RefCell<Option<Job>>,
    issued: RefCell<Vec<Job>>,
}

impl EmulatedBlitter {
    pub fn new() -> Self {
        EmulatedBlitter {
            pending: RefCell::new(None),
            issued: RefCell::new(Vec::new()),
        }
    }

    /// Every transfer accepted so far, oldest first.
    pub fn issued(&self) -> Vec<Job> {
        self.issued.borrow().clone()
    }

    /// Execute the outstanding transfer, if any. Returns whether there was one.
    ///
    /// The buffers named by the transfer must still be alive and in place.
    pub fn complete(&self) -> bool {
        let job = self.pending.borrow_mut().take();
        match job {
            Some(Job::Fill(color, ref config)) => fill(color, config),
            Some(Job::Copy(ref config)) => copy(config),
            Some(Job::Blend(ref config)) => blend(config),
            None => return false,
        }
        true
    }

    fn issue(&self, job: Job) -> Result<(), Error> {
        let mut pending = self.pending.borrow_mut();
        if pending.is_some() {
            return Err(Error::Busy);
        }
        *pending = Some(job);
        self.issued.borrow_mut().push(job);
        Ok(())
    }
}

impl Blitter for EmulatedBlitter {
    fn fill_rectangle(&self, color: Color, config: &FillConfig) -> Result<(), Error> {
        if !color.fits(config.destination.buffer.format) {
            return Err(Error::ColorValueOutOfRange);
        }
        self.issue(Job::Fill(color, *config))
    }

    fn copy_bitmap(&self, config: &CopyConfig) -> Result<(), Error> {
        self.issue(Job::Copy(*config))
    }

    fn blend_bitmap(&self, config: &BlendConfig) -> Result<(), Error> {
        self.issue(Job::Blend(*config))
    }

    fn is_transfer_ongoing(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

/// Address of pixel `(col, row)` of the transfer rectangle within `layer`, walking lines the way
/// the engine does: start address, then pixel size per pixel and line offset per line.
fn pixel_ptr(layer: &Layer, dimension: Dimension, col: u32, row: u32) -> *mut u8 {
    let ps = layer.buffer.format.pixel_size();
    let stride = dimension.width as usize * ps + layer.line_offset(dimension);
    (layer.start_address() + row as usize * stride + col as usize * ps) as *mut u8
}

fn read_pixel(format: ColorFormat, ptr: *const u8) -> Color {
    // Safety: callers pass addresses of live buffers from the transfer config.
    let px = unsafe { core::slice::from_raw_parts(ptr, format.pixel_size()) };
    match format {
        ColorFormat::Argb8888 => Color::argb(px[3], px[2], px[1], px[0]),
        ColorFormat::Rgb888 => Color::argb(255, px[2], px[1], px[0]),
        other => unimplemented!("emulated read of {:?}", other),
    }
}

fn write_pixel(format: ColorFormat, ptr: *mut u8, color: Color) {
    let packed = format.pack(color).to_le_bytes();
    let px = unsafe { core::slice::from_raw_parts_mut(ptr, format.pixel_size()) };
    px.copy_from_slice(&packed[..format.pixel_size()]);
}

fn rows_cols(dimension: Dimension) -> impl Iterator<Item = (u32, u32)> {
    itertools::iproduct!(0..dimension.height, 0..dimension.width)
}

fn fill(color: Color, config: &FillConfig) {
    let dst = &config.destination;
    for (row, col) in rows_cols(config.dimension) {
        write_pixel(
            dst.buffer.format,
            pixel_ptr(dst, config.dimension, col, row),
            color,
        );
    }
}

fn copy(config: &CopyConfig) {
    let (src, dst) = (&config.source, &config.destination);
    for (row, col) in rows_cols(config.dimension) {
        let color = read_pixel(src.buffer.format, pixel_ptr(src, config.dimension, col, row));
        write_pixel(
            dst.buffer.format,
            pixel_ptr(dst, config.dimension, col, row),
            color,
        );
    }
}

fn blend(config: &BlendConfig) {
    let dim = config.dimension;
    for (row, col) in rows_cols(dim) {
        let fg = read_pixel(
            config.foreground.buffer.format,
            pixel_ptr(&config.foreground, dim, col, row),
        );
        let bg = read_pixel(
            config.background.buffer.format,
            pixel_ptr(&config.background, dim, col, row),
        );
        let mix = |f: u8, b: u8| {
            let a = fg.alpha as u32;
            ((a * f as u32 + (255 - a) * b as u32) / 255) as u8
        };
        let out = Color::argb(
            0,
            mix(fg.red, bg.red),
            mix(fg.green, bg.green),
            mix(fg.blue, bg.blue),
        );
        write_pixel(
            config.destination.buffer.format,
            pixel_ptr(&config.destination, dim, col, row),
            out,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::geometry::Position;

    #[test]
    fn busy_until_complete() {
        let mut fb = PixelBuffer::new(Dimension::new(4, 4), ColorFormat::Rgb888, [0u8; 48]).unwrap();
        let emu = EmulatedBlitter::new();
        let config = FillConfig {
            dimension: Dimension::new(2, 2),
            destination: Layer::new(fb.descriptor_mut(), Position::top_left(1, 1)),
        };
        emu.fill_rectangle(Color::rgb(1, 2, 3), &config).unwrap();
        assert!(emu.is_transfer_ongoing());
        assert_eq!(emu.fill_rectangle(Color::rgb(1, 2, 3), &config), Err(Error::Busy));
        assert!(fb.bytes().iter().all(|&b| b == 0));

        assert!(emu.complete());
        assert!(!emu.is_transfer_ongoing());
        assert!(!emu.complete());
        assert_eq!(emu.issued().len(), 1);

        let bytes = fb.bytes();
        for (row, col) in itertools::iproduct!(0..4usize, 0..4usize) {
            let px = &bytes[(row * 4 + col) * 3..][..3];
            if (1..3).contains(&row) && (1..3).contains(&col) {
                assert_eq!(px, &[3, 2, 1]);
            } else {
                assert_eq!(px, &[0, 0, 0]);
            }
        }
    }
}
