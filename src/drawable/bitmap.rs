//! An image drawn from a bitmap asset onto an RGB888 frame buffer.
//!
//! RGB888 bitmaps are copied as-is. ARGB8888 bitmaps are blended over what the frame buffer
//! already holds, per channel: `(alpha * src + (255 - alpha) * dst) / 255`.

use log::trace;

use crate::blit::{BlendConfig, Blitter, CopyConfig, Layer};
use crate::buffer::{Bitmap, BufferDescriptor, PixelBuffer};
use crate::color::ColorFormat;
use crate::config::BitmapDescription;
use crate::drawable::{Drawable, DrawableBase};
use crate::geometry::{Position, Tag};
use crate::timing::Clock;
use crate::Error;

pub struct BitmapImage<'a> {
    base: DrawableBase<'a>,
    bitmap: &'a Bitmap<'a>,
    /// Where sampling starts within the bitmap when the image is fully visible.
    copy_position: Position,
}

impl<'a> BitmapImage<'a> {
    /// Build an image from `description`, bound to `target`.
    ///
    /// The target must be RGB888 and the bitmap RGB888 or ARGB8888. The sampled part of the
    /// bitmap, `description.dimension` pixels from `description.copy_position`, must lie inside
    /// the bitmap.
    pub fn new<S>(
        target: &PixelBuffer<S>,
        description: BitmapDescription<'a>,
        blitter: &'a dyn Blitter,
        clock: &'a dyn Clock,
    ) -> Result<Self, Error>
    where
        S: AsRef<[u8]>,
    {
        if target.color_format() != ColorFormat::Rgb888 {
            return Err(Error::UnsupportedFbuffColorFormat);
        }
        let bitmap = description.bitmap;
        match bitmap.color_format() {
            ColorFormat::Rgb888 | ColorFormat::Argb8888 => {}
            _ => return Err(Error::UnsupportedBitmapColorFormat),
        }
        let copy_position = description.copy_position.to_top_left(description.dimension);
        let fits = |start: i32, len: u32, limit: u32| {
            start >= 0 && start as i64 + len as i64 <= limit as i64
        };
        if !fits(copy_position.x, description.dimension.width, bitmap.width())
            || !fits(copy_position.y, description.dimension.height, bitmap.height())
        {
            return Err(Error::InvalidDimension);
        }
        let base = DrawableBase::new(
            target.descriptor(),
            description.dimension,
            description.position,
            blitter,
            clock,
        )?;
        Ok(BitmapImage {
            base,
            bitmap,
            copy_position,
        })
    }

    pub fn bitmap_format(&self) -> ColorFormat {
        self.bitmap.color_format()
    }

    /// Where in the bitmap the visible part starts.
    ///
    /// An image sticking out past the left or top edge of its target by `d` pixels starts
    /// sampling `d` pixels further in. An image with nothing visible along an axis samples from
    /// the bitmap's width or height on that axis, which names no pixel.
    pub fn visible_copy_position(&self) -> Position {
        let start = self.base.position(Tag::TopLeft);
        let x = if self.base.visible_part_width() == 0 {
            self.bitmap.width() as i32
        } else {
            self.copy_position.x + (-start.x).max(0)
        };
        let y = if self.base.visible_part_height() == 0 {
            self.bitmap.height() as i32
        } else {
            self.copy_position.y + (-start.y).max(0)
        };
        Position::top_left(x, y)
    }

    fn source_layer(&self) -> Layer {
        Layer::new(self.bitmap.descriptor(), self.visible_copy_position())
    }
}

impl<'a> Drawable<'a> for BitmapImage<'a> {
    fn base(&self) -> &DrawableBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase<'a> {
        &mut self.base
    }

    fn draw_cpu(&mut self, target: &mut [u8]) {
        let src_format = self.bitmap.color_format();
        let (src_ps, dst_ps) = (src_format.pixel_size(), ColorFormat::Rgb888.pixel_size());
        let src_stride = self.bitmap.width() as usize * src_ps;
        let dst_stride = self.base.target().dimension.width as usize * dst_ps;

        let copy = self.visible_copy_position();
        let screen = self.base.visible_part_position(Tag::TopLeft);
        let visible = self.base.visible_dimension();
        let src = self.bitmap.bytes();

        for row in 0..visible.height as usize {
            let src_line = &src[(copy.y as usize + row) * src_stride + copy.x as usize * src_ps..]
                [..visible.width as usize * src_ps];
            let dst_line = &mut target
                [(screen.y as usize + row) * dst_stride + screen.x as usize * dst_ps..]
                [..visible.width as usize * dst_ps];

            match src_format {
                ColorFormat::Argb8888 => {
                    for (s, d) in src_line.chunks(4).zip(dst_line.chunks_mut(3)) {
                        let alpha = s[3] as u32;
                        for (sc, dc) in s[..3].iter().zip(d.iter_mut()) {
                            *dc = ((alpha * *sc as u32 + (255 - alpha) * *dc as u32) / 255) as u8;
                        }
                    }
                }
                _ => dst_line.copy_from_slice(src_line),
            }
        }
    }

    fn draw_dma2d(&mut self, target: &BufferDescriptor) -> Result<(), Error> {
        let dimension = self.base.visible_dimension();
        let screen = Layer::new(*target, self.base.visible_part_position(Tag::TopLeft));
        let blitter = self.base.blitter();
        match self.bitmap.color_format() {
            ColorFormat::Argb8888 => {
                let config = BlendConfig {
                    dimension,
                    foreground: self.source_layer(),
                    background: screen,
                    destination: screen,
                };
                trace!("blend {:?}", config);
                blitter.blend_bitmap(&config)
            }
            _ => {
                let config = CopyConfig {
                    dimension,
                    source: self.source_layer(),
                    destination: screen,
                };
                trace!("copy {:?}", config);
                blitter.copy_bitmap(&config)
            }
        }
    }
}
