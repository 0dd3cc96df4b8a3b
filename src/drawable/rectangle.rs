//! A rectangle of a single color.

use itertools::iproduct;
use log::trace;

use crate::blit::{Blitter, FillConfig, Layer};
use crate::buffer::{BufferDescriptor, PixelBuffer};
use crate::color::Color;
use crate::config::RectangleDescription;
use crate::drawable::{Drawable, DrawableBase};
use crate::geometry::Tag;
use crate::timing::Clock;
use crate::Error;

pub struct SolidRectangle<'a> {
    base: DrawableBase<'a>,
    color: Color,
}

impl<'a> SolidRectangle<'a> {
    /// Build a rectangle from `description`, bound to `target`. The color must be representable
    /// in the target's pixel format.
    pub fn new<S>(
        target: &PixelBuffer<S>,
        description: RectangleDescription,
        blitter: &'a dyn Blitter,
        clock: &'a dyn Clock,
    ) -> Result<Self, Error>
    where
        S: AsRef<[u8]>,
    {
        if !description.color.fits(target.color_format()) {
            return Err(Error::ColorValueOutOfRange);
        }
        let base = DrawableBase::new(
            target.descriptor(),
            description.dimension,
            description.position,
            blitter,
            clock,
        )?;
        Ok(SolidRectangle {
            base,
            color: description.color,
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl<'a> Drawable<'a> for SolidRectangle<'a> {
    fn base(&self) -> &DrawableBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawableBase<'a> {
        &mut self.base
    }

    fn draw_cpu(&mut self, target: &mut [u8]) {
        let desc = *self.base.target();
        let ps = desc.format.pixel_size();
        let packed = desc.format.pack(self.color).to_le_bytes();
        let start = self.base.visible_part_position(Tag::TopLeft);
        let visible = self.base.visible_dimension();
        let (left, top) = (start.x as usize, start.y as usize);
        let stride = desc.dimension.width as usize;

        for (row, col) in iproduct!(
            top..top + visible.height as usize,
            left..left + visible.width as usize
        ) {
            let offset = ps * (row * stride + col);
            target[offset..offset + ps].copy_from_slice(&packed[..ps]);
        }
    }

    fn draw_dma2d(&mut self, target: &BufferDescriptor) -> Result<(), Error> {
        let config = FillConfig {
            dimension: self.base.visible_dimension(),
            destination: Layer::new(*target, self.base.visible_part_position(Tag::TopLeft)),
        };
        trace!("fill {:?}", config);
        self.base.blitter().fill_rectangle(self.color, &config)
    }
}
