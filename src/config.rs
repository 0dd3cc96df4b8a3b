//! Defines structs for relatively-static configuration: the engine's one-time mode settings, and
//! the descriptions drawables are built from.

use crate::buffer::Bitmap;
use crate::color::Color;
use crate::geometry::{Dimension, Position};
use crate::interface::RegisterInterface;
use crate::register::{bits, LineOffsetMode, Register};

/// A configuration for the engine. Builder methods offer a declarative way to either program a
/// setting at init time, or to leave it at the peripheral's reset default.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    line_offset_mode: LineOffsetMode,
    dead_time: Option<u8>,
    line_watermark: Option<u16>,
}

impl Config {
    /// Create a new configuration. Line offsets are expressed in bytes, which the driver's offset
    /// arithmetic relies on.
    pub fn new() -> Self {
        Config {
            line_offset_mode: LineOffsetMode::Bytes,
            dead_time: None,
            line_watermark: None,
        }
    }

    /// Extend this `Config` to enable the AHB master timer, inserting `cycles` of dead time
    /// between consecutive bus accesses so the engine leaves bandwidth to the display controller.
    pub fn dead_time(self, cycles: u8) -> Self {
        Self {
            dead_time: Some(cycles),
            ..self
        }
    }

    /// Extend this `Config` to raise the transfer watermark flag once `line` has been written.
    pub fn line_watermark(self, line: u16) -> Self {
        Self {
            line_watermark: Some(line),
            ..self
        }
    }

    pub fn get_line_offset_mode(&self) -> LineOffsetMode {
        self.line_offset_mode
    }

    /// Program the registers necessary to put the engine into the configuration encoded in
    /// `self`.
    pub(crate) fn apply<RI>(&self, regs: &RI)
    where
        RI: RegisterInterface,
    {
        regs.modify(Register::Cr, |cr| match self.line_offset_mode {
            LineOffsetMode::Bytes => cr | bits::CR_LOM,
            LineOffsetMode::Pixels => cr & !bits::CR_LOM,
        });
        if let Some(cycles) = self.dead_time {
            regs.write(
                Register::Amtcr,
                (cycles as u32) << bits::AMTCR_DT_SHIFT | bits::AMTCR_EN,
            );
        }
        if let Some(line) = self.line_watermark {
            regs.write(Register::Lwr, line as u32);
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

/// Plain-data description of a solid rectangle, consumed once at construction.
#[derive(Clone, Copy, Debug)]
pub struct RectangleDescription {
    pub dimension: Dimension,
    pub position: Position,
    pub color: Color,
}

/// Plain-data description of a bitmap image, consumed once at construction.
///
/// `dimension` is the size drawn on screen; `copy_position` is where, within `bitmap`, sampling
/// starts. Drawing the whole bitmap uses the bitmap's own dimension and the origin.
#[derive(Clone, Copy)]
pub struct BitmapDescription<'a> {
    pub dimension: Dimension,
    pub position: Position,
    pub bitmap: &'a Bitmap<'a>,
    pub copy_position: Position,
}

impl<'a> BitmapDescription<'a> {
    /// Describe drawing all of `bitmap` at `position`.
    pub fn whole(bitmap: &'a Bitmap<'a>, position: Position) -> Self {
        BitmapDescription {
            dimension: bitmap.dimension(),
            position,
            bitmap,
            copy_position: Position::origin(),
        }
    }

    /// Extend this description to sample `dimension` pixels starting at `copy_position`.
    pub fn part(self, copy_position: Position, dimension: Dimension) -> Self {
        Self {
            copy_position,
            dimension,
            ..self
        }
    }
}
