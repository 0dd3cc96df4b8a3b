//! Colors and the pixel formats understood by the blit engine.

/// An ARGB color with 8 bits of storage per channel. How many of those bits are meaningful
/// depends on the pixel format the color is written into; see `ColorFormat::max_color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Color {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Color {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// A color without an alpha component (alpha is left at 0), suitable for formats that carry
    /// no alpha channel such as RGB888 or RGB565.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color::argb(0, red, green, blue)
    }

    /// True if every channel is within the range allowed by `format`.
    pub fn fits(&self, format: ColorFormat) -> bool {
        let max = format.max_color();
        self.alpha <= max.alpha
            && self.red <= max.red
            && self.green <= max.green
            && self.blue <= max.blue
    }
}

/// Pixel representations of buffers taking part in a transfer.
///
/// The `Abgr*`/`Bgr*` variants are the red/blue swapped layouts of their `Argb*`/`Rgb*`
/// counterparts; the engine reads them through the same converter with the swap flag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFormat {
    Argb8888,
    Rgb888,
    Rgb565,
    Argb1555,
    Argb4444,
    Abgr8888,
    Bgr888,
    Bgr565,
    Abgr1555,
    Abgr4444,
}

/// Channel bit widths of a pixel format, in `(alpha, red, green, blue)` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelBits(pub u8, pub u8, pub u8, pub u8);

impl ColorFormat {
    /// Number of bytes occupied by one pixel.
    pub fn pixel_size(self) -> usize {
        match self.unswapped() {
            ColorFormat::Argb8888 => 4,
            ColorFormat::Rgb888 => 3,
            _ => 2,
        }
    }

    /// True for the red/blue swapped variants.
    pub fn is_swapped(self) -> bool {
        match self {
            ColorFormat::Abgr8888
            | ColorFormat::Bgr888
            | ColorFormat::Bgr565
            | ColorFormat::Abgr1555
            | ColorFormat::Abgr4444 => true,
            _ => false,
        }
    }

    /// The format with the regular channel order that this format is a swapped version of.
    pub fn unswapped(self) -> ColorFormat {
        match self {
            ColorFormat::Abgr8888 => ColorFormat::Argb8888,
            ColorFormat::Bgr888 => ColorFormat::Rgb888,
            ColorFormat::Bgr565 => ColorFormat::Rgb565,
            ColorFormat::Abgr1555 => ColorFormat::Argb1555,
            ColorFormat::Abgr4444 => ColorFormat::Argb4444,
            regular => regular,
        }
    }

    pub fn channel_bits(self) -> ChannelBits {
        match self.unswapped() {
            ColorFormat::Argb8888 => ChannelBits(8, 8, 8, 8),
            ColorFormat::Rgb888 => ChannelBits(0, 8, 8, 8),
            ColorFormat::Rgb565 => ChannelBits(0, 5, 6, 5),
            ColorFormat::Argb1555 => ChannelBits(1, 5, 5, 5),
            _ => ChannelBits(4, 4, 4, 4),
        }
    }

    /// The largest value each channel may take when filling a buffer of this format.
    pub fn max_color(self) -> Color {
        let ChannelBits(a, r, g, b) = self.channel_bits();
        Color::argb(max_value(a), max_value(r), max_value(g), max_value(b))
    }

    /// Pack `color` into the register layout used for this format, accumulating channels from
    /// blue in the low bits up to alpha in the high bits. Channel bits beyond the format's width
    /// are masked off.
    pub fn pack(self, color: Color) -> u32 {
        let ChannelBits(a, r, g, b) = self.channel_bits();
        let mut packed = 0u32;
        let mut shift = 0u32;
        for &(value, bits) in &[
            (color.blue, b),
            (color.green, g),
            (color.red, r),
            (color.alpha, a),
        ] {
            packed |= ((value & max_value(bits)) as u32) << shift;
            shift += bits as u32;
        }
        packed
    }

    /// Color mode code as understood by the engine's pixel format converters.
    pub(crate) fn hw_code(self) -> u32 {
        match self.unswapped() {
            ColorFormat::Argb8888 => 0b000,
            ColorFormat::Rgb888 => 0b001,
            ColorFormat::Rgb565 => 0b010,
            ColorFormat::Argb1555 => 0b011,
            _ => 0b100,
        }
    }
}

fn max_value(bits: u8) -> u8 {
    ((1u16 << bits) - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_sizes() {
        assert_eq!(ColorFormat::Argb8888.pixel_size(), 4);
        assert_eq!(ColorFormat::Abgr8888.pixel_size(), 4);
        assert_eq!(ColorFormat::Rgb888.pixel_size(), 3);
        assert_eq!(ColorFormat::Bgr888.pixel_size(), 3);
        assert_eq!(ColorFormat::Rgb565.pixel_size(), 2);
        assert_eq!(ColorFormat::Argb1555.pixel_size(), 2);
        assert_eq!(ColorFormat::Abgr4444.pixel_size(), 2);
    }

    #[test]
    fn max_colors() {
        assert_eq!(ColorFormat::Argb8888.max_color(), Color::argb(255, 255, 255, 255));
        assert_eq!(ColorFormat::Rgb888.max_color(), Color::argb(0, 255, 255, 255));
        assert_eq!(ColorFormat::Rgb565.max_color(), Color::argb(0, 31, 63, 31));
        assert_eq!(ColorFormat::Argb1555.max_color(), Color::argb(1, 31, 31, 31));
        assert_eq!(ColorFormat::Argb4444.max_color(), Color::argb(15, 15, 15, 15));
    }

    #[test]
    fn fits_range() {
        assert!(Color::rgb(31, 63, 31).fits(ColorFormat::Rgb565));
        assert!(!Color::rgb(31, 64, 31).fits(ColorFormat::Rgb565));
        assert!(!Color::argb(2, 0, 0, 0).fits(ColorFormat::Rgb565));
        assert!(Color::rgb(26, 26, 29).fits(ColorFormat::Rgb888));
        assert!(!Color::argb(255, 26, 26, 29).fits(ColorFormat::Rgb888));
    }

    #[test]
    fn pack_per_format() {
        let c = Color::argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(ColorFormat::Argb8888.pack(c), 0x1234_5678);
        assert_eq!(ColorFormat::Rgb888.pack(Color::rgb(0x34, 0x56, 0x78)), 0x0034_5678);
        assert_eq!(ColorFormat::Rgb565.pack(Color::rgb(31, 0, 0)), 0xF800);
        assert_eq!(ColorFormat::Rgb565.pack(Color::rgb(0, 63, 0)), 0x07E0);
        assert_eq!(ColorFormat::Rgb565.pack(Color::rgb(0, 0, 31)), 0x001F);
        assert_eq!(ColorFormat::Argb1555.pack(Color::argb(1, 0, 0, 0)), 0x8000);
        assert_eq!(ColorFormat::Argb4444.pack(Color::argb(0xA, 0xB, 0xC, 0xD)), 0xABCD);
    }

    #[test]
    fn swapped_variants() {
        assert!(ColorFormat::Bgr565.is_swapped());
        assert!(!ColorFormat::Rgb565.is_swapped());
        assert_eq!(ColorFormat::Bgr565.hw_code(), ColorFormat::Rgb565.hw_code());
        assert_eq!(ColorFormat::Abgr4444.hw_code(), 0b100);
    }
}
