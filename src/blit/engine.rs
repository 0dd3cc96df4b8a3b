//! Register-level driver for the DMA2D blit engine.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::blit::transfer::{BlendConfig, CopyConfig, FillConfig, Layer};
use crate::blit::Blitter;
use crate::color::Color;
use crate::config::Config;
use crate::geometry::Dimension;
use crate::interface::RegisterInterface;
use crate::register::{bits, Mode, Register};
use crate::Error;

/// A driver for one blit engine instance.
///
/// Create exactly one per peripheral and share it by reference; route the peripheral's interrupt
/// to `irq_handler`.
///
/// A transfer is at most 16383 pixels wide and 65535 lines high, and every buffer taking part
/// may skip at most 65535 bytes between lines. Transfers beyond these limits are rejected with
/// `Error::InvalidDimension` before any register is written.
pub struct BlitEngine<RI>
where
    RI: RegisterInterface,
{
    regs: RI,
    /// Set by the interrupt handler, cleared when a transfer is issued. Covers the window between
    /// issuing a transfer and `CR.START` reading back as set.
    transfer_completed: AtomicBool,
}

impl<RI> BlitEngine<RI>
where
    RI: RegisterInterface,
{
    /// Construct a driver for the engine behind `regs`.
    pub const fn new(regs: RI) -> Self {
        BlitEngine {
            regs,
            transfer_completed: AtomicBool::new(true),
        }
    }

    /// Give back the register interface.
    pub fn release(self) -> RI {
        self.regs
    }

    /// Apply the one-time mode settings in `config`.
    pub fn init(&self, config: Config) -> Result<(), Error> {
        self.check_idle()?;
        debug!("dma2d init: {:?}", config);
        config.apply(&self.regs);
        Ok(())
    }

    /// Fill a rectangle of the destination with `color`.
    ///
    /// The color is checked against the channel ranges of the destination format before anything
    /// is written, so both `ColorValueOutOfRange` and `Busy` leave the registers as they were.
    pub fn fill_rectangle(&self, color: Color, config: &FillConfig) -> Result<(), Error> {
        let dst = &config.destination;
        let format = dst.buffer.format;
        if !color.fits(format) {
            warn!("fill color {:?} out of range for {:?}", color, format);
            return Err(Error::ColorValueOutOfRange);
        }
        check_size(config.dimension)?;
        check_line_offset(dst, config.dimension)?;
        self.check_idle()?;

        self.set_mode(Mode::RegisterToMemory);
        self.set_output(dst, config.dimension);
        self.set_size(config.dimension);
        self.regs.write(Register::Ocolr, format.pack(color));
        debug!(
            "dma2d fill {}x{} at {:#x}",
            config.dimension.width,
            config.dimension.height,
            dst.start_address()
        );
        self.start();
        Ok(())
    }

    /// Copy a rectangle from the source to the destination with pixel format conversion.
    pub fn copy_bitmap(&self, config: &CopyConfig) -> Result<(), Error> {
        check_size(config.dimension)?;
        check_line_offset(&config.source, config.dimension)?;
        check_line_offset(&config.destination, config.dimension)?;
        self.check_idle()?;

        self.set_mode(Mode::MemoryToMemoryPfc);
        self.set_input(Input::Foreground, &config.source, config.dimension);
        self.set_output(&config.destination, config.dimension);
        self.set_size(config.dimension);
        debug!(
            "dma2d copy {}x{} {:#x} -> {:#x}",
            config.dimension.width,
            config.dimension.height,
            config.source.start_address(),
            config.destination.start_address()
        );
        self.start();
        Ok(())
    }

    /// Blend a rectangle of the foreground over the background into the destination.
    pub fn blend_bitmap(&self, config: &BlendConfig) -> Result<(), Error> {
        check_size(config.dimension)?;
        check_line_offset(&config.foreground, config.dimension)?;
        check_line_offset(&config.background, config.dimension)?;
        check_line_offset(&config.destination, config.dimension)?;
        self.check_idle()?;

        self.set_mode(Mode::MemoryToMemoryBlend);
        self.set_input(Input::Foreground, &config.foreground, config.dimension);
        self.set_input(Input::Background, &config.background, config.dimension);
        self.set_output(&config.destination, config.dimension);
        self.set_size(config.dimension);
        debug!(
            "dma2d blend {}x{} {:#x} over {:#x} -> {:#x}",
            config.dimension.width,
            config.dimension.height,
            config.foreground.start_address(),
            config.background.start_address(),
            config.destination.start_address()
        );
        self.start();
        Ok(())
    }

    /// True while a transfer is outstanding: the hardware still reports it started, or the
    /// completion interrupt has not been handled yet.
    pub fn is_transfer_ongoing(&self) -> bool {
        self.regs.read(Register::Cr) & bits::CR_START != 0
            || !self.transfer_completed.load(Ordering::Acquire)
    }

    /// Service the engine's interrupt. Must be called from the interrupt vector the engine is
    /// wired to.
    pub fn irq_handler(&self) {
        let cr = self.regs.read(Register::Cr);
        let isr = self.regs.read(Register::Isr);
        if cr & bits::CR_TCIE != 0 && isr & bits::ISR_TCIF != 0 {
            self.regs.write(Register::Cr, cr & !bits::CR_TCIE);
            self.regs.write(Register::Ifcr, bits::IFCR_CTCIF);
            self.transfer_completed.store(true, Ordering::Release);
        }
    }

    fn check_idle(&self) -> Result<(), Error> {
        if self.is_transfer_ongoing() {
            warn!("dma2d busy");
            Err(Error::Busy)
        } else {
            Ok(())
        }
    }

    fn set_mode(&self, mode: Mode) {
        self.regs
            .modify(Register::Cr, |cr| cr & !bits::CR_MODE_MASK | mode.bits());
    }

    fn set_input(&self, input: Input, layer: &Layer, dimension: Dimension) {
        let (pfccr, mar, or) = match input {
            Input::Foreground => (Register::Fgpfccr, Register::Fgmar, Register::Fgor),
            Input::Background => (Register::Bgpfccr, Register::Bgmar, Register::Bgor),
        };
        self.regs.modify(pfccr, |w| pfccr_value(w, layer));
        self.regs.write(mar, layer.start_address() as u32);
        self.regs
            .write(or, layer.line_offset(dimension) as u32 & bits::OR_LO_MASK);
    }

    fn set_output(&self, layer: &Layer, dimension: Dimension) {
        self.regs
            .modify(Register::Opfccr, |w| pfccr_value(w, layer));
        self.regs
            .write(Register::Omar, layer.start_address() as u32);
        self.regs.write(
            Register::Oor,
            layer.line_offset(dimension) as u32 & bits::OR_LO_MASK,
        );
    }

    fn set_size(&self, dimension: Dimension) {
        let pl = (dimension.width << bits::NLR_PL_SHIFT) & bits::NLR_PL_MASK;
        let nl = dimension.height & bits::NLR_NL_MASK;
        self.regs.write(Register::Nlr, pl | nl);
    }

    fn start(&self) {
        self.transfer_completed.store(false, Ordering::Release);
        self.regs
            .modify(Register::Cr, |cr| cr | bits::CR_TCIE | bits::CR_START);
    }
}

/// The transfer rectangle must fit the NLR fields: 14 bits of pixels per line, 16 bits of lines.
fn check_size(dimension: Dimension) -> Result<(), Error> {
    if dimension.width > bits::NLR_PL_MASK >> bits::NLR_PL_SHIFT
        || dimension.height > bits::NLR_NL_MASK
    {
        warn!("transfer {:?} exceeds the engine's line limits", dimension);
        return Err(Error::InvalidDimension);
    }
    Ok(())
}

fn check_line_offset(layer: &Layer, dimension: Dimension) -> Result<(), Error> {
    if layer.line_offset(dimension) > bits::OR_LO_MASK as usize {
        warn!("line offset of {:?} exceeds the offset register", layer.buffer);
        return Err(Error::InvalidDimension);
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Input {
    Foreground,
    Background,
}

/// Color mode and red/blue swap of a pixel format converter, keeping the register's other fields.
fn pfccr_value(current: u32, layer: &Layer) -> u32 {
    let format = layer.buffer.format;
    let rbs = if format.is_swapped() {
        bits::PFCCR_RBS
    } else {
        0
    };
    current & !(bits::PFCCR_CM_MASK | bits::PFCCR_RBS) | format.hw_code() | rbs
}

impl<RI> Blitter for BlitEngine<RI>
where
    RI: RegisterInterface,
{
    fn fill_rectangle(&self, color: Color, config: &FillConfig) -> Result<(), Error> {
        BlitEngine::fill_rectangle(self, color, config)
    }

    fn copy_bitmap(&self, config: &CopyConfig) -> Result<(), Error> {
        BlitEngine::copy_bitmap(self, config)
    }

    fn blend_bitmap(&self, config: &BlendConfig) -> Result<(), Error> {
        BlitEngine::blend_bitmap(self, config)
    }

    fn is_transfer_ongoing(&self) -> bool {
        BlitEngine::is_transfer_ongoing(self)
    }
}
