//! Drawable objects: rectangles of pixels with a position on a target buffer, drawn either by a
//! CPU pixel loop or by the blit engine.
//!
//! `DrawableBase` holds what every drawable shares: geometry, clipping against the target,
//! per-path timing and the completion callback. Each kind of drawable embeds one and implements
//! the `Drawable` trait, supplying only its two pixel paths; dispatch, bookkeeping and clipping of
//! fully off-screen objects are provided by the trait.

pub mod bitmap;
pub mod rectangle;

use embedded_hal::blocking::delay::DelayUs;
use log::trace;

use crate::blit::Blitter;
use crate::buffer::{BufferDescriptor, PixelBuffer};
use crate::geometry::{clip, visible_span, Dimension, Position, Tag};
use crate::timing::Clock;
use crate::Error;

/// The two ways of putting pixels into a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hardware {
    Cpu,
    Dma2d,
}

impl Hardware {
    fn index(self) -> usize {
        match self {
            Hardware::Cpu => 0,
            Hardware::Dma2d => 1,
        }
    }
}

/// Timing and extent of the most recent draw on one path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawRecord {
    pub drawn_before: bool,
    pub start: u32,
    pub duration: u32,
    pub visible_area: u32,
}

/// Called with the path that drew once a draw has completed.
pub type Callback<'a> = &'a dyn Fn(Hardware);

/// State and geometry common to all drawables.
pub struct DrawableBase<'a> {
    /// Always tagged `Tag::TopLeft`.
    position: Position,
    dimension: Dimension,
    target: BufferDescriptor,
    blitter: &'a dyn Blitter,
    clock: &'a dyn Clock,
    records: [DrawRecord; 2],
    /// The path of a draw that has been issued but not yet seen to complete.
    drawing: Option<Hardware>,
    callback: Option<Callback<'a>>,
}

impl<'a> DrawableBase<'a> {
    /// Bind a drawable of `dimension` at `position` to the buffer described by `target`. The
    /// position may carry any tag; it is stored as the top-left corner.
    pub fn new(
        target: BufferDescriptor,
        dimension: Dimension,
        position: Position,
        blitter: &'a dyn Blitter,
        clock: &'a dyn Clock,
    ) -> Result<Self, Error> {
        if dimension.is_empty() {
            return Err(Error::InvalidDimension);
        }
        Ok(DrawableBase {
            position: position.to_top_left(dimension),
            dimension,
            target,
            blitter,
            clock,
            records: [DrawRecord::default(); 2],
            drawing: None,
            callback: None,
        })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn target(&self) -> &BufferDescriptor {
        &self.target
    }

    pub fn blitter(&self) -> &'a dyn Blitter {
        self.blitter
    }

    /// The coordinate of the point named by `tag`.
    pub fn position(&self, tag: Tag) -> Position {
        self.position.from_top_left(self.dimension, tag)
    }

    /// Move the drawable so that the point named by `position.tag` lands on `position`.
    pub fn move_to_position(&mut self, position: Position) {
        self.position = position.to_top_left(self.dimension);
    }

    /// Width of the part of the drawable that overlaps the target buffer.
    pub fn visible_part_width(&self) -> u32 {
        visible_span(
            self.position.x,
            self.dimension.width,
            self.target.dimension.width,
        )
    }

    /// Height of the part of the drawable that overlaps the target buffer.
    pub fn visible_part_height(&self) -> u32 {
        visible_span(
            self.position.y,
            self.dimension.height,
            self.target.dimension.height,
        )
    }

    pub fn visible_dimension(&self) -> Dimension {
        Dimension::new(self.visible_part_width(), self.visible_part_height())
    }

    /// Like `position`, with each coordinate clamped into the target buffer. The top-left visible
    /// position is where the visible part starts in the target.
    pub fn visible_part_position(&self, tag: Tag) -> Position {
        let p = self.position(tag);
        let (w, h) = (
            self.target.dimension.width as i32,
            self.target.dimension.height as i32,
        );
        Position::new(clip(0, p.x, w), clip(0, p.y, h), tag)
    }

    pub fn register_callback(&mut self, callback: Callback<'a>) {
        self.callback = Some(callback);
    }

    pub fn unregister_callback(&mut self) {
        self.callback = None;
    }

    /// The record of the last draw on `hw`.
    pub fn record(&self, hw: Hardware) -> &DrawRecord {
        &self.records[hw.index()]
    }

    pub fn has_drawn(&self, hw: Hardware) -> bool {
        self.record(hw).drawn_before
    }

    /// Duration of the last completed draw on `hw`, in clock ticks.
    pub fn last_duration(&self, hw: Hardware) -> u32 {
        self.record(hw).duration
    }

    /// Number of pixels touched by the last draw on `hw`.
    pub fn last_visible_area(&self, hw: Hardware) -> u32 {
        self.record(hw).visible_area
    }

    /// True while a draw has been issued and not yet been seen to complete by `poll_draw`.
    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    /// True if the last draw has finished writing pixels. CPU draws finish before `draw` returns;
    /// engine draws finish when the engine reports no transfer outstanding.
    ///
    /// This only observes the engine. The duration of an engine draw is recorded, and the
    /// callback runs, on the next `poll_draw`, `wait_draw_completed` or `draw`; callers that
    /// rely on either should poll with `poll_draw` instead.
    pub fn is_draw_completed(&self) -> bool {
        match self.drawing {
            Some(Hardware::Dma2d) => !self.blitter.is_transfer_ongoing(),
            _ => true,
        }
    }

    /// Check for completion of the last draw without blocking. On the first call that observes
    /// completion, the draw duration is recorded and the callback runs.
    pub fn poll_draw(&mut self) -> nb::Result<(), Error> {
        match self.drawing {
            None => Ok(()),
            Some(hw) if self.is_draw_completed() => {
                self.finish(hw);
                Ok(())
            }
            Some(_) => Err(nb::Error::WouldBlock),
        }
    }

    /// Block until the last draw completes, sleeping `interval_us` microseconds between polls.
    /// There is no timeout; an engine that never completes blocks forever.
    pub fn wait_draw_completed<D>(&mut self, delay: &mut D, interval_us: u32) -> Result<(), Error>
    where
        D: DelayUs<u32>,
    {
        loop {
            match self.poll_draw() {
                Ok(()) => return Ok(()),
                Err(nb::Error::Other(e)) => return Err(e),
                Err(nb::Error::WouldBlock) => delay.delay_us(interval_us),
            }
        }
    }

    fn begin(&mut self, hw: Hardware) {
        let record = &mut self.records[hw.index()];
        record.start = self.clock.now();
        record.visible_area = 0;
        self.drawing = Some(hw);
    }

    fn finish(&mut self, hw: Hardware) {
        let record = &mut self.records[hw.index()];
        record.duration = self.clock.elapsed_since(record.start);
        record.drawn_before = true;
        self.drawing = None;
        trace!("{:?} draw done in {} ticks", hw, record.duration);
        if let Some(callback) = self.callback {
            callback(hw);
        }
    }
}

/// A drawable object: the CPU and engine implementations of putting it on its target, on top of
/// the shared `DrawableBase`.
pub trait Drawable<'a> {
    fn base(&self) -> &DrawableBase<'a>;

    fn base_mut(&mut self) -> &mut DrawableBase<'a>;

    /// Write the visible part into `target`, the bytes of the bound buffer. Only called when the
    /// visible part is not empty.
    fn draw_cpu(&mut self, target: &mut [u8]);

    /// Issue an engine transfer for the visible part into `target`. Only called when the visible
    /// part is not empty.
    fn draw_dma2d(&mut self, target: &BufferDescriptor) -> Result<(), Error>;

    /// Draw onto `target`, which must be the buffer this drawable is bound to.
    ///
    /// A drawable entirely outside its target draws nothing and completes immediately. An engine
    /// draw returns as soon as the transfer is issued; observe completion with `poll_draw`,
    /// `wait_draw_completed` or the callback. While that transfer is outstanding, the target must
    /// not be written through any other path.
    fn draw<S>(&mut self, target: &mut PixelBuffer<S>, hw: Hardware) -> Result<(), Error>
    where
        S: AsRef<[u8]> + AsMut<[u8]>,
        Self: Sized,
    {
        let desc = target.descriptor_mut();
        if desc != *self.base().target() {
            return Err(Error::TargetMismatch);
        }
        // Settle a previous draw first, so its callback runs and its record is closed.
        match self.poll_draw() {
            Ok(()) => {}
            Err(nb::Error::WouldBlock) => return Err(Error::Busy),
            Err(nb::Error::Other(e)) => return Err(e),
        }

        let visible = self.base().visible_dimension();
        let previous = *self.base().record(hw);
        self.base_mut().begin(hw);
        if visible.is_empty() {
            trace!("{:?} draw skipped, off-screen", hw);
        } else {
            match hw {
                Hardware::Cpu => self.draw_cpu(target.bytes_mut()),
                Hardware::Dma2d => {
                    if let Err(e) = self.draw_dma2d(&desc) {
                        // A rejected transfer leaves the drawable as it was.
                        let base = self.base_mut();
                        base.records[hw.index()] = previous;
                        base.drawing = None;
                        return Err(e);
                    }
                }
            }
        }
        self.base_mut().records[hw.index()].visible_area = visible.area();

        if hw == Hardware::Cpu || visible.is_empty() {
            self.base_mut().finish(hw);
        }
        Ok(())
    }

    /// See `DrawableBase::is_draw_completed`.
    fn is_draw_completed(&self) -> bool {
        self.base().is_draw_completed()
    }

    /// See `DrawableBase::poll_draw`.
    fn poll_draw(&mut self) -> nb::Result<(), Error> {
        self.base_mut().poll_draw()
    }

    /// See `DrawableBase::wait_draw_completed`.
    fn wait_draw_completed<D>(&mut self, delay: &mut D, interval_us: u32) -> Result<(), Error>
    where
        D: DelayUs<u32>,
        Self: Sized,
    {
        self.base_mut().wait_draw_completed(delay, interval_us)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::blit::emulated::EmulatedBlitter;
    use crate::blit::{FillConfig, Layer};
    use crate::color::{Color, ColorFormat};
    use crate::timing::fake::FakeClock;

    fn screen() -> BufferDescriptor {
        BufferDescriptor {
            dimension: Dimension::new(390, 390),
            format: ColorFormat::Rgb888,
            address: 0xC000_0000,
        }
    }

    fn base<'a>(
        blitter: &'a EmulatedBlitter,
        clock: &'a FakeClock,
        dim: Dimension,
        pos: Position,
    ) -> DrawableBase<'a> {
        DrawableBase::new(screen(), dim, pos, blitter, clock).unwrap()
    }

    #[test]
    fn stores_top_left() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        let b = base(
            &blitter,
            &clock,
            Dimension::new(75, 75),
            Position::new(235, 85, Tag::Center),
        );
        assert_eq!(b.position(Tag::TopLeft), Position::top_left(198, 48));
        assert_eq!(b.position(Tag::Center), Position::new(235, 85, Tag::Center));
        assert_eq!(
            b.position(Tag::BottomRight),
            Position::new(272, 122, Tag::BottomRight)
        );
    }

    #[test]
    fn rejects_empty_dimension() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        assert_eq!(
            DrawableBase::new(
                screen(),
                Dimension::new(0, 10),
                Position::origin(),
                &blitter,
                &clock
            )
            .err(),
            Some(Error::InvalidDimension)
        );
    }

    #[test]
    fn tag_round_trip_through_base() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        let dim = Dimension::new(40, 17);
        for tag in &[
            Tag::TopLeft,
            Tag::TopRight,
            Tag::BottomLeft,
            Tag::BottomRight,
            Tag::Center,
        ] {
            let input = Position::new(-12, 300, *tag);
            let b = base(&blitter, &clock, dim, input);
            assert_eq!(b.position(*tag), input);
        }
    }

    #[test]
    fn visible_fully_inside() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        let b = base(&blitter, &clock, Dimension::new(390, 140), Position::origin());
        assert_eq!(b.visible_dimension(), Dimension::new(390, 140));
        assert_eq!(b.visible_part_position(Tag::TopLeft), Position::origin());
    }

    #[test]
    fn visible_fully_outside() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        for &pos in &[
            Position::top_left(-100, 10),
            Position::top_left(390, 10),
            Position::top_left(10, -50),
            Position::top_left(10, 1000),
        ] {
            let b = base(&blitter, &clock, Dimension::new(50, 50), pos);
            assert_eq!(b.visible_part_width() * b.visible_part_height(), 0, "{:?}", pos);
        }
        let b = base(&blitter, &clock, Dimension::new(50, 50), Position::top_left(-60, -60));
        assert_eq!(b.visible_dimension(), Dimension::new(0, 0));
    }

    #[test]
    fn visible_partial() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        let b = base(&blitter, &clock, Dimension::new(75, 75), Position::top_left(-5, 350));
        assert_eq!(b.visible_dimension(), Dimension::new(70, 40));
        assert_eq!(b.visible_part_position(Tag::TopLeft), Position::top_left(0, 350));
        assert_eq!(
            b.visible_part_position(Tag::BottomRight),
            Position::new(69, 390, Tag::BottomRight)
        );
    }

    #[test]
    fn move_keeps_dimension() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        let mut b = base(&blitter, &clock, Dimension::new(10, 10), Position::origin());
        b.move_to_position(Position::new(389, 389, Tag::BottomRight));
        assert_eq!(b.position(Tag::TopLeft), Position::top_left(380, 380));
        assert_eq!(b.dimension(), Dimension::new(10, 10));
        assert_eq!(b.visible_dimension(), Dimension::new(10, 10));
    }

    #[test]
    fn completion_follows_engine() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(100));
        let mut fb = testing::rgb888(4, 4, [0, 0, 0]);
        let mut b = DrawableBase::new(
            fb.descriptor_mut(),
            Dimension::new(2, 2),
            Position::origin(),
            &blitter,
            &clock,
        )
        .unwrap();
        assert!(b.is_draw_completed());
        assert_eq!(b.poll_draw(), Ok(()));

        // Stand in for a drawable issuing a transfer.
        b.begin(Hardware::Dma2d);
        blitter
            .fill_rectangle(
                Color::rgb(9, 9, 9),
                &FillConfig {
                    dimension: Dimension::new(2, 2),
                    destination: Layer::new(fb.descriptor_mut(), Position::origin()),
                },
            )
            .unwrap();
        clock.advance(7);
        assert!(!b.is_draw_completed());
        assert_eq!(b.poll_draw(), Err(nb::Error::WouldBlock));
        assert!(!b.has_drawn(Hardware::Dma2d));

        blitter.complete();
        clock.advance(3);
        assert!(b.is_draw_completed());
        assert_eq!(b.poll_draw(), Ok(()));
        assert!(!b.is_drawing());
        assert!(b.has_drawn(Hardware::Dma2d));
        assert_eq!(b.last_duration(Hardware::Dma2d), 10);
        assert!(!b.has_drawn(Hardware::Cpu));
        assert_eq!(&fb.bytes()[..3], &[9, 9, 9]);
    }

    #[test]
    fn wait_polls_with_delay() {
        let (blitter, clock) = (EmulatedBlitter::new(), FakeClock::new(0));
        let mut fb = testing::rgb888(4, 4, [0, 0, 0]);
        let mut b = DrawableBase::new(
            fb.descriptor_mut(),
            Dimension::new(1, 1),
            Position::origin(),
            &blitter,
            &clock,
        )
        .unwrap();
        b.begin(Hardware::Dma2d);
        blitter
            .fill_rectangle(
                Color::rgb(1, 1, 1),
                &FillConfig {
                    dimension: Dimension::new(1, 1),
                    destination: Layer::new(fb.descriptor_mut(), Position::origin()),
                },
            )
            .unwrap();
        let mut delay = testing::FakeDelay {
            clock: &clock,
            blitter: &blitter,
            polls_until_done: 3,
            polls: 0,
        };
        b.wait_draw_completed(&mut delay, 50).unwrap();
        assert_eq!(delay.polls, 3);
        assert_eq!(b.last_duration(Hardware::Dma2d), 150);
    }
}
