//! Full example code for drawing with the DMA2D engine. This runs on an STM32F769I-DISCO, with
//! the LTDC already scanning out a 390x390 RGB888 frame buffer placed in SDRAM by the linker
//! script (section `.sdram`). Bringing up the SDRAM controller and the LTDC is left out.

#![no_main]
#![no_std]

extern crate chromart;
extern crate cortex_m;
extern crate cortex_m_rt;
extern crate embedded_hal as hal_api;
extern crate panic_abort;
extern crate stm32f7;

use chromart::interface::mmio::DMA2D_BASE;
use chromart::{
    BitmapDescription, BitmapImage, BlitEngine, Clock, Color, ColorFormat, Config, Dimension,
    Drawable, Hardware, Mmio, PixelBuffer, Position, RectangleDescription, SolidRectangle, Tag,
};
use cortex_m::asm;
use cortex_m::peripheral::DWT;
use cortex_m_rt::entry;
use stm32f7::stm32f7x9::{interrupt, Interrupt, NVIC};

const WIDTH: u32 = 390;
const HEIGHT: u32 = 390;

// The engine is shared between the main loop and its interrupt handler.
static ENGINE: BlitEngine<Mmio> = BlitEngine::new(unsafe { Mmio::new(DMA2D_BASE) });

#[link_section = ".sdram"]
static mut FRAME_BUFFER: [u8; (WIDTH * HEIGHT * 3) as usize] = [0; (WIDTH * HEIGHT * 3) as usize];

static mut ICON: [u8; 75 * 75 * 4] = [0; 75 * 75 * 4];

#[interrupt]
fn DMA2D() {
    ENGINE.irq_handler();
}

/// Core cycle counter as the draw timing source.
struct CycleCounter;

impl Clock for CycleCounter {
    fn now(&self) -> u32 {
        DWT::get_cycle_count()
    }
}

/// Busy-wait delay at the 216 MHz core clock.
struct SpinDelay;

impl hal_api::blocking::delay::DelayUs<u32> for SpinDelay {
    fn delay_us(&mut self, us: u32) {
        asm::delay(us * 216);
    }
}

#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f7::stm32f7x9::Peripherals::take().unwrap();

    // Clock the DMA2D and enable the cycle counter for the timing records.
    dp.RCC.ahb1enr.modify(|_, w| w.dma2den().enabled());
    cp.DCB.enable_trace();
    cp.DWT.enable_cycle_counter();

    ENGINE.init(Config::new().dead_time(16)).unwrap();
    unsafe { NVIC::unmask(Interrupt::DMA2D) };

    let fb_storage: &'static mut [u8] = unsafe { &mut FRAME_BUFFER[..] };
    let mut fb =
        PixelBuffer::new(Dimension::new(WIDTH, HEIGHT), ColorFormat::Rgb888, fb_storage).unwrap();

    // An orange disc with a soft edge, drawn once into the icon bitmap.
    let icon_storage: &'static mut [u8] = unsafe { &mut ICON[..] };
    for (i, px) in icon_storage.chunks_mut(4).enumerate() {
        let (dx, dy) = ((i % 75) as i32 - 37, (i / 75) as i32 - 37);
        let d2 = dx * dx + dy * dy;
        let alpha = if d2 < 30 * 30 {
            255
        } else if d2 < 37 * 37 {
            (255 * (37 * 37 - d2) / (37 * 37 - 30 * 30)) as u8
        } else {
            0
        };
        px.copy_from_slice(&[0x20, 0x90, 0xF0, alpha]);
    }
    let icon =
        PixelBuffer::new(Dimension::new(75, 75), ColorFormat::Argb8888, &*icon_storage).unwrap();

    let clock = CycleCounter;
    let mut delay = SpinDelay;

    let mut background = SolidRectangle::new(
        &fb,
        RectangleDescription {
            dimension: Dimension::new(WIDTH, 140),
            position: Position::top_left(0, 0),
            color: Color::rgb(26, 26, 29),
        },
        &ENGINE,
        &clock,
    )
    .unwrap();
    let mut badge = BitmapImage::new(
        &fb,
        BitmapDescription::whole(&icon, Position::new(235, 85, Tag::Center)),
        &ENGINE,
        &clock,
    )
    .unwrap();

    // The badge blends over the background, so it must not start before the fill is done.
    background.draw(&mut fb, Hardware::Dma2d).unwrap();
    background.wait_draw_completed(&mut delay, 10).unwrap();
    badge.draw(&mut fb, Hardware::Dma2d).unwrap();
    badge.wait_draw_completed(&mut delay, 10).unwrap();

    // Slide the badge left until it has left the screen; once off-screen, draws cost nothing.
    let mut x = 235;
    loop {
        background.draw(&mut fb, Hardware::Dma2d).unwrap();
        background.wait_draw_completed(&mut delay, 10).unwrap();

        x -= 1;
        badge
            .base_mut()
            .move_to_position(Position::new(x, 85, Tag::Center));
        badge.draw(&mut fb, Hardware::Dma2d).unwrap();
        badge.wait_draw_completed(&mut delay, 10).unwrap();

        if !badge.base().visible_dimension().is_empty() {
            asm::delay(216_000 * 16);
        } else {
            asm::wfi();
        }
    }
}
