use core::convert::Infallible;
use core::sync::atomic::{AtomicU32, Ordering};

use embedded_graphics::{
    fonts::{Font6x8, Text},
    geometry::Point,
    pixelcolor::BinaryColor,
    prelude::*,
    style::TextStyle,
};
use nanorand::{rand::pcg64::Pcg64 as Rng, RNG};
use ssd1306::prelude::*;
use stm32f3xx_hal::{
    delay::Delay,
    hal::{blocking::delay::DelayMs, digital::v2::OutputPin},
};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use peripherals::ppu::{HEIGHT, WIDTH};
use says::{glyph, text, Context, Direction, MemoryCard};

const LINE_HEIGHT: i32 = 8;
const COLUMNS: usize = (WIDTH / 6) as usize;
/// Side of a glyph cell, 9 cells have to fit the panel height
const CELL: i32 = 6;

pub(crate) struct DiscoveryContext<T, L>
where
    T: WriteOnlyDataCommand,
    L: OutputPin<Error = Infallible>,
{
    display: GraphicsMode<T>,
    led: L,
    delay: Delay,
    rng: Rng,
    ticks: &'static AtomicU32,
    card: MemoryCard,
}

impl<T, L> DiscoveryContext<T, L>
where
    T: WriteOnlyDataCommand,
    L: OutputPin<Error = Infallible>,
{
    /// `ticks` is mixed into every random draw, so levels depend on when
    /// the player presses start
    pub fn new(display: GraphicsMode<T>, led: L, delay: Delay, ticks: &'static AtomicU32) -> Self {
        Self {
            display,
            led,
            delay,
            rng: Rng::new_seed(0x5a15_f0e7),
            ticks,
            card: MemoryCard::new(),
        }
    }

    fn flush(&mut self) {
        if self.display.flush().is_err() {
            error!("display flush failed");
        }
    }
}

impl<T, L> Context for DiscoveryContext<T, L>
where
    T: WriteOnlyDataCommand,
    L: OutputPin<Error = Infallible>,
{
    type Card = MemoryCard;

    fn clear_screen(&mut self) {
        self.display.clear();
        self.flush();
    }

    fn draw_arrow(&mut self, direction: Direction) {
        self.display.clear();
        let center = Point::new(WIDTH / 2, HEIGHT / 2);
        if glyph::draw(direction, &mut self.display, center, CELL).is_err() {
            error!("drawing {} arrow failed", direction.as_str());
        }
        self.flush();
    }

    fn show_text(&mut self, message: &str) {
        self.display.clear();
        let style = TextStyle::new(Font6x8, BinaryColor::On);
        let lines = text::wrap(message, COLUMNS).take((HEIGHT / LINE_HEIGHT) as usize);
        for (row, line) in lines.enumerate() {
            let drawn = Text::new(line, Point::new(0, row as i32 * LINE_HEIGHT))
                .into_styled(style)
                .draw(&mut self.display);
            if drawn.is_err() {
                error!("drawing text failed");
                break;
            }
        }
        self.flush();
    }

    fn led_on(&mut self) {
        let _ = self.led.set_high();
    }

    fn led_off(&mut self) {
        let _ = self.led.set_low();
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn gen_random(&mut self) -> u8 {
        self.rng.generate::<u8>() ^ self.ticks.load(Ordering::Relaxed) as u8
    }

    fn card(&mut self) -> &mut MemoryCard {
        &mut self.card
    }
}
