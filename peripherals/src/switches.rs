use stm32f3xx_hal as stm32f303;

use stm32f303::hal::digital::v2::InputPin;

use core::convert::Infallible;

/// Switch lines wired between the pins and ground, sampled with pull-ups
///
/// Pins are given in `says::Switch::ALL` order.
pub struct SwitchPins<P> {
    pins: [P; 6],
}

impl<P: InputPin<Error = Infallible>> SwitchPins<P> {
    pub fn new(pins: [P; 6]) -> Self {
        Self { pins }
    }

    /// Sample every line, `true` meaning closed
    pub fn sample(&self) -> [bool; 6] {
        let mut levels = [false; 6];
        for (level, pin) in levels.iter_mut().zip(self.pins.iter()) {
            *level = pin.is_low().unwrap_or(false);
        }
        levels
    }
}
