//! Context for accessing functionalities of the board the game runs on.
//!
//! Everything behind this trait is an opaque service: drawing, the status
//! LED, blocking delays, the random source and the card file system.

use crate::direction::Direction;
use crate::storage::Storage;

/// Trait aggregating platform functionalities
pub trait Context {
    /// Card holding the score file
    type Card: Storage;

    /// Blank the whole screen
    fn clear_screen(&mut self);
    /// Draw the arrow for `direction` in the middle of the screen
    ///
    /// Called by `Session` once per flash while rendering a level
    fn draw_arrow(&mut self, direction: Direction);
    /// Print a status message, replacing the previous one
    fn show_text(&mut self, text: &str);
    /// Turn the status LED on
    fn led_on(&mut self);
    /// Turn the status LED off
    fn led_off(&mut self);
    /// Busy-wait for `ms` milliseconds
    ///
    /// Input keeps being captured by the scheduled capture task meanwhile
    fn delay_ms(&mut self, ms: u32);
    /// Generate random 8-bit number
    fn gen_random(&mut self) -> u8;
    /// Access the card, whether or not one is inserted
    fn card(&mut self) -> &mut Self::Card;
}
