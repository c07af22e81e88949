//! Switch debouncing for periodic scans of the raw switch lines.

use log::trace;

use crate::input::{Switch, Switches};

/// Consecutive identical samples before a level change is believed
pub const STABLE_SCANS: u8 = 3;

/// Scans a switch has to stay closed to count as a long press
pub const LONG_PRESS_SCANS: u16 = 100;

#[derive(Copy, Clone, Debug, Default)]
struct Line {
    raw: bool,
    stable_for: u8,
    closed: bool,
    held_for: u16,
    press: bool,
    long_press: bool,
}

impl Line {
    fn sample(&mut self, raw: bool) {
        if raw == self.raw {
            self.stable_for = self.stable_for.saturating_add(1);
        } else {
            self.raw = raw;
            self.stable_for = 1;
        }

        if self.stable_for >= STABLE_SCANS && self.raw != self.closed {
            self.closed = self.raw;
            self.held_for = 0;
            if self.closed {
                self.press = true;
            }
        }

        if self.closed {
            self.held_for = self.held_for.saturating_add(1);
            if self.held_for == LONG_PRESS_SCANS {
                self.long_press = true;
            }
        }
    }
}

/// Edge latches for every switch of the board
///
/// Each latch is set once per closure and cleared when taken, so a press that
/// nobody takes is still reported on the next capture cycle.
#[derive(Debug, Default)]
pub struct Debouncer {
    lines: [Line; 6],
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one scan, `levels[switch.index()]` being `true` while closed
    pub fn update(&mut self, levels: [bool; 6]) {
        for (line, &raw) in self.lines.iter_mut().zip(levels.iter()) {
            line.sample(raw);
        }
    }

    /// Debounced level of `switch`
    pub fn is_closed(&self, switch: Switch) -> bool {
        self.lines[switch.index()].closed
    }
}

impl Switches for Debouncer {
    fn take_press(&mut self, switch: Switch) -> bool {
        let taken = core::mem::replace(&mut self.lines[switch.index()].press, false);
        if taken {
            trace!("{:?} pressed", switch);
        }
        taken
    }

    fn take_long_press(&mut self, switch: Switch) -> bool {
        let taken = core::mem::replace(&mut self.lines[switch.index()].long_press, false);
        if taken {
            trace!("{:?} held", switch);
        }
        taken
    }
}
