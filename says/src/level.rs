//! Level generation and the difficulty curve.
//!
//! A level is regenerated from scratch every round, so earlier positions of
//! the sequence differ from the previous round even though the player has
//! to reproduce all of them.

use heapless::{consts::U100, Vec};

use crate::direction::Direction;

/// Maximum number of flashes a level can hold
pub const CAPACITY: usize = 100;

/// Strikes that end a game
pub const MAX_STRIKES: u8 = 3;

const BASE_FLASHES: [usize; 3] = [3, 2, 1];

/// Number of flashes for a level in `round` after `strikes` mismatches
pub fn num_times_to_flash(round: u32, strikes: u8) -> usize {
    let base = BASE_FLASHES[usize::from(strikes.min(2))];
    base + (round / 2) as usize
}

/// Half-period of a single flash, shortening as rounds increase
///
/// Each flash is shown for one unit and blanked for another.
pub fn flash_delay_ms(round: u32) -> u32 {
    match round {
        0..=2 => 1000,
        3..=4 => 750,
        5..=6 => 500,
        _ => 400,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    flashes: Vec<Direction, U100>,
    cursor: usize,
}

impl Level {
    /// Create an empty level
    pub fn new() -> Self {
        Self {
            flashes: Vec::new(),
            cursor: 0,
        }
    }

    /// Generate a level of `len` flashes, each drawn independently from `random`
    pub fn generate<R>(len: usize, mut random: R) -> Result<Self, &'static str>
    where
        R: FnMut() -> u8,
    {
        if len > CAPACITY {
            return Err("Level length exceeds sequence capacity");
        }
        let mut level = Self::new();
        for _ in 0..len {
            level
                .flashes
                .push(Direction::from(random()))
                .or(Err("Level length exceeds sequence capacity"))?;
        }
        Ok(level)
    }

    pub fn len(&self) -> usize {
        self.flashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashes.is_empty()
    }

    pub fn flashes(&self) -> &[Direction] {
        &self.flashes
    }

    /// Number of flashes matched so far
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Symbol the next input has to match
    pub fn expected(&self) -> Option<Direction> {
        self.flashes.get(self.cursor).copied()
    }

    pub fn is_complete(&self) -> bool {
        !self.flashes.is_empty() && self.cursor >= self.flashes.len()
    }

    pub(crate) fn advance(&mut self) -> Result<(), &'static str> {
        if self.cursor < self.flashes.len() {
            self.cursor += 1;
            Ok(())
        } else {
            Err("Attempted to advance past the end of level")
        }
    }

    pub(crate) fn reset(&mut self) {
        self.cursor = 0;
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}
