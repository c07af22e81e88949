use bitvec::prelude::*;

/// One of four directional cues the player has to reproduce
///
/// Examples:
/// ```
/// use says::Direction;
///
/// let random_byte = 0x07;
/// let direction = Direction::from(random_byte);
///
/// assert_eq!(direction, Direction::Right);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which simultaneous presses are examined: north, east, south, west
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Map a random byte uniformly onto a direction
    pub fn from(raw: u8) -> Self {
        match raw % 4 {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    fn bit(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Set of directional switches that produced an edge within one poll
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Presses([u8; 1]);

impl Presses {
    pub fn new() -> Self {
        Self([0])
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0[..].view_bits_mut::<Lsb0>().set(direction.bit(), true);
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0[..]
            .view_bits::<Lsb0>()
            .get(direction.bit())
            .map(|&bit| bit)
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0[..].view_bits::<Lsb0>().not_any()
    }

    /// Iterate pressed directions in priority order
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::PRIORITY
            .iter()
            .copied()
            .filter(move |&direction| self.contains(direction))
    }

    /// Resolve presses against the expected symbol
    ///
    /// Any pressed switch matching `expected` wins, otherwise the first
    /// pressed switch in priority order is reported as the mismatch.
    /// Returns `None` when nothing was pressed.
    pub fn resolve(&self, expected: Direction) -> Option<Result<Direction, Direction>> {
        if self.contains(expected) {
            Some(Ok(expected))
        } else {
            self.iter().next().map(Err)
        }
    }
}

impl From<Direction> for Presses {
    fn from(direction: Direction) -> Self {
        let mut presses = Presses::new();
        presses.insert(direction);
        presses
    }
}
