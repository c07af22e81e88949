#![no_std]
pub mod context;
pub mod debounce;
pub mod direction;
pub mod glyph;
pub mod input;
pub mod leaderboard;
pub mod level;
pub mod phase;
pub mod session;
pub mod storage;
pub mod text;

#[cfg(feature = "embedded-graphics")]
pub use embedded_graphics;

pub use context::Context;
pub use debounce::Debouncer;
pub use direction::{Direction, Presses};
pub use input::{Capture, Event, EventConsumer, EventProducer, EventQueue, Switch, Switches};
pub use leaderboard::{Leaderboard, Merge};
pub use level::Level;
pub use phase::{Phase, ResponsePhase};
pub use session::{Session, State};
pub use storage::{MemoryCard, Storage, StorageError};
