//! ITM backed logger for the `log` facade used across the game.
//!
//! Records are written in an interrupt free section, so the scan interrupt and
//! the session loop can both log without tearing each other's lines.
//!
//! # Examples
//!
//! ```no_run
//! # use peripherals::logger::*;
//! # use log::info;
//! let p = cortex_m::Peripherals::take().unwrap();
//!
//! let logger = create_itm_logger::<InterruptFree>(LevelFilter::Info, p.ITM);
//! unsafe {
//!     init(&logger);
//! }
//!
//! info!("round {} started", 1);
//! ```
//!
//! Reading the output needs ITM enabled in openocd, at the baud rate set by
//! `freeze_clocks`:
//!
//! ```gdb
//! monitor tpiu config internal itm.out uart off 36000000 2000000
//! monitor itm port 0 on
//! ```
//!
//! ```sh
//! itmdump -F -f itm.out
//! ```

use core::marker::{Send, Sync};
use cortex_m::peripheral::ITM;
use cortex_m_log::{
    destination,
    log::{trick_init, Logger},
    modes::InterruptModer,
    printer::{itm::ItmSync, Printer},
};

pub use log::LevelFilter;

pub use cortex_m_log::modes::{InterruptFree, InterruptOk};

/// Create a logger writing to ITM stimulus port 0, filtering below `level`
pub fn create_itm_logger<M>(level: LevelFilter, itm_reg: ITM) -> Logger<ItmSync<M>>
where
    M: InterruptModer + Send + Sync + 'static,
{
    Logger {
        level,
        inner: ItmSync::<M>::new(destination::Itm::new(itm_reg)),
    }
}

/// Install `logger` behind the log facade
///
/// # Safety
///
/// Call once. The logger's lifetime is extended to `'static`, so the instance
/// has to outlive every logging call, which holds when it lives in a
/// diverging `main`.
pub unsafe fn init<P>(logger: &Logger<P>)
where
    P: Printer + Send + Sync + 'static,
{
    trick_init(logger).expect("Failed to initialize logger");
}
