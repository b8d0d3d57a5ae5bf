//! Logging utilities
//!
//! A limpet application draws on the terminal, so logging to stdout/stderr
//! would corrupt the screen. Instead, log records are saved in a global
//! in-memory deque the host can display however it likes.

use lazy_static::lazy_static;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Saves all log records in a global deque.
struct LimpetLogger;

static LOGGER: LimpetLogger = LimpetLogger;

lazy_static! {
    /// Circular buffer for logs.
    pub static ref LOGS: Mutex<VecDeque<(log::Level, String)>> =
        Mutex::new(VecDeque::new());
}

impl log::Log for LimpetLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let mut logs = LOGS.lock().unwrap();
        if logs.len() == logs.capacity() {
            logs.pop_front();
        }
        logs.push_back((record.level(), format!("{}", record.args())));
    }

    fn flush(&self) {}
}

/// Initialize the limpet logger.
///
/// Make sure this is the only logger you are using.
pub fn init() {
    LOGS.lock().unwrap().reserve(1_000);

    // This will panic if `set_logger` was already called.
    log::set_logger(&LOGGER).unwrap();

    log::set_max_level(log::LevelFilter::Trace);
}
