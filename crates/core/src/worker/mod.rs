//! Worker loop.
//!
//! Workers drain the scheduler in priority order, run the configured
//! processing function, acknowledge the source message, and emit a
//! structured completion record per transaction.

mod logging;
mod runner;
mod types;

pub use logging::LoggingProcessor;
pub use runner::Worker;
pub use types::*;
