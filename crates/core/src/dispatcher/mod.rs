//! Transaction dispatcher.
//!
//! Wires the intake stage and the worker pool around one scheduler and
//! one message queue, and owns their lifecycle (start/stop).

mod config;
mod runner;
mod types;

pub use config::DispatcherConfig;
pub use runner::Dispatcher;
pub use types::*;
