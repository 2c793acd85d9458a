//! Message queue abstraction.
//!
//! This module provides a `MessageQueue` trait for the external message
//! source feeding the dispatcher. Any broker that can deliver opaque
//! payloads and honor ack/nack can sit behind it; `MemoryQueue` is the
//! in-process implementation used by the daemon and by tests.

mod memory;
mod types;

pub use memory::MemoryQueue;
pub use types::*;
