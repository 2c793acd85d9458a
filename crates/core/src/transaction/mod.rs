//! Transaction record and inbound payload parsing.
//!
//! This module defines the `Transaction` type that flows through the
//! dispatcher, and the validation applied to raw payloads coming off the
//! message queue.

mod types;

pub use types::*;
