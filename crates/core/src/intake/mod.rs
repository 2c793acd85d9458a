//! Intake stage.
//!
//! Bridges the external message queue into the priority scheduler:
//! receives deliveries, validates payloads, and admits transactions.

mod runner;
mod types;

pub use runner::IntakeStage;
pub use types::*;
