pub mod config;
pub mod dispatcher;
pub mod intake;
pub mod metrics;
pub mod queue;
pub mod scheduler;
pub mod testing;
pub mod transaction;
pub mod worker;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DispatcherConfig,
    QueueConfig, SchedulerConfig,
};
pub use dispatcher::{Dispatcher, DispatcherStatus};
pub use intake::{IntakeError, IntakeStage};
pub use queue::{AckHandle, Delivery, MemoryQueue, MessageQueue, QueueError};
pub use scheduler::{HeapScheduler, PendingEntry, Scheduler, SchedulerError};
pub use transaction::{PayloadError, Transaction};
pub use worker::{
    CompletionRecord, FailureDisposition, FailureHook, LoggingProcessor, NackOnFailure, Outcome,
    ProcessingError, Processor, Worker,
};
