use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning for the store worker and its handles.
#[derive(Debug, Clone, TypedBuilder)]
pub struct WorkerConfig {
    /// Capacity of each inbound queue. Senders suspend once it is full.
    #[builder(default = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
    /// Upper bound on how long a caller waits for its request to be queued
    /// and answered.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
