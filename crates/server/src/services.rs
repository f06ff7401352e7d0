mod monitor;
mod store;

pub use monitor::{StatusSource, TaskMonitor, MAX_POLL_ATTEMPTS, POLL_INTERVAL};
pub use store::{MemoryTaskStore, TaskStore};
