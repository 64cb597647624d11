// ABOUTME: Session module — durable key-value storage and the in-memory state store.
// ABOUTME: Also provides the per-run JSONL activity log.

pub mod log;
pub mod storage;
pub mod store;

pub use log::ActivityLog;
pub use storage::{FileStorage, Loaded, parse_or_default};
pub use store::*;
