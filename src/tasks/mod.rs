//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cleanup: drops expired cache entries and idle token buckets

mod cleanup;

pub use cleanup::spawn_cleanup_task;
