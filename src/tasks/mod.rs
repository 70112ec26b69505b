//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries while auto-cleanup is on

mod cleanup;

pub use cleanup::spawn_cleanup_task;
