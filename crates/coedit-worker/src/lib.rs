//! # coedit-worker
//!
//! Scheduled background maintenance. The only recurring task is the
//! idle-session sweep, which closes editor sessions whose heartbeat
//! stopped without a clean close.

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
