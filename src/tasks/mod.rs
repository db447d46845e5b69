//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Sweep: evicts expired local entries at a configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
