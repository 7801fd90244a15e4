//! Background Tasks Module
//!
//! Timer-driven work around the memo caches.
//!
//! # Tasks
//! - Debounce: coalesces cache invalidation requests into a single clear
//! - Sweep: purges expired memo entries at a fixed interval

mod debounce;
mod sweep;

pub use debounce::{ClearAction, DebounceHandle, Debouncer};
pub use sweep::spawn_sweep_task;
