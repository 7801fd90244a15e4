//! Nav Engine - Navigation authorization and active-state resolution
//!
//! Filters sidebar navigation trees by visibility and (possibly async)
//! access checks, and resolves which items are active for the current route
//! using TTL/LRU memo caches.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod navigation;
pub mod tasks;

pub use config::EngineConfig;
pub use engine::NavigationEngine;
pub use error::{NavError, Result};
pub use navigation::{NavigationItem, Visibility};
pub use tasks::spawn_sweep_task;
