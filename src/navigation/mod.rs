//! Navigation Module
//!
//! Authorization filtering and active-state resolution for sidebar trees.

mod access;
mod active;
mod filter;
mod hash;
mod item;
mod state;
mod validation;

#[cfg(test)]
mod property_tests;

pub use access::{can_access, can_access_within, is_visible};
pub use active::{ActiveStateResolver, ResolverStats};
pub use filter::{filter_nav_items, filter_nav_items_within};
pub use hash::{djb2, stable_stringify, structural_hash};
pub use item::{AccessCheck, AsyncPredicateFn, NavigationItem, PredicateFn, Visibility};
pub use state::{NavigationEvent, NavigationSnapshot, NavigationStateManager};
pub use validation::{
    parse_nav_config, sanitize_nav_items, validate_item, validate_items, validate_nav_config,
    ValidationReport,
};
