//! Error types for the navigation engine
//!
//! Provides unified error handling using thiserror. Access-check failures
//! never appear here: they fail closed inside the evaluator.

use thiserror::Error;

// == Navigation Error Enum ==
#[derive(Error, Debug)]
pub enum NavError {
    /// A `visible` predicate failed; propagated to the caller of filtering
    #[error("Visibility check failed for item \"{title}\": {source}")]
    Visibility {
        title: String,
        #[source]
        source: anyhow::Error,
    },

    /// An item did not pass validation
    #[error("Invalid navigation item: {0}")]
    InvalidItem(String),

    /// Navigation configuration could not be used
    #[error("Invalid navigation config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, NavError>;
