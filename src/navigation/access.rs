//! Visibility and access evaluation for a single navigation item.
//!
//! Visibility predicate errors propagate to the caller. Access check
//! failures (errors, panics and timeouts) fail closed: they are logged and
//! the item is denied.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use anyhow::anyhow;
use futures::FutureExt;
use tracing::warn;

use crate::error::{NavError, Result};
use crate::navigation::item::{AccessCheck, NavigationItem, Visibility};

// == Is Visible ==
/// Resolves an item's visibility. Unset means visible.
pub fn is_visible(item: &NavigationItem) -> Result<bool> {
    match &item.visible {
        Some(Visibility::Predicate(predicate)) => {
            predicate().map_err(|source| NavError::Visibility {
                title: item.title.clone(),
                source,
            })
        }
        Some(Visibility::Flag(flag)) => Ok(*flag),
        None => Ok(true),
    }
}

// == Can Access ==
/// Resolves an item's access permission with no timeout.
pub async fn can_access(item: &NavigationItem) -> bool {
    can_access_within(item, None).await
}

/// Resolves an item's access permission.
///
/// An absent check grants access. With `timeout` set, an async check that
/// does not settle in time is denied.
pub async fn can_access_within(item: &NavigationItem, timeout: Option<Duration>) -> bool {
    let Some(check) = &item.can_access else {
        return true;
    };

    let outcome = match check {
        AccessCheck::Sync(predicate) => catch_unwind(AssertUnwindSafe(|| predicate()))
            .unwrap_or_else(|payload| Err(panic_error(payload))),
        AccessCheck::Async(predicate) => {
            let pending = match catch_unwind(AssertUnwindSafe(|| predicate())) {
                Ok(pending) => AssertUnwindSafe(pending).catch_unwind(),
                Err(payload) => {
                    return deny(item, &panic_error(payload));
                }
            };
            let settled = match timeout {
                Some(limit) => match tokio::time::timeout(limit, pending).await {
                    Ok(settled) => settled,
                    Err(_) => {
                        return deny(
                            item,
                            &anyhow!("timed out after {}ms", limit.as_millis()),
                        );
                    }
                },
                None => pending.await,
            };
            settled.unwrap_or_else(|payload| Err(panic_error(payload)))
        }
    };

    match outcome {
        Ok(granted) => granted,
        Err(err) => deny(item, &err),
    }
}

fn deny(item: &NavigationItem, err: &anyhow::Error) -> bool {
    warn!(
        title = %item.title,
        error = %err,
        "Access control check failed for item \"{}\"",
        item.title
    );
    false
}

fn panic_error(payload: Box<dyn Any + Send>) -> anyhow::Error {
    if let Some(message) = payload.downcast_ref::<&str>() {
        anyhow!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        anyhow!("panicked: {message}")
    } else {
        anyhow!("panicked")
    }
}
