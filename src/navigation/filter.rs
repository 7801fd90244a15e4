//! Tree filtering by visibility and access.

use std::time::Duration;

use futures::future::{join_all, try_join_all, BoxFuture};
use futures::FutureExt;

use crate::error::Result;
use crate::navigation::access::{can_access_within, is_visible};
use crate::navigation::item::NavigationItem;

// == Filter Nav Items ==
/// Prunes a tree down to the items the current user may see.
///
/// Per level: visibility is checked synchronously, then every surviving
/// sibling's access check is started before any is awaited. Sibling
/// subtrees are filtered concurrently; output order matches input order.
/// A container whose children all get pruned is dropped with them.
pub async fn filter_nav_items(items: &[NavigationItem]) -> Result<Vec<NavigationItem>> {
    filter_nav_items_within(items, None).await
}

/// Same as [`filter_nav_items`], denying async access checks that exceed
/// `timeout`.
pub fn filter_nav_items_within(
    items: &[NavigationItem],
    timeout: Option<Duration>,
) -> BoxFuture<'_, Result<Vec<NavigationItem>>> {
    async move {
        let mut visible = Vec::with_capacity(items.len());
        for item in items {
            if is_visible(item)? {
                visible.push(item);
            }
        }

        let grants = join_all(
            visible
                .iter()
                .map(|item| can_access_within(item, timeout)),
        )
        .await;

        let accessible: Vec<&NavigationItem> = visible
            .into_iter()
            .zip(grants)
            .filter_map(|(item, granted)| granted.then_some(item))
            .collect();

        let subtrees = try_join_all(accessible.iter().map(|item| async move {
            match &item.items {
                Some(children) => filter_nav_items_within(children, timeout).await.map(Some),
                None => Ok(None),
            }
        }))
        .await?;

        Ok(accessible
            .into_iter()
            .zip(subtrees)
            .filter_map(|(item, children)| match children {
                None => Some(shell(item, None)),
                Some(kept) if !kept.is_empty() => Some(shell(item, Some(kept))),
                Some(_) => None,
            })
            .collect())
    }
    .boxed()
}

/// Copies an item's own fields onto a new child list.
fn shell(item: &NavigationItem, items: Option<Vec<NavigationItem>>) -> NavigationItem {
    NavigationItem {
        title: item.title.clone(),
        url: item.url.clone(),
        is_active: item.is_active,
        tooltip: item.tooltip.clone(),
        visible: item.visible.clone(),
        can_access: item.can_access.clone(),
        items,
    }
}
