//! Navigation item model.
//!
//! A [`NavigationItem`] is one node of a sidebar tree. Its data fields are
//! serde-serializable so trees can be loaded from JSON and hashed
//! structurally; predicates are attached in code and never serialized.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{NavError, Result};
use crate::navigation::validation::validate_item;

/// Synchronous predicate returning a boolean decision.
pub type PredicateFn = Arc<dyn Fn() -> anyhow::Result<bool> + Send + Sync>;

/// Asynchronous predicate returning a boxed future of the decision.
pub type AsyncPredicateFn =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<bool>> + Send + Sync>;

// == Visibility ==
/// Static flag or zero-argument predicate deciding whether an item shows.
#[derive(Clone)]
pub enum Visibility {
    Flag(bool),
    Predicate(PredicateFn),
}

impl Visibility {
    /// Predicates have no structural representation.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Visibility::Predicate(_))
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Visibility::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Visibility::Flag(flag) => serializer.serialize_bool(*flag),
            Visibility::Predicate(_) => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        bool::deserialize(deserializer).map(Visibility::Flag)
    }
}

// == Access Check ==
/// Permission predicate, either answered immediately or after awaiting.
#[derive(Clone)]
pub enum AccessCheck {
    Sync(PredicateFn),
    Async(AsyncPredicateFn),
}

impl fmt::Debug for AccessCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessCheck::Sync(_) => f.write_str("Sync(..)"),
            AccessCheck::Async(_) => f.write_str("Async(..)"),
        }
    }
}

fn skip_visibility(visible: &Option<Visibility>) -> bool {
    visible.as_ref().map_or(true, Visibility::is_dynamic)
}

// == Navigation Item ==
/// One node of the navigation tree.
///
/// `items: None` marks a true leaf. `items: Some(vec![])` is a container
/// with no children and is pruned by filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "skip_visibility")]
    pub visible: Option<Visibility>,
    #[serde(skip)]
    pub can_access: Option<AccessCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavigationItem>>,
}

impl NavigationItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Forces the active state regardless of the route.
    pub fn active(mut self) -> Self {
        self.is_active = Some(true);
        self
    }

    pub fn with_items(mut self, items: Vec<NavigationItem>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(Visibility::Flag(visible));
        self
    }

    pub fn with_visible_fn<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.visible = Some(Visibility::Predicate(Arc::new(predicate)));
        self
    }

    pub fn with_access<F>(mut self, check: F) -> Self
    where
        F: Fn() -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.can_access = Some(AccessCheck::Sync(Arc::new(check)));
        self
    }

    pub fn with_async_access<F>(mut self, check: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, anyhow::Result<bool>> + Send + Sync + 'static,
    {
        self.can_access = Some(AccessCheck::Async(Arc::new(check)));
        self
    }

    pub fn children(&self) -> &[NavigationItem] {
        self.items.as_deref().unwrap_or_default()
    }

    // == Validated ==
    /// Returns the item if it passes validation, or every problem found.
    ///
    /// A missing tooltip defaults to the title so collapsed sidebars still
    /// have hover text.
    pub fn validated(mut self) -> Result<Self> {
        let report = validate_item(&self);
        if !report.is_valid() {
            return Err(NavError::InvalidItem(report.errors.join("; ")));
        }
        if self.tooltip.is_none() {
            self.tooltip = Some(self.title.clone());
        }
        Ok(self)
    }
}
