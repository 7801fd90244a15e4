//! Validation and sanitization of navigation configuration.
//!
//! The filter and resolver assume a well-formed tree. This layer checks
//! typed items and turns raw JSON into items, dropping malformed nodes with
//! a warning instead of failing.

use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::error::{NavError, Result};
use crate::navigation::item::{NavigationItem, Visibility};

/// Errors and warnings found for one item and its descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn has_known_url_scheme(url: &str) -> bool {
    url.starts_with('/') || url.starts_with("http")
}

// == Validate Item ==
pub fn validate_item(item: &NavigationItem) -> ValidationReport {
    let mut report = ValidationReport::default();

    if item.title.trim().is_empty() {
        report
            .errors
            .push("Item title is required and cannot be empty".to_string());
    }

    match item.url.as_deref() {
        Some("") => report.errors.push("Item URL cannot be empty".to_string()),
        Some(url) if !has_known_url_scheme(url) => report.errors.push(format!(
            "Invalid URL format: \"{url}\". URLs should start with \"/\" or \"http\""
        )),
        _ => {}
    }

    if matches!(item.tooltip.as_deref(), Some("")) {
        report
            .warnings
            .push("Tooltip is empty; the title will not be shown when collapsed".to_string());
    }

    if let Some(children) = &item.items {
        if children.is_empty() {
            report
                .warnings
                .push("Container has no children and will be hidden".to_string());
        }
        for (index, child) in children.iter().enumerate() {
            let child_report = validate_item(child);
            report.errors.extend(
                child_report
                    .errors
                    .into_iter()
                    .map(|e| format!("Child {index}: {e}")),
            );
            report.warnings.extend(
                child_report
                    .warnings
                    .into_iter()
                    .map(|w| format!("Child {index}: {w}")),
            );
        }
    }

    report
}

/// Errors for a list of items, each prefixed with its position and title.
pub fn validate_items(items: &[NavigationItem]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .flat_map(|(index, item)| {
            validate_item(item)
                .errors
                .into_iter()
                .map(move |e| format!("Item {index} ({}): {e}", item.title))
        })
        .collect()
}

// == Raw Configuration ==
/// Checks that `raw` is an array of well-formed navigation items, children
/// included.
///
/// An empty array is valid but logged.
pub fn validate_nav_config(raw: &Value) -> bool {
    if raw.as_array().is_some_and(Vec::is_empty) {
        warn!("Navigation items array is empty");
        return true;
    }

    match parse_nav_config(raw) {
        Ok(_) => true,
        Err(err) => {
            error!(error = %err, "Navigation configuration rejected");
            false
        }
    }
}

/// Strict loader: parses `raw` into items or rejects the whole
/// configuration.
///
/// The error carries the first structural problem, or all validation
/// errors when the structure is sound.
pub fn parse_nav_config(raw: &Value) -> Result<Vec<NavigationItem>> {
    let elements = raw.as_array().ok_or_else(|| {
        NavError::InvalidConfig(format!("expected an array, got {}", json_kind(raw)))
    })?;

    if let Some(reason) = elements
        .iter()
        .enumerate()
        .find_map(|(index, element)| tree_problem(element).map(|r| format!("Item {index}: {r}")))
    {
        return Err(NavError::InvalidConfig(reason));
    }

    let items: Vec<NavigationItem> = elements.iter().filter_map(parse_node).collect();
    let errors = validate_items(&items);
    if !errors.is_empty() {
        return Err(NavError::InvalidConfig(errors.join("; ")));
    }
    Ok(items)
}

/// Converts raw JSON to items, dropping anything malformed.
///
/// Titles are trimmed and children are sanitized recursively. URLs with an
/// unexpected scheme are kept but logged.
pub fn sanitize_nav_items(raw: &Value) -> Vec<NavigationItem> {
    let Some(elements) = raw.as_array() else {
        warn!(kind = json_kind(raw), "Expected array of navigation items");
        return Vec::new();
    };

    elements
        .iter()
        .filter_map(|element| {
            if let Some(reason) = shape_problem(element) {
                warn!(reason = %reason, item = %element, "Filtering out invalid navigation item");
                return None;
            }
            let mut item = parse_node(element)?;
            if let Some(url) = item.url.as_deref() {
                if !has_known_url_scheme(url) {
                    warn!(title = %item.title, url, "Invalid URL format for navigation item");
                }
            }
            item.items = element
                .get("items")
                .filter(|children| !children.is_null())
                .map(sanitize_nav_items);
            Some(item)
        })
        .collect()
}

/// Describes the first structural problem of a raw node, if any.
fn shape_problem(element: &Value) -> Option<String> {
    let Some(obj) = element.as_object() else {
        return Some(format!("expected an object, got {}", json_kind(element)));
    };

    match obj.get("title").and_then(Value::as_str) {
        Some(title) if !title.trim().is_empty() => {}
        _ => return Some("field 'title' must be a non-empty string".to_string()),
    }

    let checks: [(&str, fn(&Value) -> bool); 5] = [
        ("url", |v| v.as_str().is_some_and(|s| !s.is_empty())),
        ("visible", Value::is_boolean),
        ("isActive", Value::is_boolean),
        ("tooltip", Value::is_string),
        ("items", Value::is_array),
    ];
    checks
        .iter()
        .find(|(field, valid)| present(obj, field).is_some_and(|v| !valid(v)))
        .map(|(field, _)| format!("field '{field}' failed validation"))
}

/// Like [`shape_problem`], descending into nested `items`.
fn tree_problem(element: &Value) -> Option<String> {
    if let Some(reason) = shape_problem(element) {
        return Some(reason);
    }
    element
        .get("items")
        .and_then(Value::as_array)?
        .iter()
        .enumerate()
        .find_map(|(index, child)| {
            tree_problem(child).map(|reason| format!("Child item {index}: {reason}"))
        })
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

/// Builds an item's own fields from a shape-checked node; children are
/// parsed without sanitization.
fn parse_node(element: &Value) -> Option<NavigationItem> {
    let obj = element.as_object()?;
    let title = obj.get("title")?.as_str()?.trim().to_string();
    Some(NavigationItem {
        title,
        url: present(obj, "url").and_then(Value::as_str).map(str::to_string),
        is_active: present(obj, "isActive").and_then(Value::as_bool),
        tooltip: present(obj, "tooltip").and_then(Value::as_str).map(str::to_string),
        visible: present(obj, "visible")
            .and_then(Value::as_bool)
            .map(Visibility::Flag),
        can_access: None,
        items: present(obj, "items")
            .and_then(Value::as_array)
            .map(|children| children.iter().filter_map(parse_node).collect()),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
