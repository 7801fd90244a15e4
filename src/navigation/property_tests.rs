//! Property-Based Tests for Navigation Module
//!
//! Random trees are checked against a small sequential model of filtering
//! and against the expected ancestor paths of every routed node.

use std::time::Duration;

use anyhow::anyhow;
use futures::FutureExt;
use proptest::prelude::*;

use crate::navigation::{
    filter_nav_items, structural_hash, ActiveStateResolver, NavigationItem,
};

// == Tree Specs ==
#[derive(Debug, Clone, Copy)]
enum Access {
    Unchecked,
    Grant,
    Deny,
    Fail,
    AsyncGrant,
    AsyncFail,
}

impl Access {
    fn grants(self) -> bool {
        matches!(self, Access::Unchecked | Access::Grant | Access::AsyncGrant)
    }
}

#[derive(Debug, Clone)]
struct NodeSpec {
    title: String,
    has_url: bool,
    visible: bool,
    access: Access,
    children: Option<Vec<NodeSpec>>,
}

fn access_strategy() -> impl Strategy<Value = Access> {
    prop_oneof![
        4 => Just(Access::Unchecked),
        2 => Just(Access::Grant),
        1 => Just(Access::Deny),
        1 => Just(Access::Fail),
        2 => Just(Access::AsyncGrant),
        1 => Just(Access::AsyncFail),
    ]
}

fn node_strategy() -> impl Strategy<Value = NodeSpec> {
    let leaf = (
        prop::bool::weighted(0.8),
        access_strategy(),
        any::<bool>(),
        prop::bool::weighted(0.1),
    )
        .prop_map(|(visible, access, has_url, empty_container)| NodeSpec {
            title: String::new(),
            has_url,
            visible,
            access,
            children: empty_container.then(Vec::new),
        });

    leaf.prop_recursive(4, 40, 4, |inner| {
        (
            prop::bool::weighted(0.8),
            access_strategy(),
            any::<bool>(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(visible, access, has_url, children)| NodeSpec {
                title: String::new(),
                has_url,
                visible,
                access,
                children: Some(children),
            })
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<NodeSpec>> {
    prop::collection::vec(node_strategy(), 0..5).prop_map(|mut specs| {
        let mut counter = 0;
        label(&mut specs, &mut counter);
        specs
    })
}

/// Gives every node a unique title (and URL) in depth-first order.
fn label(specs: &mut [NodeSpec], counter: &mut usize) {
    for spec in specs {
        spec.title = format!("n{counter}");
        *counter += 1;
        if let Some(children) = spec.children.as_mut() {
            label(children, counter);
        }
    }
}

fn url_of(spec: &NodeSpec) -> Option<String> {
    spec.has_url.then(|| format!("/{}", spec.title))
}

fn build(specs: &[NodeSpec]) -> Vec<NavigationItem> {
    specs
        .iter()
        .map(|spec| {
            let mut item = NavigationItem::new(spec.title.clone()).with_visible(spec.visible);
            item.url = url_of(spec);
            item = match spec.access {
                Access::Unchecked => item,
                Access::Grant => item.with_access(|| Ok(true)),
                Access::Deny => item.with_access(|| Ok(false)),
                Access::Fail => item.with_access(|| Err(anyhow!("permission service down"))),
                Access::AsyncGrant => item.with_async_access(|| {
                    async {
                        tokio::task::yield_now().await;
                        Ok(true)
                    }
                    .boxed()
                }),
                Access::AsyncFail => {
                    item.with_async_access(|| async { Err(anyhow!("rejected")) }.boxed())
                }
            };
            item.items = spec.children.as_deref().map(build);
            item
        })
        .collect()
}

// == Model ==
#[derive(Debug, Clone, PartialEq, Eq)]
struct Shape {
    title: String,
    children: Option<Vec<Shape>>,
}

fn model_filter(specs: &[NodeSpec]) -> Vec<Shape> {
    let mut kept = Vec::new();
    for spec in specs {
        if !spec.visible || !spec.access.grants() {
            continue;
        }
        match &spec.children {
            None => kept.push(Shape {
                title: spec.title.clone(),
                children: None,
            }),
            Some(children) => {
                let surviving = model_filter(children);
                if !surviving.is_empty() {
                    kept.push(Shape {
                        title: spec.title.clone(),
                        children: Some(surviving),
                    });
                }
            }
        }
    }
    kept
}

fn shape_of(items: &[NavigationItem]) -> Vec<Shape> {
    items
        .iter()
        .map(|item| Shape {
            title: item.title.clone(),
            children: item.items.as_deref().map(shape_of),
        })
        .collect()
}

/// (url, ancestor titles) for every node that has a URL.
fn routed_paths(specs: &[NodeSpec], ancestors: &mut Vec<String>, out: &mut Vec<(String, Vec<String>)>) {
    for spec in specs {
        if let Some(url) = url_of(spec) {
            out.push((url, ancestors.clone()));
        }
        if let Some(children) = &spec.children {
            ancestors.push(spec.title.clone());
            routed_paths(children, ancestors, out);
            ancestors.pop();
        }
    }
}

fn resolver() -> ActiveStateResolver {
    ActiveStateResolver::new(1000, 1000, Duration::from_secs(300))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Filtering matches the sequential model: fail-closed access, pruned
    // empty containers, and preserved leaves, in source order.
    #[test]
    fn prop_filter_matches_model(specs in forest_strategy()) {
        let items = build(&specs);
        let filtered = tokio_test::block_on(filter_nav_items(&items)).unwrap();
        prop_assert_eq!(shape_of(&filtered), model_filter(&specs));
    }

    // No failing or denying check ever lets its item through.
    #[test]
    fn prop_failed_checks_fail_closed(specs in forest_strategy()) {
        fn denied_titles(specs: &[NodeSpec], out: &mut Vec<String>) {
            for spec in specs {
                if !spec.access.grants() {
                    out.push(spec.title.clone());
                }
                if let Some(children) = &spec.children {
                    denied_titles(children, out);
                }
            }
        }
        fn all_titles(shapes: &[Shape], out: &mut Vec<String>) {
            for shape in shapes {
                out.push(shape.title.clone());
                if let Some(children) = &shape.children {
                    all_titles(children, out);
                }
            }
        }

        let filtered = tokio_test::block_on(filter_nav_items(&build(&specs))).unwrap();
        let mut denied = Vec::new();
        denied_titles(&specs, &mut denied);
        let mut kept = Vec::new();
        all_titles(&shape_of(&filtered), &mut kept);

        prop_assert!(kept.iter().all(|title| !denied.contains(title)));
    }

    // Routing to any node expands exactly the titles on its ancestor path.
    #[test]
    fn prop_ancestor_completeness(specs in forest_strategy()) {
        let items = build(&specs);
        let mut paths = Vec::new();
        routed_paths(&specs, &mut Vec::new(), &mut paths);

        let resolver = resolver();
        for (url, ancestors) in paths {
            prop_assert_eq!(resolver.find_active_parents(&items, &url), ancestors);
        }
    }

    // Clearing caches between queries never changes answers.
    #[test]
    fn prop_cache_transparency(
        specs in forest_strategy(),
        clear_pattern in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        let items = build(&specs);
        let mut paths = Vec::new();
        routed_paths(&specs, &mut Vec::new(), &mut paths);
        let routes: Vec<String> = paths
            .into_iter()
            .map(|(url, _)| url)
            .chain(std::iter::once("/unknown".to_string()))
            .collect();

        let warm = resolver();
        for (index, clear) in clear_pattern.iter().enumerate() {
            let route = &routes[index % routes.len()];
            let fresh = resolver();
            if *clear {
                warm.clear();
            }
            prop_assert_eq!(
                warm.find_active_parents(&items, route),
                fresh.find_active_parents(&items, route)
            );
            for item in &items {
                prop_assert_eq!(
                    warm.is_item_active(item, route),
                    fresh.is_item_active(item, route)
                );
            }
        }
    }

    // Independently built, value-equal trees hash identically.
    #[test]
    fn prop_structural_hash_is_content_based(specs in forest_strategy()) {
        prop_assert_eq!(structural_hash(&build(&specs)), structural_hash(&build(&specs)));
    }
}
