//! Nav Engine - demo driver
//!
//! Loads a JSON navigation config, filters it and prints the visible tree
//! together with the active and expanded items for a route.
//!
//! Usage: `nav_engine <config.json> [route]`

use std::path::PathBuf;

use anyhow::{bail, Context};
use nav_engine::navigation::{parse_nav_config, sanitize_nav_items};
use nav_engine::{spawn_sweep_task, EngineConfig, NavigationEngine};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nav_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: nav_engine <config.json> [route]");
    };
    let route = args.next().unwrap_or_else(|| "/".to_string());

    let config = EngineConfig::from_env();
    info!(
        active_cache_size = config.active_cache_size,
        parents_cache_size = config.parents_cache_size,
        cache_ttl_ms = config.cache_ttl_ms,
        access_timeout_ms = ?config.access_timeout_ms,
        "Configuration loaded"
    );

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let items = match parse_nav_config(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(error = %err, "Navigation config has issues; invalid items will be dropped");
            sanitize_nav_items(&raw)
        }
    };

    let engine = NavigationEngine::new(config);
    let sweep = spawn_sweep_task(engine.resolver().clone(), engine.config().sweep_interval());

    let filtered = engine.filter_nav_items(&items).await?;
    let state = engine.state_manager();
    state.update_route(&route, &filtered);
    let snapshot = state.snapshot();

    let report = json!({
        "route": route,
        "items": filtered,
        "activeItems": snapshot.active_items,
        "expandedItems": snapshot.expanded_items,
        "cache": engine.stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    sweep.abort();
    engine.dispose();
    info!("Done");
    Ok(())
}
