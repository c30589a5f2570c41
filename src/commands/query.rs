//! Print aggregated views as JSON

use anyhow::Result;
use serde::Serialize;

use crate::Site;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn search(site: &Site, query: &str) -> Result<()> {
    let results = site.aggregator().search_content(query).await;
    tracing::info!("{} result(s) for {:?}", results.total, query);
    print_json(&results)
}

pub async fn recent(site: &Site, limit: usize) -> Result<()> {
    print_json(&site.aggregator().recent_content(limit).await)
}

pub async fn summary(site: &Site) -> Result<()> {
    print_json(&site.aggregator().summary().await)
}

/// The resolved content configuration
pub async fn config(site: &Site) -> Result<()> {
    let config = site.resolve_config().await?;
    print_json(config.as_ref())
}
