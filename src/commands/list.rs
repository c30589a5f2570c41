//! List site content

use anyhow::Result;
use indexmap::IndexMap;

use crate::content::Collection;
use crate::Site;

/// List site content by type
pub async fn run(site: &Site, content_type: &str) -> Result<()> {
    match content_type {
        "project" | "projects" => {
            let projects = site.projects().await?;
            println!("Projects ({}):", projects.len());
            for project in projects.iter() {
                let stars = project
                    .stars
                    .map(|s| format!(" ★{}", s))
                    .unwrap_or_default();
                println!(
                    "  {}{} - {} [{}]{}",
                    if project.featured { "* " } else { "" },
                    project.title,
                    project.role,
                    project.years.join(", "),
                    stars
                );
            }
        }
        "tag" | "tags" => {
            let mut tags: IndexMap<String, usize> = IndexMap::new();
            for collection in Collection::ALL {
                let Ok(items) = site.list(collection).await else {
                    continue;
                };
                for item in items.iter() {
                    for tag in &item.tags {
                        *tags.entry(tag.clone()).or_insert(0) += 1;
                    }
                }
            }
            println!("Tags ({}):", tags.len());
            tags.sort_by(|_, a, _, b| b.cmp(a));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "route" | "routes" => {
            let routes = site.settings.enabled_routes();
            println!("Routes ({}):", routes.len());
            for route in routes {
                println!("  {:<10} {}", route.path, route.name);
            }
        }
        "social" => {
            let config = site.resolve_config().await?;
            let links = config.social_links(true);
            println!("Social links ({}):", links.len());
            for (key, link) in links {
                println!("  {} - {} [{}]", key, link.name, link.url);
            }
        }
        other => match Collection::parse(other) {
            Some(collection) => {
                let items = site.list(collection).await?;
                println!("{} ({}):", capitalize(collection.dir_name()), items.len());
                for item in items.iter() {
                    println!(
                        "  {} - {} [{}]",
                        item.timestamp.format("%Y-%m-%d"),
                        item.title,
                        item.slug
                    );
                }
            }
            None => anyhow::bail!(
                "Unknown type: {}. Available: post, note, project, tag, route, social",
                content_type
            ),
        },
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
