//! sitemap.xml and robots.txt rendering

use chrono::NaiveDate;

use crate::config::Route;
use crate::content::{Category, ContentItem};

/// One `<url>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub priority: &'static str,
}

/// Entries for the enabled routes followed by each post and note
///
/// Route pages are stamped with `today`; items use their last modification
/// date, which falls back to the item's own date.
pub fn sitemap_entries(
    base_url: &str,
    routes: &[Route],
    posts: &[ContentItem],
    notes: &[ContentItem],
    today: NaiveDate,
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let today = today.format("%Y-%m-%d").to_string();

    let mut entries: Vec<SitemapEntry> = routes
        .iter()
        .map(|route| SitemapEntry {
            loc: if route.path == "/" {
                format!("{}/", base)
            } else {
                format!("{}{}", base, route.path)
            },
            lastmod: today.clone(),
            priority: if route.path == "/" { "1.0" } else { "0.8" },
        })
        .collect();

    for item in posts.iter().chain(notes) {
        let section = match item.category {
            Category::Post => "blog",
            Category::Note => "notes",
            Category::Project => continue,
        };
        entries.push(SitemapEntry {
            loc: format!("{}/{}/{}", base, section, item.slug),
            lastmod: item.last_modified_at().format("%Y-%m-%d").to_string(),
            priority: "0.6",
        });
    }

    entries
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_lastmod_falls_back_to_date() {
        let mut edited = ContentItem::new(Category::Post, "edited", "2024-01-01");
        edited.last_modified = Some("2024-03-05".to_string());
        let plain = ContentItem::new(Category::Note, "plain", "2024-02-10");

        let entries = sitemap_entries("https://x.dev/", &[], &[edited], &[plain], today());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].loc, "https://x.dev/blog/edited");
        assert_eq!(entries[0].lastmod, "2024-03-05");
        assert_eq!(entries[1].loc, "https://x.dev/notes/plain");
        assert_eq!(entries[1].lastmod, "2024-02-10");
    }

    #[test]
    fn test_routes_and_render() {
        let routes = vec![
            Route {
                path: "/".to_string(),
                name: "Home".to_string(),
            },
            Route {
                path: "/blog".to_string(),
                name: "Blog".to_string(),
            },
        ];
        let entries = sitemap_entries("https://x.dev", &routes, &[], &[], today());
        assert_eq!(entries[0].loc, "https://x.dev/");
        assert_eq!(entries[0].priority, "1.0");
        assert_eq!(entries[1].loc, "https://x.dev/blog");
        assert_eq!(entries[1].lastmod, "2025-06-01");

        let xml = render_sitemap(&entries);
        assert!(xml.contains("<loc>https://x.dev/blog</loc>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_robots() {
        assert_eq!(
            render_robots("https://x.dev/"),
            "User-agent: *\nAllow: /\n\nSitemap: https://x.dev/sitemap.xml\n"
        );
    }
}
