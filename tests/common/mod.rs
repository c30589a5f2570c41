#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use folio_rs::config::{Environment, RepoConfig, SiteSettings};
use folio_rs::Site;
use tempfile::TempDir;

/// Remote config URL nothing listens on
pub const OFFLINE_CONFIG_URL: &str = "http://127.0.0.1:9/config.json";

pub fn env() -> Environment {
    Environment::default().with_content_config_url(OFFLINE_CONFIG_URL)
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn item(title: &str, date: &str, extra: &str) -> String {
    format!(
        "---\ntitle: {}\ndate: {}\n{}---\n\nBody of {}.\n",
        title, date, extra, title
    )
}

/// Three published posts, one draft post, one published note, one draft note
/// and two projects
pub fn fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let content = temp.path().join("content");

    write(
        &content.join("posts/first-steps.md"),
        &item("First Steps", "2024-01-01", "tags: [intro]\n"),
    );
    write(
        &content.join("posts/midyear-review.md"),
        &item("Midyear Review", "2024-06-01", "lastModified: 2024-07-15\n"),
    );
    write(
        &content.join("posts/fluency-analyzer-app.md"),
        &item(
            "Fluency Analyzer App",
            "2025-01-01",
            "description: Measuring speech rhythm\ntags: [ml, speech]\n",
        ),
    );
    write(
        &content.join("posts/welsh-draft.md"),
        &item("Welsh Draft", "2025-02-01", "published: false\n"),
    );
    write(
        &content.join("notes/reading-list.md"),
        &item("Reading List", "2024-12-01", "tags: [books]\n"),
    );
    write(
        &content.join("notes/unfinished.md"),
        &item("Unfinished Welsh Notes", "2025-03-01", "published: false\n"),
    );
    write(
        &content.join("projects.json"),
        r#"[
  { "title": "ELISA", "description": "Fake news detection", "href": "https://github.com/u/ELISA",
    "role": "MLOps Engineer", "years": ["2018", "2019"] },
  { "title": "CymruFluency", "description": "Speech assessment", "href": "https://github.com/u/CymruFluency",
    "role": "Lead Researcher", "years": [2025], "featured": true }
]"#,
    );

    (temp, content)
}

pub fn site_with(base: &Path, settings: SiteSettings) -> Site {
    Site::from_parts(base.to_path_buf(), env(), settings, RepoConfig::default())
}

pub fn site(base: &Path) -> Site {
    site_with(base, SiteSettings::default())
}
