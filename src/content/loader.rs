//! Content loader - reads posts and notes from the content directory

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use super::item::sort_by_date_desc;
use super::{Collection, ContentItem, FrontMatter};
use crate::cache::Memo;
use crate::error::Result;

/// Reads and memoizes file-backed collections
pub struct ContentReader {
    content_dir: PathBuf,
    posts: Memo<Vec<ContentItem>>,
    notes: Memo<Vec<ContentItem>>,
}

impl ContentReader {
    /// Create a reader rooted at a content directory
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.into(),
            posts: Memo::new(),
            notes: Memo::new(),
        }
    }

    /// Re-read collections once `ttl` has elapsed
    pub fn with_revalidate(mut self, ttl: Duration) -> Self {
        self.posts = Memo::with_ttl(ttl);
        self.notes = Memo::with_ttl(ttl);
        self
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.content_dir.join(collection.dir_name())
    }

    fn memo(&self, collection: Collection) -> &Memo<Vec<ContentItem>> {
        match collection {
            Collection::Posts => &self.posts,
            Collection::Notes => &self.notes,
        }
    }

    /// All published items of a collection, newest first
    pub async fn list(&self, collection: Collection) -> Result<Arc<Vec<ContentItem>>> {
        let dir = self.collection_dir(collection);
        self.memo(collection)
            .get_or_try_init(|| load_collection(dir, collection))
            .await
    }

    /// Look up a single item by slug
    pub async fn get(&self, collection: Collection, slug: &str) -> Result<Option<ContentItem>> {
        let items = self.list(collection).await?;
        Ok(items.iter().find(|item| item.slug == slug).cloned())
    }

    /// Forget every memoized collection
    pub async fn invalidate(&self) {
        self.posts.invalidate().await;
        self.notes.invalidate().await;
    }
}

/// Load every published item in `dir`
///
/// A missing directory yields an empty collection. Files that cannot be read
/// or parsed are skipped with a warning.
pub async fn load_collection(dir: PathBuf, collection: Collection) -> Result<Vec<ContentItem>> {
    match tokio::fs::metadata(&dir).await {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(
                "{} directory not found at: {:?}",
                collection.dir_name(),
                dir
            );
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    }

    let files = list_content_files(&dir).await?;

    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        tasks.spawn(async move {
            let result = load_item(&path, collection).await;
            (index, path, result)
        });
    }

    let mut loaded = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(Some(item)))) => loaded.push((index, item)),
            Ok((_, path, Ok(None))) => {
                tracing::debug!("Skipping unpublished {:?}", path);
            }
            Ok((_, path, Err(e))) => {
                tracing::warn!("Failed to load {:?}: {}", path, e);
            }
            Err(e) => {
                tracing::warn!("Content load task failed: {}", e);
            }
        }
    }

    // Restore discovery order so equal dates stay stable
    loaded.sort_by_key(|(index, _)| *index);
    let mut items: Vec<ContentItem> = loaded.into_iter().map(|(_, item)| item).collect();
    sort_by_date_desc(&mut items);

    tracing::debug!("Loaded {} {}", items.len(), collection.dir_name());
    Ok(items)
}

/// Content files directly inside `dir`, in filename order
pub async fn list_content_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file && is_content_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse one file; `None` when it is unpublished
pub async fn load_item(path: &Path, collection: Collection) -> Result<Option<ContentItem>> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_item(path, &content, collection)
}

/// Build an item from file contents
pub fn parse_item(path: &Path, content: &str, collection: Collection) -> Result<Option<ContentItem>> {
    let (fm, body) = FrontMatter::parse(content)?;

    if !fm.published {
        return Ok(None);
    }

    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let slug = build_slug(file_name, fm.slug.as_deref());
    let timestamp = fm.parse_date().unwrap_or_default();

    if fm.date.is_none() {
        tracing::debug!("{:?} has no date, sorting it last", path);
    }

    let mut item = ContentItem::new(collection.category(), slug, fm.date.unwrap_or_default());
    item.title = fm.title.unwrap_or_else(|| item.slug.clone());
    item.description = fm.description.unwrap_or_default();
    item.tags = fm.tags;
    item.last_modified = fm.last_modified;
    item.published = fm.published;
    item.body = body.to_string();
    item.timestamp = timestamp;
    item.source = path.to_path_buf();
    item.extra = fm.extra;

    Ok(Some(item))
}

/// Slug from front-matter if present, else the filename without extension
pub fn build_slug(file_name: &str, front_matter_slug: Option<&str>) -> String {
    if let Some(slug) = front_matter_slug.map(str::trim).filter(|s| !s.is_empty()) {
        return slug.to_string();
    }

    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

/// Check if a file is a recognized content file
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("mdx"))
        .unwrap_or(false)
}
