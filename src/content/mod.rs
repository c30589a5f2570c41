//! Content module - posts, notes and their front-matter

mod frontmatter;
mod item;
pub mod loader;
pub mod path;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use item::{sort_by_date_desc, Category, Collection, ContentItem};
pub use loader::ContentReader;
