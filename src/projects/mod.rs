//! Projects module - the static project catalog and its enrichment

mod catalog;
pub mod enrich;

pub use catalog::{
    parse_catalog, sort_projects, Project, ProjectCatalog, ProjectRecord, YearValue, PROJECTS_FILE,
};
pub use enrich::{GitHubStars, ProjectEnricher};
