//! Configuration module

mod content;
mod env;
mod repo;
pub mod resolver;
mod site;

pub use content::{
    AboutContent, AboutInfo, Bio, ContentConfig, NameForms, PersonalInfo, RepositoryInfo,
    ResumeInfo, SocialLink, Website,
};
pub use env::{Environment, ExecutionContext, Mode, GITHUB_API_URL};
pub use repo::{ContentRepoRef, RepoConfig, RepoRef};
pub use resolver::{ConfigProvider, ConfigResolver, LocalStoreProvider, RemoteStoreProvider};
pub use site::{
    BlogSettings, BuildSettings, FeatureFlags, NotesSettings, ProjectSettings, Route,
    SiteSettings,
};
