mod github;
mod local;

#[cfg(test)]
mod mock;

pub use github::GithubRepository;
pub use local::LocalRepository;

#[cfg(test)]
pub use mock::MockRepository;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::RepoEntry;

/// Remote side of a session: listing, content fetch and content save.
///
/// `repo_id` identifies the repository in whatever form the backend
/// understands; `path` is always root-relative with `/` separators.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn list(&self, repo_id: &str) -> Result<Vec<RepoEntry>>;

    async fn fetch(&self, repo_id: &str, path: &str) -> Result<String>;

    async fn save(&self, repo_id: &str, path: &str, content: &str) -> Result<()>;
}
