use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::time;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::core::{
    BuildOptions, FileOperationTracker, Outcome, Phase, build_tree, create_file, display_path,
    resolve, resolve_creation_path, set_content,
};
use crate::error::{FsError, OperationError};
use crate::explorer::{Click, Explorer, FetchTicket};
use crate::models::{NodeRef, Tree};
use crate::repo::Repository;

/// Fetch/save handle bound to one repository, with a timeout on every call.
/// Detached from the session so a host can run it in its own task.
pub struct ContentClient<R> {
    repo: Arc<R>,
    repo_id: Arc<str>,
    timeout: Duration,
}

impl<R> Clone for ContentClient<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            repo_id: Arc::clone(&self.repo_id),
            timeout: self.timeout,
        }
    }
}

impl<R: Repository> ContentClient<R> {
    pub async fn fetch(&self, path: &str) -> Result<String, OperationError> {
        match time::timeout(self.timeout, self.repo.fetch(&self.repo_id, path)).await {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(err)) => Err(OperationError::Fetch(format!("{err:#}"))),
            Err(_) => Err(OperationError::Fetch(format!(
                "timed out after {:?}",
                self.timeout
            ))),
        }
    }

    pub async fn save(&self, path: &str, content: &str) -> Result<(), OperationError> {
        match time::timeout(self.timeout, self.repo.save(&self.repo_id, path, content)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(OperationError::Save(format!("{err:#}"))),
            Err(_) => Err(OperationError::Save(format!(
                "timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

/// Everything one open repository owns: the tree, the working directory,
/// per-file operation state and the explorer context.
pub struct Session<R> {
    client: ContentClient<R>,
    tree: Tree,
    cwd: String,
    tracker: FileOperationTracker,
    explorer: Explorer,
    config: SessionConfig,
}

impl<R: Repository> Session<R> {
    /// List the repository once and build its tree.
    pub async fn open(
        repo: Arc<R>,
        repo_id: impl Into<String>,
        options: &BuildOptions,
        config: SessionConfig,
    ) -> anyhow::Result<Self> {
        let repo_id = repo_id.into();
        let entries = repo
            .list(&repo_id)
            .await
            .with_context(|| format!("failed to list repository {repo_id}"))?;
        let listed = entries.len();
        let tree = build_tree(entries, options)?;
        info!(
            repo = %repo_id,
            listed,
            nodes = tree.node_count(),
            "repository session opened"
        );
        Ok(Self::with_tree(repo, repo_id, tree, config))
    }

    pub fn with_tree(
        repo: Arc<R>,
        repo_id: impl Into<String>,
        tree: Tree,
        config: SessionConfig,
    ) -> Self {
        let client = ContentClient {
            repo,
            repo_id: Arc::from(repo_id.into()),
            timeout: config.fetch_timeout,
        };
        Self {
            client,
            tree,
            cwd: "/".to_owned(),
            tracker: FileOperationTracker::new(),
            explorer: Explorer::new(),
            config,
        }
    }

    pub fn repo_id(&self) -> &str {
        &self.client.repo_id
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn tracker(&self) -> &FileOperationTracker {
        &self.tracker
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn client(&self) -> ContentClient<R> {
        self.client.clone()
    }

    pub fn resolve(&self, expr: &str) -> Option<NodeRef<'_>> {
        resolve(&self.tree, &self.cwd, expr)
    }

    /// Move the working directory; the target must resolve to a directory.
    pub fn change_dir(&mut self, expr: &str) -> Result<&str, FsError> {
        let target = match self.resolve(expr) {
            Some(node) if node.is_dir() => node.display_path(),
            Some(_) => return Err(FsError::NotADirectory(expr.to_owned())),
            None => return Err(FsError::NotFound(expr.to_owned())),
        };
        self.cwd = target;
        Ok(&self.cwd)
    }

    /// Create an empty file at a cwd-relative path. Returns its absolute form.
    pub fn create_file(&mut self, expr: &str) -> Result<String, FsError> {
        let segments = resolve_creation_path(&self.tree, &self.cwd, expr)?;
        create_file(&mut self.tree, &segments.join("/"))?;
        Ok(display_path(&segments))
    }

    /// Fetch a file's current content and cache it on the tree.
    pub async fn fetch_file(&mut self, path: &str) -> Result<String, OperationError> {
        self.tracker.record_start(path, Phase::Loading);
        match self.client.fetch(path).await {
            Ok(content) => {
                self.tracker.record_result(path, Outcome::Done);
                self.cache(path, content.clone());
                Ok(content)
            }
            Err(err) => {
                warn!(%path, %err, "fetch failed");
                self.tracker.record_result(path, Outcome::Error);
                Err(err)
            }
        }
    }

    /// Commit an edit through the save collaborator.
    pub async fn save_file(&mut self, path: &str, content: String) -> Result<(), OperationError> {
        self.tracker.record_start(path, Phase::Saving);
        match self.client.save(path, &content).await {
            Ok(()) => {
                self.tracker.record_result(path, Outcome::Done);
                self.cache(path, content);
                Ok(())
            }
            Err(err) => {
                warn!(%path, %err, "save failed");
                self.tracker.record_result(path, Outcome::Error);
                Err(err)
            }
        }
    }

    pub fn click(&mut self, path: &str) -> Result<Click, FsError> {
        self.explorer.click(&self.tree, &self.tracker, path)
    }

    pub fn deselect(&mut self) {
        self.explorer.deselect();
    }

    /// Apply a finished explorer fetch; stale tickets are ignored.
    pub fn complete_open(
        &mut self,
        ticket: &FetchTicket,
        result: Result<String, OperationError>,
    ) -> bool {
        let fresh = result.as_ref().ok().cloned();
        let applied = self.explorer.complete(&self.tracker, ticket, result);
        if applied && let Some(content) = fresh {
            self.cache(ticket.path(), content);
        }
        applied
    }

    /// Click a path and, for a file, fetch it right away.
    pub async fn open_path(&mut self, path: &str) -> Result<Click, FsError> {
        let click = self.click(path)?;
        if let Click::Opened(ticket) = &click {
            let result = self.client.fetch(ticket.path()).await;
            self.complete_open(ticket, result);
        }
        Ok(click)
    }

    fn cache(&mut self, path: &str, content: String) {
        if let Err(err) = set_content(&mut self.tree, path, content) {
            warn!(%path, %err, "could not cache content");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperationStatus, RepoEntry};
    use crate::repo::MockRepository;

    async fn session(repo: &MockRepository) -> Session<MockRepository> {
        Session::open(
            Arc::new(repo.clone()),
            "acme/widgets",
            &BuildOptions::default(),
            SessionConfig {
                fetch_timeout: Duration::from_millis(500),
                ..SessionConfig::default()
            },
        )
        .await
        .unwrap()
    }

    fn repo() -> MockRepository {
        let repo = MockRepository::default();
        repo.set_listing(vec![
            RepoEntry::file("README.md"),
            RepoEntry::file("src/lib.rs"),
        ]);
        repo
    }

    #[tokio::test]
    async fn open_builds_tree_and_starts_at_root() {
        let session = session(&repo()).await;
        assert_eq!(session.cwd(), "/");
        assert_eq!(session.tree().node_count(), 3);
        assert_eq!(session.repo_id(), "acme/widgets");
    }

    #[tokio::test]
    async fn listing_failure_is_reported() {
        let repo = MockRepository::default();
        repo.set_listing_error("network unreachable");
        let err = Session::open(
            Arc::new(repo),
            "acme/widgets",
            &BuildOptions::default(),
            SessionConfig::default(),
        )
        .await
        .err()
        .unwrap();
        assert!(format!("{err:#}").contains("network unreachable"));
    }

    #[tokio::test]
    async fn fetch_caches_content_and_tracks_status() {
        let repo = repo();
        repo.set_content("src/lib.rs", "pub mod x;");
        let mut session = session(&repo).await;

        let content = session.fetch_file("src/lib.rs").await.unwrap();
        assert_eq!(content, "pub mod x;");
        assert_eq!(
            session.tracker().get("src/lib.rs").unwrap().status,
            OperationStatus::Done
        );
        match session.resolve("/src/lib.rs").unwrap() {
            NodeRef::Node(node) => assert_eq!(node.content(), Some("pub mod x;")),
            NodeRef::Root(_) => panic!("expected file"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out_as_fetch_error() {
        let repo = repo();
        repo.set_content("README.md", "hello");
        repo.set_delay("README.md", Duration::from_secs(5));
        let mut session = session(&repo).await;

        let err = session.fetch_file("README.md").await.unwrap_err();
        assert!(matches!(err, OperationError::Fetch(ref msg) if msg.contains("timed out")));
        assert_eq!(
            session.tracker().get("README.md").unwrap().status,
            OperationStatus::Error
        );
    }

    #[tokio::test]
    async fn save_success_and_failure_drive_tracker() {
        let repo = repo();
        repo.set_save_error("README.md", "permission denied");
        let mut session = session(&repo).await;

        session
            .save_file("src/lib.rs", "// edited".to_owned())
            .await
            .unwrap();
        assert_eq!(
            session.tracker().get("src/lib.rs").unwrap().status,
            OperationStatus::Done
        );
        assert_eq!(
            repo.saves(),
            vec![("src/lib.rs".to_owned(), "// edited".to_owned())]
        );

        let err = session
            .save_file("README.md", "x".to_owned())
            .await
            .unwrap_err();
        assert_eq!(err, OperationError::Save("permission denied".to_owned()));
        assert_eq!(
            session.tracker().get("README.md").unwrap().status,
            OperationStatus::Error
        );
    }

    #[tokio::test]
    async fn explorer_open_fetches_selected_file() {
        let repo = repo();
        repo.set_content("README.md", "# widgets");
        let mut session = session(&repo).await;

        session.open_path("README.md").await.unwrap();
        assert_eq!(session.explorer().selected(), Some("README.md"));
        assert_eq!(session.explorer().content(), Some("# widgets"));

        session.open_path("src").await.unwrap();
        assert!(session.explorer().is_expanded("src"));
    }

    #[tokio::test]
    async fn completion_after_deselect_is_dropped() {
        let repo = repo();
        repo.set_content("README.md", "# widgets");
        let mut session = session(&repo).await;

        let ticket = match session.click("README.md").unwrap() {
            Click::Opened(ticket) => ticket,
            other => panic!("unexpected {other:?}"),
        };
        let client = session.client();
        let result = client.fetch(ticket.path()).await;
        session.deselect();

        assert!(!session.complete_open(&ticket, result));
        assert_eq!(session.explorer().content(), None);
        assert_eq!(
            session.tracker().get("README.md").unwrap().status,
            OperationStatus::Loading
        );
    }

    #[tokio::test]
    async fn change_dir_and_create_file_use_cwd() {
        let mut session = session(&repo()).await;
        assert_eq!(session.change_dir("src").unwrap(), "/src");
        assert_eq!(
            session.change_dir("lib.rs"),
            Err(FsError::NotADirectory("lib.rs".to_owned()))
        );
        assert_eq!(session.cwd(), "/src");

        assert_eq!(session.create_file("bin/main.rs").unwrap(), "/src/bin/main.rs");
        assert!(session.resolve("/src/bin/main.rs").is_some());
    }
}
