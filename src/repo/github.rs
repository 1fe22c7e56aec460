use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::RepoEntry;

use super::Repository;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_BRANCH: &str = "main";

/// Read-only access to a GitHub repository through the REST API.
///
/// `repo_id` is `owner/repo`, optionally suffixed with `@branch`; a full
/// `https://github.com/owner/repo` URL is accepted as well.
pub struct GithubRepository {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

#[derive(Debug, Eq, PartialEq)]
struct RepoRef {
    owner: String,
    name: String,
    branch: String,
}

#[derive(Deserialize)]
struct GitTree {
    tree: Vec<GitTreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct GitTreeItem {
    path: String,
    #[serde(rename = "type")]
    item_type: String,
}

impl GithubRepository {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("reposhell/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_owned(),
            token,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    /// Append `segments` to the API base, percent-encoding each one.
    fn api_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .with_context(|| format!("invalid API base {:?}", self.api_base))?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("API base {:?} cannot take a path", self.api_base))?
            .pop_if_empty()
            .extend(segments.into_iter().filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn tree_url(&self, repo: &RepoRef) -> Result<Url> {
        let prefix = ["repos", repo.owner.as_str(), repo.name.as_str(), "git", "trees"];
        let mut url = self.api_url(prefix.into_iter().chain(repo.branch.split('/')))?;
        url.query_pairs_mut().append_pair("recursive", "1");
        Ok(url)
    }

    fn contents_url(&self, repo: &RepoRef, path: &str) -> Result<Url> {
        let prefix = ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"];
        let mut url = self.api_url(prefix.into_iter().chain(path.split('/')))?;
        url.query_pairs_mut().append_pair("ref", &repo.branch);
        Ok(url)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }
}

#[async_trait]
impl Repository for GithubRepository {
    async fn list(&self, repo_id: &str) -> Result<Vec<RepoEntry>> {
        let repo = parse_repo_id(repo_id)?;
        let url = self.tree_url(&repo)?;
        debug!(%url, "listing repository");

        let body = self
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to list {repo_id}"))?
            .error_for_status()?
            .text()
            .await?;
        entries_from_git_tree(&body)
    }

    async fn fetch(&self, repo_id: &str, path: &str) -> Result<String> {
        let repo = parse_repo_id(repo_id)?;
        let url = self.contents_url(&repo, path)?;
        debug!(%url, "fetching file");

        let content = self
            .get(url)
            .header(ACCEPT, "application/vnd.github.raw")
            .send()
            .await
            .with_context(|| format!("failed to fetch {path}"))?
            .error_for_status()?
            .text()
            .await?;
        Ok(content)
    }

    async fn save(&self, repo_id: &str, path: &str, _content: &str) -> Result<()> {
        bail!("{repo_id} is read-only, cannot save {path}")
    }
}

fn parse_repo_id(repo_id: &str) -> Result<RepoRef> {
    let (location, branch) = match repo_id.rsplit_once('@') {
        Some((location, branch)) if !branch.is_empty() => (location, branch),
        _ => (repo_id, DEFAULT_BRANCH),
    };

    let segments: Vec<&str> = location
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [.., owner, name] if !owner.ends_with(':') => Ok(RepoRef {
            owner: (*owner).to_owned(),
            name: (*name).to_owned(),
            branch: branch.to_owned(),
        }),
        _ => bail!("expected owner/repo, got {repo_id:?}"),
    }
}

/// `tree` items become directories and `blob` items files; submodules and
/// other item types are dropped.
fn entries_from_git_tree(body: &str) -> Result<Vec<RepoEntry>> {
    let tree: GitTree = serde_json::from_str(body).context("malformed git tree response")?;
    if tree.truncated {
        warn!("repository listing was truncated by the server");
    }

    Ok(tree
        .tree
        .into_iter()
        .filter_map(|item| match item.item_type.as_str() {
            "tree" => Some(RepoEntry::dir(item.path)),
            "blob" => Some(RepoEntry::file(item.path)),
            _ => None,
        })
        .collect())
}
