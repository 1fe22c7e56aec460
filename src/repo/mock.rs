use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::models::RepoEntry;

use super::Repository;

#[derive(Clone, Debug)]
enum Response<T> {
    Ok(T),
    Err(String),
}

#[derive(Clone, Default)]
pub struct MockRepository {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    listing: Option<Response<Vec<RepoEntry>>>,
    contents: HashMap<String, Response<String>>,
    save_errors: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    fetches: Vec<String>,
    saves: Vec<(String, String)>,
}

impl MockRepository {
    pub fn set_listing(&self, entries: Vec<RepoEntry>) {
        let mut inner = self.inner.lock().expect("mock repo lock");
        inner.listing = Some(Response::Ok(entries));
    }

    pub fn set_listing_error(&self, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock repo lock");
        inner.listing = Some(Response::Err(message.into()));
    }

    pub fn set_content(&self, path: impl Into<String>, content: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock repo lock");
        inner
            .contents
            .insert(path.into(), Response::Ok(content.into()));
    }

    pub fn set_fetch_error(&self, path: impl Into<String>, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock repo lock");
        inner
            .contents
            .insert(path.into(), Response::Err(message.into()));
    }

    pub fn set_save_error(&self, path: impl Into<String>, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock repo lock");
        inner.save_errors.insert(path.into(), message.into());
    }

    /// Delay every fetch or save of `path`.
    pub fn set_delay(&self, path: impl Into<String>, delay: Duration) {
        let mut inner = self.inner.lock().expect("mock repo lock");
        inner.delays.insert(path.into(), delay);
    }

    pub fn fetches(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("mock repo lock");
        inner.fetches.clone()
    }

    pub fn saves(&self) -> Vec<(String, String)> {
        let inner = self.inner.lock().expect("mock repo lock");
        inner.saves.clone()
    }

    fn delay_for(&self, path: &str) -> Option<Duration> {
        let inner = self.inner.lock().expect("mock repo lock");
        inner.delays.get(path).copied()
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn list(&self, repo_id: &str) -> Result<Vec<RepoEntry>> {
        let inner = self.inner.lock().expect("mock repo lock");
        match &inner.listing {
            Some(Response::Ok(entries)) => Ok(entries.clone()),
            Some(Response::Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("no mock listing for {repo_id}")),
        }
    }

    async fn fetch(&self, _repo_id: &str, path: &str) -> Result<String> {
        if let Some(delay) = self.delay_for(path) {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().expect("mock repo lock");
        inner.fetches.push(path.to_owned());
        match inner.contents.get(path) {
            Some(Response::Ok(content)) => Ok(content.clone()),
            Some(Response::Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("no mock content for {path}")),
        }
    }

    async fn save(&self, _repo_id: &str, path: &str, content: &str) -> Result<()> {
        if let Some(delay) = self.delay_for(path) {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().expect("mock repo lock");
        if let Some(message) = inner.save_errors.get(path) {
            return Err(anyhow!("{message}"));
        }
        inner.saves.push((path.to_owned(), content.to_owned()));
        inner
            .contents
            .insert(path.to_owned(), Response::Ok(content.to_owned()));
        Ok(())
    }
}
