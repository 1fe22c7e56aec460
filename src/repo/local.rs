use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::task;

use crate::models::RepoEntry;

use super::Repository;

/// A checkout on local disk; `repo_id` is its directory.
pub struct LocalRepository;

#[async_trait]
impl Repository for LocalRepository {
    async fn list(&self, repo_id: &str) -> Result<Vec<RepoEntry>> {
        let root = PathBuf::from(repo_id);
        task::spawn_blocking(move || {
            let metadata = std::fs::metadata(&root)
                .with_context(|| format!("{}", root.display()))?;
            if !metadata.is_dir() {
                bail!("{}: not a directory", root.display());
            }

            let mut entries = Vec::new();
            collect_entries(&root, &root, &mut entries)?;
            Ok(entries)
        })
        .await?
    }

    async fn fetch(&self, repo_id: &str, path: &str) -> Result<String> {
        let full = checked_join(repo_id, path)?;
        tokio::fs::read_to_string(&full)
            .await
            .with_context(|| format!("failed to read {}", full.display()))
    }

    async fn save(&self, repo_id: &str, path: &str, content: &str) -> Result<()> {
        let full = checked_join(repo_id, path)?;
        tokio::fs::write(&full, content)
            .await
            .with_context(|| format!("failed to write {}", full.display()))
    }
}

/// Symlinks and special files are left out; unreadable entries are skipped.
fn collect_entries(root: &Path, dir: &Path, entries: &mut Vec<RepoEntry>) -> Result<()> {
    for entry in std::fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(_) => continue,
        };
        if file_type.is_symlink() {
            continue;
        }

        let path = entry.path();
        let relative = relative_path(root, &path)?;
        if file_type.is_dir() {
            entries.push(RepoEntry::dir(relative));
            collect_entries(root, &path, entries)?;
        } else if file_type.is_file() {
            entries.push(RepoEntry::file(relative));
        }
    }
    Ok(())
}

fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root)?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}

fn checked_join(repo_id: &str, path: &str) -> Result<PathBuf> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("refusing path outside the repository: {path}");
    }
    Ok(Path::new(repo_id).join(relative))
}
