//! Lazy enumeration of the regular files under a directory.
//!
//! A blocking producer walks the tree and feeds a bounded queue; the async
//! consumer pulls one path at a time. The first traversal error is delivered
//! in-band and ends the walk. Dropping the walker stops the producer at its
//! next send.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use crate::error::DeployError;

/// Queue depth between the walking thread and the consumer.
pub const QUEUE_DEPTH: usize = 64;

type Item = Result<PathBuf, walkdir::Error>;

/// Yields every regular file under a root exactly once. Directories are
/// traversed but never yielded; symlinks are neither followed nor yielded.
#[derive(Debug)]
pub struct ArtifactWalker {
    root: PathBuf,
    rx: mpsc::Receiver<Item>,
    _producer: JoinHandle<()>,
}

impl ArtifactWalker {
    /// Start walking `root`. Must be called from within a Tokio runtime.
    pub fn spawn(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let walk_root = root.clone();
        let producer = tokio::task::spawn_blocking(move || produce(&walk_root, &tx));
        Self {
            root,
            rx,
            _producer: producer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Next file path, a traversal error, or `None` once the walk is over.
    pub async fn next(&mut self) -> Option<Result<PathBuf, DeployError>> {
        let item = self.rx.recv().await?;
        Some(item.map_err(|source| DeployError::Walk {
            root: self.root.clone(),
            source,
        }))
    }

    /// Drain the walker into a vector, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<PathBuf>, DeployError> {
        let mut files = Vec::new();
        while let Some(item) = self.next().await {
            files.push(item?);
        }
        Ok(files)
    }
}

fn produce(root: &Path, tx: &mpsc::Sender<Item>) {
    for entry in WalkDir::new(root).follow_links(false) {
        let item = match entry {
            Ok(entry) if entry.file_type().is_file() => Ok(entry.into_path()),
            Ok(_) => continue,
            Err(err) => Err(err),
        };
        let stop = item.is_err();
        // Receiver gone: nobody is listening any more.
        if tx.blocking_send(item).is_err() || stop {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midas_core::ErrorKind;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn yields_nested_files_once_and_no_directories() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("a/b/c")).unwrap();
        fs::create_dir_all(root.path().join("empty")).unwrap();
        for file in ["index.html", "a/one.css", "a/b/two.png", "a/b/c/three.js"] {
            fs::write(root.path().join(file), file).unwrap();
        }

        let files = ArtifactWalker::spawn(root.path()).collect().await.unwrap();
        assert_eq!(files.len(), 4);
        let unique: BTreeSet<_> = files.iter().cloned().collect();
        assert_eq!(unique.len(), 4);
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[tokio::test]
    async fn more_files_than_queue_depth() {
        let root = TempDir::new().unwrap();
        for i in 0..(QUEUE_DEPTH * 2 + 3) {
            fs::write(root.path().join(format!("f{i}.txt")), "x").unwrap();
        }
        let files = ArtifactWalker::spawn(root.path()).collect().await.unwrap();
        assert_eq!(files.len(), QUEUE_DEPTH * 2 + 3);
    }

    #[tokio::test]
    async fn empty_directory_yields_nothing() {
        let root = TempDir::new().unwrap();
        let mut walker = ArtifactWalker::spawn(root.path());
        assert!(walker.next().await.is_none());
    }

    #[tokio::test]
    async fn missing_root_is_an_in_band_error() {
        let root = TempDir::new().unwrap();
        let mut walker = ArtifactWalker::spawn(root.path().join("public"));
        let err = walker.next().await.expect("one item").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(walker.next().await.is_none(), "walk ends after an error");
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn symlinks_are_not_yielded() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "x").unwrap();
        fs::write(root.path().join("real.txt"), "x").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("linkdir")).unwrap();

        let files = ArtifactWalker::spawn(root.path()).collect().await.unwrap();
        assert_eq!(files, vec![root.path().join("real.txt")]);
    }

    #[tokio::test]
    async fn dropping_the_walker_stops_the_producer() {
        let root = TempDir::new().unwrap();
        for i in 0..(QUEUE_DEPTH * 4) {
            fs::write(root.path().join(format!("f{i}.txt")), "x").unwrap();
        }
        let mut walker = ArtifactWalker::spawn(root.path());
        assert!(walker.next().await.is_some());
        drop(walker);
    }
}
