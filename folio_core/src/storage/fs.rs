use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Object store laid out on the local filesystem as `<root>/<bucket>/<path>`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        ensure_relative(bucket)?;
        ensure_relative(path)?;
        Ok(self.root.join(bucket).join(path))
    }

    pub async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let absolute_path = self.object_path(bucket, path)?;
        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&absolute_path, data).await?;
        Ok(absolute_path)
    }

    pub async fn exists(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        let absolute_path = self.object_path(bucket, path)?;
        Ok(fs::metadata(&absolute_path).await.is_ok())
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn move_object(&self, bucket: &str, from: &str, to: &str) -> Result<(), StorageError> {
        if from == to {
            return Ok(());
        }
        let source = self.object_path(bucket, from)?;
        let destination = self.object_path(bucket, to)?;
        if fs::metadata(&source).await.is_err() {
            return Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                path: from.to_string(),
            });
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&source, &destination).await?;
        tracing::debug!(bucket, from, to, "moved object");
        Ok(())
    }
}

fn ensure_relative(path: &str) -> Result<(), StorageError> {
    let candidate = Path::new(path);
    let safe = !path.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if safe {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}
