//! Object store collaborators used by asset promotion.

mod fs;
mod supabase;

pub use fs::FsObjectStore;
pub use supabase::SupabaseStorage;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object {bucket}/{path} does not exist")]
    NotFound { bucket: String, path: String },
    #[error("refusing unsafe object path `{0}`")]
    InvalidPath(String),
    #[error("object store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("object store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("object store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Moves an object inside `bucket`. Moving a path onto itself succeeds
    /// without touching the store.
    async fn move_object(&self, bucket: &str, from: &str, to: &str) -> Result<(), StorageError>;
}
