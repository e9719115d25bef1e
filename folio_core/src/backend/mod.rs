//! Record-store collaborators. Every value crossing this boundary is in wire
//! form; see [`crate::wire`].

mod local;

pub use local::LocalBackend;

use crate::model::PostId;
use crate::wire::{CodecError, WireValue};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend rejected the request: {message}")]
    Rejected { message: String },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BackendError {
    pub fn rejected(message: impl Into<String>) -> Self {
        BackendError::Rejected {
            message: message.into(),
        }
    }

    /// Recovers a typed error raised inside an `anyhow` closure.
    pub(crate) fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<BackendError>() {
            Ok(err) => err,
            Err(err) => match err.downcast::<CodecError>() {
                Ok(err) => BackendError::Codec(err),
                Err(err) => BackendError::Internal(err),
            },
        }
    }
}

#[async_trait]
pub trait PostBackend: Send + Sync {
    /// Persists a wire-encoded `CreatePostPayload`, assigning id, timestamps
    /// and zero metrics. Returns the wire-encoded `Post`.
    async fn create_post(&self, payload: WireValue) -> Result<WireValue, BackendError>;

    /// Full replace of the client-editable fields. `None` means no such id.
    async fn replace_post(
        &self,
        id: PostId,
        payload: WireValue,
    ) -> Result<Option<WireValue>, BackendError>;

    async fn get_post_by_id(&self, id: PostId) -> Result<Option<WireValue>, BackendError>;

    /// Wire-encoded summaries, most recently updated first.
    async fn list_posts(&self, limit: usize) -> Result<Vec<WireValue>, BackendError>;
}
