use crate::backend::{BackendError, PostBackend};
use crate::config::PromotionConfig;
use crate::model::{CreatePostPayload, Post, PostId, PostSummary};
use crate::promotion::{AssetPromoter, FailedPromotion, PromotionError, PromotionOutcome};
use crate::storage::ObjectStore;
use crate::validation::{validate_payload, ValidationErrors};
use crate::wire::{
    decode_post, decode_summary, encode_payload, BlockFallback, CodecError, Decoded, WireValue,
};
use std::sync::Arc;

/// What the editing surface gets back after a create or update.
#[derive(Debug)]
pub struct Published {
    pub post: Post,
    pub status: PublishStatus,
    /// Content blocks the backend returned that could not be read.
    pub fallbacks: Vec<BlockFallback>,
}

#[derive(Debug)]
pub enum PublishStatus {
    FullyPromoted,
    PartiallyPromoted { still_temporary: Vec<FailedPromotion> },
}

impl PublishStatus {
    pub fn is_full(&self) -> bool {
        matches!(self, PublishStatus::FullyPromoted)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("post is invalid: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("creating the post failed: {source}")]
    Create {
        /// The wire payload the backend refused.
        payload: WireValue,
        #[source]
        source: BackendError,
    },
    #[error("replacing post {post_id} failed: {source}")]
    Replace {
        post_id: PostId,
        payload: WireValue,
        #[source]
        source: BackendError,
    },
    #[error("post {post_id} does not exist")]
    NotFound { post_id: PostId },
    #[error(transparent)]
    Promotion(#[from] PromotionError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Clone)]
pub struct Publisher {
    backend: Arc<dyn PostBackend>,
    promoter: AssetPromoter,
}

impl Publisher {
    pub fn new(
        backend: Arc<dyn PostBackend>,
        store: Arc<dyn ObjectStore>,
        config: &PromotionConfig,
    ) -> Self {
        let promoter = AssetPromoter::new(store, backend.clone())
            .with_max_concurrent_moves(config.max_concurrent_moves);
        Self { backend, promoter }
    }

    /// Validates, creates and then promotes the post's temporary assets.
    pub async fn create_post(&self, payload: CreatePostPayload) -> Result<Published, PublishError> {
        let payload = payload.normalized();
        validate_payload(&payload)?;
        let wire = encode_payload(&payload)?;
        let created = match self.backend.create_post(wire.clone()).await {
            Ok(created) => created,
            Err(source) => {
                tracing::warn!(slug = %payload.slug, error = %source, "post creation failed");
                return Err(PublishError::Create {
                    payload: wire,
                    source,
                });
            }
        };
        let Decoded { value: post, fallbacks } = decode_post(&created)?;
        tracing::info!(post_id = post.id, slug = %post.slug, "post created");

        let outcome = self.promoter.promote(post.id, &payload).await?;
        Ok(match outcome {
            PromotionOutcome::NothingToPromote => Published {
                post,
                status: PublishStatus::FullyPromoted,
                fallbacks,
            },
            PromotionOutcome::Complete {
                post,
                fallbacks: replaced_fallbacks,
                ..
            } => Published {
                post,
                status: PublishStatus::FullyPromoted,
                fallbacks: replaced_fallbacks,
            },
            PromotionOutcome::Partial {
                post: Some(replaced),
                still_temporary,
                fallbacks: replaced_fallbacks,
                ..
            } => Published {
                post: replaced,
                status: PublishStatus::PartiallyPromoted { still_temporary },
                fallbacks: replaced_fallbacks,
            },
            PromotionOutcome::Partial {
                post: None,
                still_temporary,
                ..
            } => Published {
                post,
                status: PublishStatus::PartiallyPromoted { still_temporary },
                fallbacks,
            },
        })
    }

    /// Replaces an existing post. Temporary assets added while editing are
    /// promoted first, so the stored post never points into a draft folder
    /// when the move succeeded.
    pub async fn update_post(
        &self,
        post_id: PostId,
        payload: CreatePostPayload,
    ) -> Result<Published, PublishError> {
        let payload = payload.normalized();
        validate_payload(&payload)?;
        if self.backend.get_post_by_id(post_id).await?.is_none() {
            return Err(PublishError::NotFound { post_id });
        }

        match self.promoter.promote(post_id, &payload).await? {
            PromotionOutcome::Complete {
                post, fallbacks, ..
            } => Ok(Published {
                post,
                status: PublishStatus::FullyPromoted,
                fallbacks,
            }),
            PromotionOutcome::Partial {
                post: Some(post),
                still_temporary,
                fallbacks,
                ..
            } => Ok(Published {
                post,
                status: PublishStatus::PartiallyPromoted { still_temporary },
                fallbacks,
            }),
            PromotionOutcome::Partial {
                post: None,
                still_temporary,
                ..
            } => {
                let Decoded { value, fallbacks } = self.replace(post_id, &payload).await?;
                Ok(Published {
                    post: value,
                    status: PublishStatus::PartiallyPromoted { still_temporary },
                    fallbacks,
                })
            }
            PromotionOutcome::NothingToPromote => {
                let Decoded { value, fallbacks } = self.replace(post_id, &payload).await?;
                Ok(Published {
                    post: value,
                    status: PublishStatus::FullyPromoted,
                    fallbacks,
                })
            }
        }
    }

    pub async fn get_post(&self, post_id: PostId) -> Result<Option<Decoded<Post>>, PublishError> {
        match self.backend.get_post_by_id(post_id).await? {
            Some(wire) => Ok(Some(decode_post(&wire)?)),
            None => Ok(None),
        }
    }

    pub async fn list_posts(&self, limit: usize) -> Result<Vec<PostSummary>, PublishError> {
        let listed = self.backend.list_posts(limit).await?;
        let mut summaries = Vec::with_capacity(listed.len());
        for wire in &listed {
            summaries.push(decode_summary(wire)?);
        }
        Ok(summaries)
    }

    async fn replace(
        &self,
        post_id: PostId,
        payload: &CreatePostPayload,
    ) -> Result<Decoded<Post>, PublishError> {
        let wire = encode_payload(payload)?;
        let replaced = match self.backend.replace_post(post_id, wire.clone()).await {
            Ok(Some(replaced)) => replaced,
            Ok(None) => return Err(PublishError::NotFound { post_id }),
            Err(source) => {
                return Err(PublishError::Replace {
                    post_id,
                    payload: wire,
                    source,
                })
            }
        };
        Ok(decode_post(&replaced)?)
    }
}
