//! Moves temporary media into a post's permanent namespace once the backend
//! has assigned an id, then replaces the post with the rewritten references.
//!
//! Moves are not transactional with the replace call. When some moves fail
//! the promotion proceeds with the ones that succeeded: only those refs are
//! rewritten, the failed ones keep their temporary path (the object is still
//! there) and are reported back. If nothing moved, the post is left alone.

use crate::backend::{BackendError, PostBackend};
use crate::config::DEFAULT_MAX_CONCURRENT_MOVES;
use crate::model::{CreatePostPayload, Post, PostId, StorageRef};
use crate::paths::{draft_of, is_temporary, permanent_path, promote_ref};
use crate::storage::{ObjectStore, StorageError};
use crate::wire::{decode_post, encode_payload, BlockFallback, CodecError, Decoded, WireValue};
use futures_util::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotedAsset {
    pub bucket: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug)]
pub struct FailedPromotion {
    pub bucket: String,
    /// Temporary path the reference still points at.
    pub path: String,
    pub error: StorageError,
}

#[derive(Debug)]
pub enum PromotionOutcome {
    /// The payload held no temporary references. Nothing was called.
    NothingToPromote,
    Complete {
        post: Post,
        promoted: Vec<PromotedAsset>,
        /// Unreadable blocks in the replace response.
        fallbacks: Vec<BlockFallback>,
    },
    /// `post` is `None` when no move succeeded and no replace was issued;
    /// `fallbacks` is then empty.
    Partial {
        post: Option<Post>,
        promoted: Vec<PromotedAsset>,
        still_temporary: Vec<FailedPromotion>,
        fallbacks: Vec<BlockFallback>,
    },
}

impl PromotionOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            PromotionOutcome::NothingToPromote | PromotionOutcome::Complete { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PromotionError {
    #[error("post {post_id} vanished before its assets could be recorded ({} moved)", moved.len())]
    PostNotFound {
        post_id: PostId,
        moved: Vec<PromotedAsset>,
    },
    #[error("replacing post {post_id} after moving {} asset(s) failed: {source}", moved.len())]
    Backend {
        post_id: PostId,
        /// The rewritten payload that was refused.
        payload: WireValue,
        moved: Vec<PromotedAsset>,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Binds the promotion routine to its two collaborators.
#[derive(Clone)]
pub struct AssetPromoter {
    store: Arc<dyn ObjectStore>,
    backend: Arc<dyn PostBackend>,
    max_concurrent_moves: usize,
}

impl AssetPromoter {
    pub fn new(store: Arc<dyn ObjectStore>, backend: Arc<dyn PostBackend>) -> Self {
        Self {
            store,
            backend,
            max_concurrent_moves: DEFAULT_MAX_CONCURRENT_MOVES,
        }
    }

    pub fn with_max_concurrent_moves(mut self, limit: usize) -> Self {
        self.max_concurrent_moves = limit.max(1);
        self
    }

    pub async fn promote(
        &self,
        post_id: PostId,
        payload: &CreatePostPayload,
    ) -> Result<PromotionOutcome, PromotionError> {
        promote_assets(
            self.store.as_ref(),
            self.backend.as_ref(),
            post_id,
            payload,
            self.max_concurrent_moves,
        )
        .await
    }
}

/// Unique temporary refs reachable from the payload, in walk order.
pub fn temporary_refs(payload: &CreatePostPayload) -> Vec<StorageRef> {
    let mut seen = HashSet::new();
    payload
        .media_assets()
        .into_iter()
        .map(|asset| &asset.storage_ref)
        .filter(|storage_ref| is_temporary(&storage_ref.path))
        .filter(|storage_ref| seen.insert((storage_ref.bucket.clone(), storage_ref.path.clone())))
        .cloned()
        .collect()
}

pub async fn promote_assets(
    store: &dyn ObjectStore,
    backend: &dyn PostBackend,
    post_id: PostId,
    payload: &CreatePostPayload,
    max_concurrent_moves: usize,
) -> Result<PromotionOutcome, PromotionError> {
    let pending = temporary_refs(payload);
    if pending.is_empty() {
        tracing::debug!(post_id, "no temporary assets to promote");
        return Ok(PromotionOutcome::NothingToPromote);
    }
    tracing::info!(post_id, assets = pending.len(), "promoting temporary assets");

    let mut settled: Vec<(usize, StorageRef, String, Result<(), StorageError>)> =
        stream::iter(pending.into_iter().enumerate())
            .map(|(idx, storage_ref)| async move {
                let to = permanent_path(&storage_ref.path, post_id);
                let result = store
                    .move_object(&storage_ref.bucket, &storage_ref.path, &to)
                    .await;
                (idx, storage_ref, to, result)
            })
            .buffer_unordered(max_concurrent_moves.max(1))
            .collect()
            .await;
    settled.sort_by_key(|(idx, ..)| *idx);

    let mut promoted = Vec::new();
    let mut still_temporary = Vec::new();
    for (_, storage_ref, to, result) in settled {
        match result {
            Ok(()) => promoted.push(PromotedAsset {
                bucket: storage_ref.bucket,
                from: storage_ref.path,
                to,
            }),
            Err(error) => {
                tracing::warn!(
                    post_id,
                    draft = draft_of(&storage_ref.path).unwrap_or_default(),
                    bucket = %storage_ref.bucket,
                    path = %storage_ref.path,
                    error = %error,
                    "asset move failed"
                );
                still_temporary.push(FailedPromotion {
                    bucket: storage_ref.bucket,
                    path: storage_ref.path,
                    error,
                });
            }
        }
    }

    if promoted.is_empty() {
        tracing::warn!(post_id, "no asset could be moved, post left untouched");
        return Ok(PromotionOutcome::Partial {
            post: None,
            promoted,
            still_temporary,
            fallbacks: Vec::new(),
        });
    }

    let rewritten = rewrite_moved(payload, post_id, &promoted);
    let wire = encode_payload(&rewritten)?;
    let replaced = match backend.replace_post(post_id, wire.clone()).await {
        Ok(Some(replaced)) => replaced,
        Ok(None) => {
            return Err(PromotionError::PostNotFound {
                post_id,
                moved: promoted,
            })
        }
        Err(source) => {
            return Err(PromotionError::Backend {
                post_id,
                payload: wire,
                moved: promoted,
                source,
            })
        }
    };
    let Decoded {
        value: post,
        fallbacks,
    } = decode_post(&replaced)?;

    if still_temporary.is_empty() {
        tracing::info!(post_id, moved = promoted.len(), "assets promoted");
        Ok(PromotionOutcome::Complete {
            post,
            promoted,
            fallbacks,
        })
    } else {
        Ok(PromotionOutcome::Partial {
            post: Some(post),
            promoted,
            still_temporary,
            fallbacks,
        })
    }
}

/// Copy of `payload` where every ref that was moved points at its permanent
/// path. All other refs pass through unchanged.
fn rewrite_moved(
    payload: &CreatePostPayload,
    post_id: PostId,
    promoted: &[PromotedAsset],
) -> CreatePostPayload {
    let moved: HashSet<(&str, &str)> = promoted
        .iter()
        .map(|asset| (asset.bucket.as_str(), asset.from.as_str()))
        .collect();
    let mut rewritten = payload.clone();
    for asset in rewritten.media_assets_mut() {
        let key = (asset.storage_ref.bucket.as_str(), asset.storage_ref.path.as_str());
        if moved.contains(&key) {
            asset.storage_ref = promote_ref(&asset.storage_ref, post_id);
        }
    }
    rewritten
}
