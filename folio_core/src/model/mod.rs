//! In-memory document model for long-form posts.
//!
//! These types never know about the wire conventions used by the backend;
//! see [`crate::wire`] for that boundary.

mod blocks;
mod media;
mod post;

pub use blocks::{CalloutTone, ContentBlock};
pub use media::{MediaAsset, StorageRef};
pub use post::{
    Author, CreatePostPayload, FeatureFlags, HeroLayout, HeroSettings, Post, PostMetrics,
    PostStatus, PostSummary, SeoMeta, DEFAULT_FEATURE_FLAGS, DEFAULT_SEO_META,
};

/// Identifier assigned to a post by the backend on creation.
pub type PostId = u64;

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
