use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank_to_none, ContentBlock, MediaAsset, PostId};
use crate::reading_time::estimate_reading_minutes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar_url: None,
            bio: None,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name,
            avatar_url: blank_to_none(self.avatar_url),
            bio: blank_to_none(self.bio),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSettings {
    pub media: MediaAsset,
    #[serde(default)]
    pub overlay_title: Option<String>,
    #[serde(default)]
    pub overlay_subtitle: Option<String>,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_url: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
}

impl HeroSettings {
    pub fn new(media: MediaAsset) -> Self {
        Self {
            media,
            overlay_title: None,
            overlay_subtitle: None,
            cta_label: None,
            cta_url: None,
            accent_color: None,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            media: self.media.normalized(),
            overlay_title: blank_to_none(self.overlay_title),
            overlay_subtitle: blank_to_none(self.overlay_subtitle),
            cta_label: blank_to_none(self.cta_label),
            cta_url: blank_to_none(self.cta_url),
            accent_color: blank_to_none(self.accent_color),
        }
    }
}

/// Canonical SEO metadata used whenever a post carries none.
pub const DEFAULT_SEO_META: SeoMeta = SeoMeta {
    title: None,
    description: None,
    keywords: Vec::new(),
    canonical_url: None,
    og_image: None,
    twitter_card: None,
};

/// Canonical feature flags used whenever a post carries none.
pub const DEFAULT_FEATURE_FLAGS: FeatureFlags = FeatureFlags {
    featured: false,
    editors_pick: false,
    allow_comments: true,
    hero_layout: HeroLayout::Classic,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub og_image: Option<MediaAsset>,
    #[serde(default)]
    pub twitter_card: Option<String>,
}

impl Default for SeoMeta {
    fn default() -> Self {
        DEFAULT_SEO_META
    }
}

impl SeoMeta {
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_SEO_META
    }

    pub fn normalized(self) -> Self {
        Self {
            title: blank_to_none(self.title),
            description: blank_to_none(self.description),
            keywords: self.keywords,
            canonical_url: blank_to_none(self.canonical_url),
            og_image: self.og_image.map(MediaAsset::normalized),
            twitter_card: blank_to_none(self.twitter_card),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeroLayout {
    Classic,
    Split,
    Overlay,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub featured: bool,
    pub editors_pick: bool,
    pub allow_comments: bool,
    pub hero_layout: HeroLayout,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        DEFAULT_FEATURE_FLAGS
    }
}

impl FeatureFlags {
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_FEATURE_FLAGS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Scheduled => "Scheduled",
            PostStatus::Published => "Published",
            PostStatus::Archived => "Archived",
        }
    }

    /// Statuses whose content is, or will become, publicly visible.
    pub fn is_public(&self) -> bool {
        matches!(self, PostStatus::Published | PostStatus::Scheduled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetrics {
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Author,
    #[serde(default)]
    pub hero: Option<HeroSettings>,
    #[serde(default)]
    pub gallery: Vec<MediaAsset>,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub seo: SeoMeta,
    pub reading_minutes: u32,
    pub status: PostStatus,
    #[serde(default)]
    pub flags: FeatureFlags,
    #[serde(default)]
    pub metrics: PostMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related: Vec<PostId>,
}

impl Post {
    /// Client-editable portion of the post, suitable for a full replace.
    pub fn to_payload(&self) -> CreatePostPayload {
        CreatePostPayload {
            slug: self.slug.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            excerpt: self.excerpt.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            hero: self.hero.clone(),
            gallery: self.gallery.clone(),
            content: self.content.clone(),
            seo: self.seo.clone(),
            status: self.status,
            flags: self.flags,
            scheduled_for: self.scheduled_for,
            related: self.related.clone(),
        }
    }

    /// Replaces every client-editable field, keeping identity, metrics and
    /// creation time. `published_at` is stamped the first time the post
    /// becomes published.
    pub fn apply_payload(&mut self, payload: CreatePostPayload, now: DateTime<Utc>) {
        let reading_minutes = estimate_reading_minutes(&payload.content);
        if payload.status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.slug = payload.slug;
        self.title = payload.title;
        self.subtitle = payload.subtitle;
        self.excerpt = payload.excerpt;
        self.category = payload.category;
        self.tags = payload.tags;
        self.author = payload.author;
        self.hero = payload.hero;
        self.gallery = payload.gallery;
        self.content = payload.content;
        self.seo = payload.seo;
        self.status = payload.status;
        self.flags = payload.flags;
        self.scheduled_for = payload.scheduled_for;
        self.related = payload.related;
        self.reading_minutes = reading_minutes;
        self.updated_at = now;
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary::from(self)
    }

    pub fn normalized(self) -> Self {
        Self {
            subtitle: blank_to_none(self.subtitle),
            author: self.author.normalized(),
            hero: self.hero.map(HeroSettings::normalized),
            gallery: self.gallery.into_iter().map(MediaAsset::normalized).collect(),
            content: self
                .content
                .into_iter()
                .map(ContentBlock::normalized)
                .collect(),
            seo: self.seo.normalized(),
            ..self
        }
    }
}

/// Listing projection of a [`Post`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: PostId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Author,
    #[serde(default)]
    pub hero: Option<HeroSettings>,
    pub reading_minutes: u32,
    pub status: PostStatus,
    #[serde(default)]
    pub flags: FeatureFlags,
    #[serde(default)]
    pub metrics: PostMetrics,
    /// Search title and description only; keywords stay on the full post.
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            slug: post.slug.clone(),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            author: post.author.clone(),
            hero: post.hero.clone(),
            reading_minutes: post.reading_minutes,
            status: post.status,
            flags: post.flags,
            metrics: post.metrics,
            seo_title: post.seo.title.clone(),
            seo_description: post.seo.description.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            published_at: post.published_at,
            scheduled_for: post.scheduled_for,
        }
    }
}

/// Everything the author controls when creating or replacing a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostPayload {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Author,
    #[serde(default)]
    pub hero: Option<HeroSettings>,
    #[serde(default)]
    pub gallery: Vec<MediaAsset>,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub seo: SeoMeta,
    pub status: PostStatus,
    #[serde(default)]
    pub flags: FeatureFlags,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related: Vec<PostId>,
}

impl CreatePostPayload {
    /// Materializes the payload as a freshly created post.
    pub fn into_post(self, id: PostId, now: DateTime<Utc>) -> Post {
        let mut post = Post {
            id,
            slug: String::new(),
            title: String::new(),
            subtitle: None,
            excerpt: String::new(),
            category: String::new(),
            tags: Vec::new(),
            author: Author::new(""),
            hero: None,
            gallery: Vec::new(),
            content: Vec::new(),
            seo: SeoMeta::default(),
            reading_minutes: 1,
            status: PostStatus::Draft,
            flags: FeatureFlags::default(),
            metrics: PostMetrics::default(),
            created_at: now,
            updated_at: now,
            published_at: None,
            scheduled_for: None,
            related: Vec::new(),
        };
        post.apply_payload(self, now);
        post
    }

    /// Every media asset reachable from the payload: hero media, gallery
    /// items, image blocks and the Open Graph image, in that order.
    pub fn media_assets(&self) -> Vec<&MediaAsset> {
        let mut assets = Vec::new();
        if let Some(hero) = &self.hero {
            assets.push(&hero.media);
        }
        assets.extend(self.gallery.iter());
        for block in &self.content {
            if let ContentBlock::Image { asset, .. } = block {
                assets.push(asset);
            }
        }
        if let Some(og_image) = &self.seo.og_image {
            assets.push(og_image);
        }
        assets
    }

    pub fn media_assets_mut(&mut self) -> Vec<&mut MediaAsset> {
        let mut assets = Vec::new();
        if let Some(hero) = &mut self.hero {
            assets.push(&mut hero.media);
        }
        assets.extend(self.gallery.iter_mut());
        for block in &mut self.content {
            if let ContentBlock::Image { asset, .. } = block {
                assets.push(asset);
            }
        }
        if let Some(og_image) = &mut self.seo.og_image {
            assets.push(og_image);
        }
        assets
    }

    pub fn normalized(self) -> Self {
        Self {
            subtitle: blank_to_none(self.subtitle),
            author: self.author.normalized(),
            hero: self.hero.map(HeroSettings::normalized),
            gallery: self.gallery.into_iter().map(MediaAsset::normalized).collect(),
            content: self
                .content
                .into_iter()
                .map(ContentBlock::normalized)
                .collect(),
            seo: self.seo.normalized(),
            ..self
        }
    }
}
