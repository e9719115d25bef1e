use super::primitives::{opt_text, Nat, Opt};
use super::schema::*;
use super::{BlockFallback, CodecError, Decoded, FallbackReason, WireValue};
use crate::model::{
    Author, CalloutTone, ContentBlock, CreatePostPayload, FeatureFlags, HeroLayout, HeroSettings,
    MediaAsset, Post, PostMetrics, PostStatus, PostSummary, SeoMeta, StorageRef,
    DEFAULT_FEATURE_FLAGS, DEFAULT_SEO_META,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

pub fn encode_payload(payload: &CreatePostPayload) -> Result<WireValue, CodecError> {
    to_wire_value(&payload_to_wire(payload)?)
}

pub fn encode_post(post: &Post) -> Result<WireValue, CodecError> {
    to_wire_value(&post_to_wire(post)?)
}

pub fn encode_summary(summary: &PostSummary) -> Result<WireValue, CodecError> {
    to_wire_value(&summary_to_wire(summary)?)
}

pub fn decode_payload(wire: &WireValue) -> Result<Decoded<CreatePostPayload>, CodecError> {
    let raw: WirePayload = parse(wire, "payload")?;
    let mut fallbacks = Vec::new();
    let value = payload_from_wire(raw, &mut fallbacks)?;
    Ok(Decoded { value, fallbacks })
}

pub fn decode_post(wire: &WireValue) -> Result<Decoded<Post>, CodecError> {
    let raw: WirePost = parse(wire, "post")?;
    let mut fallbacks = Vec::new();
    let value = post_from_wire(raw, &mut fallbacks)?;
    Ok(Decoded { value, fallbacks })
}

pub fn decode_summary(wire: &WireValue) -> Result<PostSummary, CodecError> {
    let raw: WirePostSummary = parse(wire, "post summary")?;
    summary_from_wire(raw)
}

fn to_wire_value<T: Serialize>(value: &T) -> Result<WireValue, CodecError> {
    serde_json::to_value(value).map_err(CodecError::Encode)
}

fn parse<T: DeserializeOwned>(wire: &WireValue, target: &'static str) -> Result<T, CodecError> {
    T::deserialize(wire).map_err(|source| CodecError::Structure { target, source })
}

// ---------------------------------------------------------------------------
// Model -> wire
// ---------------------------------------------------------------------------

fn payload_to_wire(payload: &CreatePostPayload) -> Result<WirePayload, CodecError> {
    Ok(WirePayload {
        slug: payload.slug.clone(),
        title: payload.title.clone(),
        subtitle: opt_text(payload.subtitle.as_ref()),
        excerpt: payload.excerpt.clone(),
        category: payload.category.clone(),
        tags: payload.tags.clone(),
        author: author_to_wire(&payload.author),
        hero: payload.hero.as_ref().map(hero_to_wire).into(),
        gallery: payload.gallery.iter().map(asset_to_wire).collect(),
        content: blocks_to_wire(&payload.content),
        seo: seo_to_wire(&payload.seo),
        status: status_to_wire(payload.status),
        flags: flags_to_wire(&payload.flags),
        scheduled_for: optional_timestamp_to_wire("scheduledFor", payload.scheduled_for)?,
        related: ids_to_wire(&payload.related),
    })
}

fn post_to_wire(post: &Post) -> Result<WirePost, CodecError> {
    Ok(WirePost {
        id: Nat::from(post.id),
        slug: post.slug.clone(),
        title: post.title.clone(),
        subtitle: opt_text(post.subtitle.as_ref()),
        excerpt: post.excerpt.clone(),
        category: post.category.clone(),
        tags: post.tags.clone(),
        author: author_to_wire(&post.author),
        hero: post.hero.as_ref().map(hero_to_wire).into(),
        gallery: post.gallery.iter().map(asset_to_wire).collect(),
        content: blocks_to_wire(&post.content),
        seo: seo_to_wire(&post.seo),
        reading_minutes: Nat::from(post.reading_minutes),
        status: status_to_wire(post.status),
        flags: flags_to_wire(&post.flags),
        metrics: metrics_to_wire(&post.metrics),
        created_at: timestamp_to_wire("createdAt", post.created_at)?,
        updated_at: timestamp_to_wire("updatedAt", post.updated_at)?,
        published_at: optional_timestamp_to_wire("publishedAt", post.published_at)?,
        scheduled_for: optional_timestamp_to_wire("scheduledFor", post.scheduled_for)?,
        related: ids_to_wire(&post.related),
    })
}

fn summary_to_wire(summary: &PostSummary) -> Result<WirePostSummary, CodecError> {
    Ok(WirePostSummary {
        id: Nat::from(summary.id),
        slug: summary.slug.clone(),
        title: summary.title.clone(),
        subtitle: opt_text(summary.subtitle.as_ref()),
        excerpt: summary.excerpt.clone(),
        category: summary.category.clone(),
        tags: summary.tags.clone(),
        author: author_to_wire(&summary.author),
        hero: summary.hero.as_ref().map(hero_to_wire).into(),
        reading_minutes: Nat::from(summary.reading_minutes),
        status: status_to_wire(summary.status),
        flags: flags_to_wire(&summary.flags),
        metrics: metrics_to_wire(&summary.metrics),
        seo_title: opt_text(summary.seo_title.as_ref()),
        seo_description: opt_text(summary.seo_description.as_ref()),
        created_at: timestamp_to_wire("createdAt", summary.created_at)?,
        updated_at: timestamp_to_wire("updatedAt", summary.updated_at)?,
        published_at: optional_timestamp_to_wire("publishedAt", summary.published_at)?,
        scheduled_for: optional_timestamp_to_wire("scheduledFor", summary.scheduled_for)?,
    })
}

fn storage_ref_to_wire(storage_ref: &StorageRef) -> WireStorageRef {
    WireStorageRef {
        bucket: storage_ref.bucket.clone(),
        path: storage_ref.path.clone(),
        mime: opt_text(storage_ref.mime.as_ref()),
        size: storage_ref.size.map(Nat::from).into(),
    }
}

fn asset_to_wire(asset: &MediaAsset) -> WireMediaAsset {
    WireMediaAsset {
        storage_ref: storage_ref_to_wire(&asset.storage_ref),
        alt: asset.alt.clone(),
        caption: opt_text(asset.caption.as_ref()),
        credit: opt_text(asset.credit.as_ref()),
        aspect_ratio: asset.aspect_ratio.filter(|ratio| ratio.is_finite()).into(),
    }
}

fn author_to_wire(author: &Author) -> WireAuthor {
    WireAuthor {
        name: author.name.clone(),
        avatar_url: opt_text(author.avatar_url.as_ref()),
        bio: opt_text(author.bio.as_ref()),
    }
}

fn hero_to_wire(hero: &HeroSettings) -> WireHero {
    WireHero {
        media: asset_to_wire(&hero.media),
        overlay_title: opt_text(hero.overlay_title.as_ref()),
        overlay_subtitle: opt_text(hero.overlay_subtitle.as_ref()),
        cta_label: opt_text(hero.cta_label.as_ref()),
        cta_url: opt_text(hero.cta_url.as_ref()),
        accent_color: opt_text(hero.accent_color.as_ref()),
    }
}

/// SEO metadata equal to the canonical default is sent as absent.
fn seo_to_wire(seo: &SeoMeta) -> Opt<WireSeo> {
    let wire = WireSeo {
        title: opt_text(seo.title.as_ref()),
        description: opt_text(seo.description.as_ref()),
        keywords: seo.keywords.clone(),
        canonical_url: opt_text(seo.canonical_url.as_ref()),
        og_image: seo.og_image.as_ref().map(asset_to_wire).into(),
        twitter_card: opt_text(seo.twitter_card.as_ref()),
    };
    let empty = wire.title.is_none()
        && wire.description.is_none()
        && wire.keywords.is_empty()
        && wire.canonical_url.is_none()
        && wire.og_image.is_none()
        && wire.twitter_card.is_none();
    if empty {
        Opt::none()
    } else {
        Opt::some(wire)
    }
}

fn flags_to_wire(flags: &FeatureFlags) -> Opt<WireFlags> {
    if flags.is_default() {
        return Opt::none();
    }
    Opt::some(WireFlags {
        featured: flags.featured,
        editors_pick: flags.editors_pick,
        allow_comments: flags.allow_comments,
        hero_layout: layout_to_wire(flags.hero_layout),
    })
}

fn metrics_to_wire(metrics: &PostMetrics) -> WireMetrics {
    WireMetrics {
        views: Nat::from(metrics.views),
        likes: Nat::from(metrics.likes),
        shares: Nat::from(metrics.shares),
    }
}

fn blocks_to_wire(blocks: &[ContentBlock]) -> Vec<WireBlockSlot> {
    blocks
        .iter()
        .map(|block| WireBlockSlot::Known(block_to_wire(block)))
        .collect()
}

fn block_to_wire(block: &ContentBlock) -> WireContentBlock {
    match block {
        ContentBlock::Paragraph { text } => {
            WireContentBlock::Paragraph(WireParagraph { text: text.clone() })
        }
        ContentBlock::Heading {
            level,
            text,
            anchor,
        } => WireContentBlock::Heading(WireHeading {
            level: *level,
            text: text.clone(),
            anchor: opt_text(anchor.as_ref()),
        }),
        ContentBlock::Quote { text, attribution } => WireContentBlock::Quote(WireQuote {
            text: text.clone(),
            attribution: opt_text(attribution.as_ref()),
        }),
        ContentBlock::List { ordered, items } => WireContentBlock::List(WireList {
            ordered: *ordered,
            items: items.clone(),
        }),
        ContentBlock::Image { asset, full_width } => WireContentBlock::Image(WireImage {
            asset: asset_to_wire(asset),
            full_width: *full_width,
        }),
        ContentBlock::Code { language, code } => WireContentBlock::Code(WireCode {
            language: language.clone(),
            code: code.clone(),
        }),
        ContentBlock::Embed {
            provider,
            url,
            title,
        } => WireContentBlock::Embed(WireEmbed {
            provider: opt_text(provider.as_ref()),
            url: url.clone(),
            title: opt_text(title.as_ref()),
        }),
        ContentBlock::Callout { tone, title, body } => WireContentBlock::Callout(WireCallout {
            tone: tone_to_wire(*tone),
            title: title.clone(),
            body: body.clone(),
        }),
        ContentBlock::Divider => WireContentBlock::Divider(()),
    }
}

fn tone_to_wire(tone: CalloutTone) -> WireTone {
    match tone {
        CalloutTone::Info => WireTone::Info(()),
        CalloutTone::Success => WireTone::Success(()),
        CalloutTone::Warning => WireTone::Warning(()),
        CalloutTone::Danger => WireTone::Danger(()),
        CalloutTone::Tip => WireTone::Tip(()),
    }
}

fn status_to_wire(status: PostStatus) -> WireStatus {
    match status {
        PostStatus::Draft => WireStatus::Draft(()),
        PostStatus::Scheduled => WireStatus::Scheduled(()),
        PostStatus::Published => WireStatus::Published(()),
        PostStatus::Archived => WireStatus::Archived(()),
    }
}

fn layout_to_wire(layout: HeroLayout) -> WireHeroLayout {
    match layout {
        HeroLayout::Classic => WireHeroLayout::Classic(()),
        HeroLayout::Split => WireHeroLayout::Split(()),
        HeroLayout::Overlay => WireHeroLayout::Overlay(()),
        HeroLayout::Minimal => WireHeroLayout::Minimal(()),
    }
}

fn ids_to_wire(ids: &[u64]) -> Vec<Nat> {
    ids.iter().copied().map(Nat::from).collect()
}

fn timestamp_to_wire(field: &str, at: DateTime<Utc>) -> Result<Nat, CodecError> {
    at.timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .map(Nat::from)
        .ok_or_else(|| CodecError::TimestampOutOfRange {
            field: field.to_string(),
        })
}

fn optional_timestamp_to_wire(
    field: &str,
    at: Option<DateTime<Utc>>,
) -> Result<Opt<Nat>, CodecError> {
    at.map(|value| timestamp_to_wire(field, value))
        .transpose()
        .map(Opt::from)
}

// ---------------------------------------------------------------------------
// Wire -> model
// ---------------------------------------------------------------------------

fn payload_from_wire(
    raw: WirePayload,
    fallbacks: &mut Vec<BlockFallback>,
) -> Result<CreatePostPayload, CodecError> {
    Ok(CreatePostPayload {
        slug: raw.slug,
        title: raw.title,
        subtitle: text_from_wire(raw.subtitle),
        excerpt: raw.excerpt,
        category: raw.category,
        tags: raw.tags,
        author: author_from_wire(raw.author),
        hero: hero_from_wire(raw.hero)?,
        gallery: gallery_from_wire(raw.gallery)?,
        content: blocks_from_wire(raw.content, fallbacks)?,
        seo: seo_from_wire(raw.seo)?,
        status: status_from_wire(raw.status),
        flags: flags_from_wire(raw.flags),
        scheduled_for: optional_timestamp_from_wire("scheduledFor", raw.scheduled_for)?,
        related: ids_from_wire(raw.related)?,
    })
}

fn post_from_wire(
    raw: WirePost,
    fallbacks: &mut Vec<BlockFallback>,
) -> Result<Post, CodecError> {
    Ok(Post {
        id: nat_to_u64("id", &raw.id)?,
        slug: raw.slug,
        title: raw.title,
        subtitle: text_from_wire(raw.subtitle),
        excerpt: raw.excerpt,
        category: raw.category,
        tags: raw.tags,
        author: author_from_wire(raw.author),
        hero: hero_from_wire(raw.hero)?,
        gallery: gallery_from_wire(raw.gallery)?,
        content: blocks_from_wire(raw.content, fallbacks)?,
        seo: seo_from_wire(raw.seo)?,
        reading_minutes: nat_to_u32("readingMinutes", &raw.reading_minutes)?,
        status: status_from_wire(raw.status),
        flags: flags_from_wire(raw.flags),
        metrics: metrics_from_wire(&raw.metrics)?,
        created_at: timestamp_from_wire("createdAt", &raw.created_at)?,
        updated_at: timestamp_from_wire("updatedAt", &raw.updated_at)?,
        published_at: optional_timestamp_from_wire("publishedAt", raw.published_at)?,
        scheduled_for: optional_timestamp_from_wire("scheduledFor", raw.scheduled_for)?,
        related: ids_from_wire(raw.related)?,
    })
}

fn summary_from_wire(raw: WirePostSummary) -> Result<PostSummary, CodecError> {
    Ok(PostSummary {
        id: nat_to_u64("id", &raw.id)?,
        slug: raw.slug,
        title: raw.title,
        subtitle: text_from_wire(raw.subtitle),
        excerpt: raw.excerpt,
        category: raw.category,
        tags: raw.tags,
        author: author_from_wire(raw.author),
        hero: hero_from_wire(raw.hero)?,
        reading_minutes: nat_to_u32("readingMinutes", &raw.reading_minutes)?,
        status: status_from_wire(raw.status),
        flags: flags_from_wire(raw.flags),
        metrics: metrics_from_wire(&raw.metrics)?,
        seo_title: text_from_wire(raw.seo_title),
        seo_description: text_from_wire(raw.seo_description),
        created_at: timestamp_from_wire("createdAt", &raw.created_at)?,
        updated_at: timestamp_from_wire("updatedAt", &raw.updated_at)?,
        published_at: optional_timestamp_from_wire("publishedAt", raw.published_at)?,
        scheduled_for: optional_timestamp_from_wire("scheduledFor", raw.scheduled_for)?,
    })
}

fn text_from_wire(value: Opt<String>) -> Option<String> {
    value.into_option().filter(|text| !text.trim().is_empty())
}

fn storage_ref_from_wire(field: &str, raw: WireStorageRef) -> Result<StorageRef, CodecError> {
    let size = match raw.size.into_option() {
        Some(size) => Some(nat_to_u64(&format!("{field}.size"), &size)?),
        None => None,
    };
    Ok(StorageRef {
        bucket: raw.bucket,
        path: raw.path,
        mime: text_from_wire(raw.mime),
        size,
    })
}

fn asset_from_wire(field: &str, raw: WireMediaAsset) -> Result<MediaAsset, CodecError> {
    Ok(MediaAsset {
        storage_ref: storage_ref_from_wire(&format!("{field}.ref"), raw.storage_ref)?,
        alt: raw.alt,
        caption: text_from_wire(raw.caption),
        credit: text_from_wire(raw.credit),
        aspect_ratio: raw.aspect_ratio.into_option().filter(|ratio| ratio.is_finite()),
    })
}

fn gallery_from_wire(raw: Vec<WireMediaAsset>) -> Result<Vec<MediaAsset>, CodecError> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, asset)| asset_from_wire(&format!("gallery[{idx}]"), asset))
        .collect()
}

fn author_from_wire(raw: WireAuthor) -> Author {
    Author {
        name: raw.name,
        avatar_url: text_from_wire(raw.avatar_url),
        bio: text_from_wire(raw.bio),
    }
}

fn hero_from_wire(raw: Opt<WireHero>) -> Result<Option<HeroSettings>, CodecError> {
    let Some(hero) = raw.into_option() else {
        return Ok(None);
    };
    Ok(Some(HeroSettings {
        media: asset_from_wire("hero.media", hero.media)?,
        overlay_title: text_from_wire(hero.overlay_title),
        overlay_subtitle: text_from_wire(hero.overlay_subtitle),
        cta_label: text_from_wire(hero.cta_label),
        cta_url: text_from_wire(hero.cta_url),
        accent_color: text_from_wire(hero.accent_color),
    }))
}

fn seo_from_wire(raw: Opt<WireSeo>) -> Result<SeoMeta, CodecError> {
    let Some(seo) = raw.into_option() else {
        return Ok(DEFAULT_SEO_META);
    };
    let og_image = match seo.og_image.into_option() {
        Some(asset) => Some(asset_from_wire("seo.ogImage", asset)?),
        None => None,
    };
    Ok(SeoMeta {
        title: text_from_wire(seo.title),
        description: text_from_wire(seo.description),
        keywords: seo.keywords,
        canonical_url: text_from_wire(seo.canonical_url),
        og_image,
        twitter_card: text_from_wire(seo.twitter_card),
    })
}

fn flags_from_wire(raw: Opt<WireFlags>) -> FeatureFlags {
    match raw.into_option() {
        Some(flags) => FeatureFlags {
            featured: flags.featured,
            editors_pick: flags.editors_pick,
            allow_comments: flags.allow_comments,
            hero_layout: layout_from_wire(flags.hero_layout),
        },
        None => DEFAULT_FEATURE_FLAGS,
    }
}

fn metrics_from_wire(raw: &WireMetrics) -> Result<PostMetrics, CodecError> {
    Ok(PostMetrics {
        views: nat_to_u64("metrics.views", &raw.views)?,
        likes: nat_to_u64("metrics.likes", &raw.likes)?,
        shares: nat_to_u64("metrics.shares", &raw.shares)?,
    })
}

fn blocks_from_wire(
    slots: Vec<WireBlockSlot>,
    fallbacks: &mut Vec<BlockFallback>,
) -> Result<Vec<ContentBlock>, CodecError> {
    let mut blocks = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        let block = match slot {
            WireBlockSlot::Known(WireContentBlock::Heading(heading))
                if !(ContentBlock::MIN_HEADING_LEVEL..=ContentBlock::MAX_HEADING_LEVEL)
                    .contains(&heading.level) =>
            {
                record_fallback(
                    fallbacks,
                    index,
                    FallbackReason::InvalidValue {
                        tag: "Heading".into(),
                        detail: format!("heading level {} outside 1..=6", heading.level),
                    },
                )
            }
            WireBlockSlot::Known(known) => block_from_wire(index, known)?,
            WireBlockSlot::Unrecognized(value) => {
                record_fallback(fallbacks, index, classify_unrecognized(&value))
            }
        };
        blocks.push(block);
    }
    Ok(blocks)
}

fn record_fallback(
    fallbacks: &mut Vec<BlockFallback>,
    index: usize,
    reason: FallbackReason,
) -> ContentBlock {
    tracing::warn!(index, reason = %reason, "content block replaced with empty paragraph");
    fallbacks.push(BlockFallback { index, reason });
    ContentBlock::fallback()
}

fn classify_unrecognized(value: &WireValue) -> FallbackReason {
    match value.as_object() {
        Some(map) if map.len() == 1 => match map.keys().next() {
            Some(tag) if WireContentBlock::TAGS.contains(&tag.as_str()) => {
                FallbackReason::MalformedPayload { tag: tag.clone() }
            }
            Some(tag) => FallbackReason::UnrecognizedTag(tag.clone()),
            None => FallbackReason::NotAVariant,
        },
        _ => FallbackReason::NotAVariant,
    }
}

fn block_from_wire(index: usize, raw: WireContentBlock) -> Result<ContentBlock, CodecError> {
    Ok(match raw {
        WireContentBlock::Paragraph(paragraph) => ContentBlock::Paragraph {
            text: paragraph.text,
        },
        WireContentBlock::Heading(heading) => ContentBlock::Heading {
            level: heading.level,
            text: heading.text,
            anchor: text_from_wire(heading.anchor),
        },
        WireContentBlock::Quote(quote) => ContentBlock::Quote {
            text: quote.text,
            attribution: text_from_wire(quote.attribution),
        },
        WireContentBlock::List(list) => ContentBlock::List {
            ordered: list.ordered,
            items: list.items,
        },
        WireContentBlock::Image(image) => ContentBlock::Image {
            asset: asset_from_wire(&format!("content[{index}].asset"), image.asset)?,
            full_width: image.full_width,
        },
        WireContentBlock::Code(code) => ContentBlock::Code {
            language: code.language,
            code: code.code,
        },
        WireContentBlock::Embed(embed) => ContentBlock::Embed {
            provider: text_from_wire(embed.provider),
            url: embed.url,
            title: text_from_wire(embed.title),
        },
        WireContentBlock::Callout(callout) => ContentBlock::Callout {
            tone: tone_from_wire(callout.tone),
            title: callout.title,
            body: callout.body,
        },
        WireContentBlock::Divider(()) => ContentBlock::Divider,
    })
}

fn tone_from_wire(raw: WireTone) -> CalloutTone {
    match raw {
        WireTone::Info(()) => CalloutTone::Info,
        WireTone::Success(()) => CalloutTone::Success,
        WireTone::Warning(()) => CalloutTone::Warning,
        WireTone::Danger(()) => CalloutTone::Danger,
        WireTone::Tip(()) => CalloutTone::Tip,
    }
}

fn status_from_wire(raw: WireStatus) -> PostStatus {
    match raw {
        WireStatus::Draft(()) => PostStatus::Draft,
        WireStatus::Scheduled(()) => PostStatus::Scheduled,
        WireStatus::Published(()) => PostStatus::Published,
        WireStatus::Archived(()) => PostStatus::Archived,
    }
}

fn layout_from_wire(raw: WireHeroLayout) -> HeroLayout {
    match raw {
        WireHeroLayout::Classic(()) => HeroLayout::Classic,
        WireHeroLayout::Split(()) => HeroLayout::Split,
        WireHeroLayout::Overlay(()) => HeroLayout::Overlay,
        WireHeroLayout::Minimal(()) => HeroLayout::Minimal,
    }
}

fn ids_from_wire(raw: Vec<Nat>) -> Result<Vec<u64>, CodecError> {
    raw.iter()
        .enumerate()
        .map(|(idx, id)| nat_to_u64(&format!("related[{idx}]"), id))
        .collect()
}

fn nat_to_u64(field: &str, value: &Nat) -> Result<u64, CodecError> {
    value.to_u64().ok_or_else(|| out_of_range(field, value, "u64"))
}

fn nat_to_u32(field: &str, value: &Nat) -> Result<u32, CodecError> {
    value.to_u32().ok_or_else(|| out_of_range(field, value, "u32"))
}

fn out_of_range(field: &str, value: &Nat, limit: &'static str) -> CodecError {
    CodecError::IntegerOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        limit,
    }
}

fn timestamp_from_wire(field: &str, value: &Nat) -> Result<DateTime<Utc>, CodecError> {
    let nanos = value
        .to_i64()
        .ok_or_else(|| out_of_range(field, value, "i64 nanoseconds"))?;
    Ok(Utc.timestamp_nanos(nanos))
}

fn optional_timestamp_from_wire(
    field: &str,
    value: Opt<Nat>,
) -> Result<Option<DateTime<Utc>>, CodecError> {
    value
        .as_option()
        .map(|nanos| timestamp_from_wire(field, nanos))
        .transpose()
}
