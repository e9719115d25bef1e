//! Translation between the document model and the backend's wire format.
//!
//! The backend speaks a constrained dialect: optionals are zero-or-one
//! element arrays, closed sets are single-key objects (`{"Divider": null}`)
//! and integers are arbitrary-precision naturals. Only this module knows
//! about any of that.

mod codec;
mod primitives;
pub mod schema;

pub use codec::{
    decode_payload, decode_post, decode_summary, encode_payload, encode_post, encode_summary,
};
pub use primitives::{opt_text, Nat, Opt};

use std::fmt;

/// Loosely-typed value exchanged with the backend.
pub type WireValue = serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("wire value does not match the {target} schema: {source}")]
    Structure {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} = {value} does not fit in {limit}")]
    IntegerOutOfRange {
        field: String,
        value: String,
        limit: &'static str,
    },
    #[error("{field} is outside the representable timestamp range")]
    TimestampOutOfRange { field: String },
    #[error("failed to serialize wire value: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A decoded value together with every content block that had to be
/// replaced by the fallback paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub fallbacks: Vec<BlockFallback>,
}

impl<T> Decoded<T> {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFallback {
    /// Position of the block inside `content`.
    pub index: usize,
    pub reason: FallbackReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    UnrecognizedTag(String),
    MalformedPayload { tag: String },
    InvalidValue { tag: String, detail: String },
    NotAVariant,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::UnrecognizedTag(tag) => write!(f, "unrecognized block tag `{tag}`"),
            FallbackReason::MalformedPayload { tag } => {
                write!(f, "malformed payload for block tag `{tag}`")
            }
            FallbackReason::InvalidValue { tag, detail } => write!(f, "invalid `{tag}`: {detail}"),
            FallbackReason::NotAVariant => f.write_str("entry is not a single-key variant"),
        }
    }
}

impl fmt::Display for BlockFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content[{}]: {}", self.index, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Author, CalloutTone, ContentBlock, CreatePostPayload, FeatureFlags, HeroLayout,
        HeroSettings, MediaAsset, Post, PostMetrics, PostStatus, SeoMeta, StorageRef,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn asset(path: &str) -> MediaAsset {
        MediaAsset::new(StorageRef::new("assets", path), "described")
    }

    fn rich_asset(path: &str) -> MediaAsset {
        MediaAsset {
            storage_ref: StorageRef {
                bucket: "assets".into(),
                path: path.into(),
                mime: Some("image/png".into()),
                size: Some(48_213),
            },
            alt: "A harbour at dusk".into(),
            caption: Some("Evening light".into()),
            credit: Some("K. Ito".into()),
            aspect_ratio: Some(1.5),
        }
    }

    fn all_blocks() -> Vec<ContentBlock> {
        vec![
            ContentBlock::paragraph("Opening words."),
            ContentBlock::Heading {
                level: 2,
                text: "Section".into(),
                anchor: Some("section".into()),
            },
            ContentBlock::Heading {
                level: 6,
                text: "Deep".into(),
                anchor: None,
            },
            ContentBlock::Quote {
                text: "Quoted".into(),
                attribution: Some("Someone".into()),
            },
            ContentBlock::Quote {
                text: "Anonymous".into(),
                attribution: None,
            },
            ContentBlock::List {
                ordered: true,
                items: vec!["first".into(), "second".into()],
            },
            ContentBlock::Image {
                asset: rich_asset("posts/9/body/a.png"),
                full_width: true,
            },
            ContentBlock::Image {
                asset: asset("posts/9/body/b.png"),
                full_width: false,
            },
            ContentBlock::Code {
                language: "rust".into(),
                code: "let x = 1;".into(),
            },
            ContentBlock::Embed {
                provider: Some("video".into()),
                url: "https://example.com/watch".into(),
                title: Some("Demo".into()),
            },
            ContentBlock::Embed {
                provider: None,
                url: "https://example.com/raw".into(),
                title: None,
            },
            ContentBlock::Callout {
                tone: CalloutTone::Warning,
                title: "Careful".into(),
                body: "Mind the gap".into(),
            },
            ContentBlock::Divider,
        ]
    }

    fn sample_payload() -> CreatePostPayload {
        CreatePostPayload {
            slug: "harbour-notes".into(),
            title: "Harbour notes".into(),
            subtitle: Some("A walk".into()),
            excerpt: "Short".into(),
            category: "travel".into(),
            tags: vec!["sea".into(), "walks".into()],
            author: Author {
                name: "Kai".into(),
                avatar_url: Some("https://cdn.example.com/kai.png".into()),
                bio: None,
            },
            hero: Some(HeroSettings {
                media: rich_asset("posts/tmp/abc123/hero/x.png"),
                overlay_title: Some("Harbour".into()),
                overlay_subtitle: None,
                cta_label: Some("Read".into()),
                cta_url: Some("https://example.com/read".into()),
                accent_color: Some("#112233".into()),
            }),
            gallery: vec![asset("posts/tmp/abc123/gallery/1.png"), rich_asset("posts/9/g.png")],
            content: all_blocks(),
            seo: SeoMeta {
                title: Some("Harbour notes".into()),
                description: None,
                keywords: vec!["harbour".into()],
                canonical_url: Some("https://example.com/harbour".into()),
                og_image: Some(asset("posts/tmp/abc123/og/card.png")),
                twitter_card: Some("summary_large_image".into()),
            },
            status: PostStatus::Scheduled,
            flags: FeatureFlags {
                featured: true,
                editors_pick: false,
                allow_comments: false,
                hero_layout: HeroLayout::Overlay,
            },
            scheduled_for: Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
            related: vec![3, 5, u64::MAX],
        }
    }

    fn sample_post() -> Post {
        let created = Utc.timestamp_nanos(1_700_000_000_123_456_789);
        let mut post = sample_payload().into_post(42, created);
        post.metrics = PostMetrics {
            views: 10,
            likes: 2,
            shares: u64::MAX,
        };
        post.published_at = Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        post
    }

    #[test]
    fn payload_round_trips_through_the_wire() {
        let payload = sample_payload();
        let wire = encode_payload(&payload).expect("encode");
        let decoded = decode_payload(&wire).expect("decode");
        assert!(decoded.is_clean());
        assert_eq!(decoded.value, payload);
    }

    #[test]
    fn post_round_trips_through_the_wire() {
        let post = sample_post();
        let wire = encode_post(&post).expect("encode");
        let decoded = decode_post(&wire).expect("decode");
        assert!(decoded.is_clean());
        assert_eq!(decoded.value, post);
    }

    #[test]
    fn every_block_variant_round_trips_alone() {
        for block in all_blocks() {
            let mut payload = sample_payload();
            payload.content = vec![block.clone()];
            let wire = encode_payload(&payload).expect("encode");
            let decoded = decode_payload(&wire).expect("decode");
            assert_eq!(decoded.value.content, vec![block]);
        }
    }

    #[test]
    fn summary_round_trips_and_matches_post() {
        let post = sample_post();
        let summary = post.summary();
        let wire = encode_summary(&summary).expect("encode");
        assert!(wire.get("content").is_none());
        assert!(wire.get("seo").is_none());
        assert_eq!(wire["seoTitle"], json!(["Harbour notes"]));
        assert_eq!(wire["seoDescription"], json!([]));
        assert_eq!(decode_summary(&wire).expect("decode"), summary);
    }

    #[test]
    fn variants_are_single_key_objects() {
        let mut payload = sample_payload();
        payload.content = vec![
            ContentBlock::Divider,
            ContentBlock::Callout {
                tone: CalloutTone::Tip,
                title: "t".into(),
                body: "b".into(),
            },
        ];
        let wire = encode_payload(&payload).expect("encode");
        assert_eq!(wire["content"][0], json!({ "Divider": null }));
        assert_eq!(wire["content"][1]["Callout"]["tone"], json!({ "tip": null }));
        assert_eq!(wire["status"], json!({ "Scheduled": null }));
        assert_eq!(wire["flags"][0]["heroLayout"], json!({ "overlay": null }));
    }

    #[test]
    fn defaults_and_blanks_encode_as_empty_sequences() {
        let mut payload = sample_payload();
        payload.subtitle = Some("   ".into());
        payload.hero = None;
        payload.seo = SeoMeta::default();
        payload.flags = FeatureFlags::default();
        payload.scheduled_for = None;
        let wire = encode_payload(&payload).expect("encode");
        assert_eq!(wire["subtitle"], json!([]));
        assert_eq!(wire["hero"], json!([]));
        assert_eq!(wire["seo"], json!([]));
        assert_eq!(wire["flags"], json!([]));
        assert_eq!(wire["scheduledFor"], json!([]));

        let decoded = decode_payload(&wire).expect("decode").value;
        assert_eq!(decoded, payload.normalized());
        assert_eq!(decoded.seo, SeoMeta::default());
        assert_eq!(decoded.flags, FeatureFlags::default());
    }

    #[test]
    fn seo_with_only_blank_fields_is_absent() {
        let mut payload = sample_payload();
        payload.seo = SeoMeta {
            title: Some("".into()),
            ..SeoMeta::default()
        };
        let wire = encode_payload(&payload).expect("encode");
        assert_eq!(wire["seo"], json!([]));
    }

    #[test]
    fn integers_cross_as_decimal_strings() {
        let wire = encode_post(&sample_post()).expect("encode");
        assert_eq!(wire["id"], json!("42"));
        assert_eq!(wire["metrics"]["shares"], json!(u64::MAX.to_string()));
        assert_eq!(wire["related"][2], json!(u64::MAX.to_string()));
        assert_eq!(wire["createdAt"], json!("1700000000123456789"));
    }

    #[test]
    fn unknown_block_tag_falls_back_to_empty_paragraph() {
        let mut wire = encode_payload(&sample_payload()).expect("encode");
        wire["content"] = json!([
            { "Paragraph": { "text": "kept" } },
            { "Poll": { "question": "?" } },
            { "Heading": { "text": "missing level", "anchor": [] } },
            { "Heading": { "level": 9, "text": "too deep", "anchor": [] } },
            "Divider",
        ]);
        let decoded = decode_payload(&wire).expect("decode");
        assert_eq!(
            decoded.value.content,
            vec![
                ContentBlock::paragraph("kept"),
                ContentBlock::fallback(),
                ContentBlock::fallback(),
                ContentBlock::fallback(),
                ContentBlock::fallback(),
            ]
        );
        let reasons: Vec<_> = decoded
            .fallbacks
            .iter()
            .map(|fallback| (fallback.index, fallback.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (1, FallbackReason::UnrecognizedTag("Poll".into())),
                (
                    2,
                    FallbackReason::MalformedPayload {
                        tag: "Heading".into()
                    }
                ),
                (
                    3,
                    FallbackReason::InvalidValue {
                        tag: "Heading".into(),
                        detail: "heading level 9 outside 1..=6".into(),
                    }
                ),
                (4, FallbackReason::NotAVariant),
            ]
        );
    }

    #[test]
    fn unknown_tags_outside_content_are_fatal() {
        let mut wire = encode_payload(&sample_payload()).expect("encode");
        wire["status"] = json!({ "Deleted": null });
        let err = decode_payload(&wire).expect_err("unknown status");
        assert!(matches!(err, CodecError::Structure { target: "payload", .. }));
    }

    #[test]
    fn oversized_integers_are_reported_not_wrapped() {
        let mut wire = encode_post(&sample_post()).expect("encode");
        wire["metrics"]["views"] = json!("18446744073709551616");
        match decode_post(&wire).expect_err("overflow") {
            CodecError::IntegerOutOfRange { field, value, .. } => {
                assert_eq!(field, "metrics.views");
                assert_eq!(value, "18446744073709551616");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let mut wire = encode_post(&sample_post()).expect("encode");
        wire["gallery"][1]["ref"]["size"] = json!(["99999999999999999999"]);
        match decode_post(&wire).expect_err("overflow") {
            CodecError::IntegerOutOfRange { field, .. } => {
                assert_eq!(field, "gallery[1].ref.size");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn optional_with_two_elements_is_structural_error() {
        let mut wire = encode_payload(&sample_payload()).expect("encode");
        wire["subtitle"] = json!(["a", "b"]);
        assert!(matches!(
            decode_payload(&wire),
            Err(CodecError::Structure { .. })
        ));
    }

    #[test]
    fn plain_json_integers_are_accepted_for_naturals() {
        let mut wire = encode_post(&sample_post()).expect("encode");
        wire["id"] = json!(42);
        wire["readingMinutes"] = json!(3);
        let post = decode_post(&wire).expect("decode").value;
        assert_eq!(post.id, 42);
        assert_eq!(post.reading_minutes, 3);
    }
}
