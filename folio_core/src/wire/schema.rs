//! Wire-side mirror of the document model.
//!
//! Every optional field is an [`Opt`], every closed set is a single-key
//! object and every integer that can grow is a [`Nat`]. Nothing outside the
//! `wire` module should construct these directly.

use super::primitives::{Nat, Opt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireStorageRef {
    pub bucket: String,
    pub path: String,
    pub mime: Opt<String>,
    pub size: Opt<Nat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMediaAsset {
    #[serde(rename = "ref")]
    pub storage_ref: WireStorageRef,
    pub alt: String,
    pub caption: Opt<String>,
    pub credit: Opt<String>,
    pub aspect_ratio: Opt<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireParagraph {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireHeading {
    pub level: u8,
    pub text: String,
    pub anchor: Opt<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireQuote {
    pub text: String,
    pub attribution: Opt<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireList {
    pub ordered: bool,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireImage {
    pub asset: WireMediaAsset,
    pub full_width: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCode {
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEmbed {
    pub provider: Opt<String>,
    pub url: String,
    pub title: Opt<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCallout {
    pub tone: WireTone,
    pub title: String,
    pub body: String,
}

/// Payload-less variants carry `()` so they encode as `{"Tag": null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireContentBlock {
    Paragraph(WireParagraph),
    Heading(WireHeading),
    Quote(WireQuote),
    List(WireList),
    Image(WireImage),
    Code(WireCode),
    Embed(WireEmbed),
    Callout(WireCallout),
    Divider(()),
}

impl WireContentBlock {
    pub const TAGS: [&'static str; 9] = [
        "Paragraph",
        "Heading",
        "Quote",
        "List",
        "Image",
        "Code",
        "Embed",
        "Callout",
        "Divider",
    ];
}

/// A content entry as it arrives: either a recognized block or whatever the
/// sender put there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireBlockSlot {
    Known(WireContentBlock),
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireTone {
    #[serde(rename = "info")]
    Info(()),
    #[serde(rename = "success")]
    Success(()),
    #[serde(rename = "warning")]
    Warning(()),
    #[serde(rename = "danger")]
    Danger(()),
    #[serde(rename = "tip")]
    Tip(()),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireStatus {
    Draft(()),
    Scheduled(()),
    Published(()),
    Archived(()),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireHeroLayout {
    #[serde(rename = "classic")]
    Classic(()),
    #[serde(rename = "split")]
    Split(()),
    #[serde(rename = "overlay")]
    Overlay(()),
    #[serde(rename = "minimal")]
    Minimal(()),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAuthor {
    pub name: String,
    pub avatar_url: Opt<String>,
    pub bio: Opt<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHero {
    pub media: WireMediaAsset,
    pub overlay_title: Opt<String>,
    pub overlay_subtitle: Opt<String>,
    pub cta_label: Opt<String>,
    pub cta_url: Opt<String>,
    pub accent_color: Opt<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSeo {
    pub title: Opt<String>,
    pub description: Opt<String>,
    pub keywords: Vec<String>,
    pub canonical_url: Opt<String>,
    pub og_image: Opt<WireMediaAsset>,
    pub twitter_card: Opt<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFlags {
    pub featured: bool,
    pub editors_pick: bool,
    pub allow_comments: bool,
    pub hero_layout: WireHeroLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMetrics {
    pub views: Nat,
    pub likes: Nat,
    pub shares: Nat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePayload {
    pub slug: String,
    pub title: String,
    pub subtitle: Opt<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: WireAuthor,
    pub hero: Opt<WireHero>,
    pub gallery: Vec<WireMediaAsset>,
    pub content: Vec<WireBlockSlot>,
    pub seo: Opt<WireSeo>,
    pub status: WireStatus,
    pub flags: Opt<WireFlags>,
    pub scheduled_for: Opt<Nat>,
    pub related: Vec<Nat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePost {
    pub id: Nat,
    pub slug: String,
    pub title: String,
    pub subtitle: Opt<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: WireAuthor,
    pub hero: Opt<WireHero>,
    pub gallery: Vec<WireMediaAsset>,
    pub content: Vec<WireBlockSlot>,
    pub seo: Opt<WireSeo>,
    pub reading_minutes: Nat,
    pub status: WireStatus,
    pub flags: Opt<WireFlags>,
    pub metrics: WireMetrics,
    pub created_at: Nat,
    pub updated_at: Nat,
    pub published_at: Opt<Nat>,
    pub scheduled_for: Opt<Nat>,
    pub related: Vec<Nat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePostSummary {
    pub id: Nat,
    pub slug: String,
    pub title: String,
    pub subtitle: Opt<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: WireAuthor,
    pub hero: Opt<WireHero>,
    pub reading_minutes: Nat,
    pub status: WireStatus,
    pub flags: Opt<WireFlags>,
    pub metrics: WireMetrics,
    pub seo_title: Opt<String>,
    pub seo_description: Opt<String>,
    pub created_at: Nat,
    pub updated_at: Nat,
    pub published_at: Opt<Nat>,
    pub scheduled_for: Opt<Nat>,
}
