//! Structural validation applied to payloads before they leave the process.

use crate::model::{ContentBlock, CreatePostPayload, MediaAsset};
use regex::Regex;
use reqwest::Url;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every problem found in a payload. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|err| err.field.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields().any(|name| name == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.errors.len())?;
        for err in &self.errors {
            write!(f, "; {}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn slug_pattern() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("slug regex"))
}

fn hex_color_pattern() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color regex")
    })
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    fn check_url(&mut self, field: &str, value: Option<&str>) {
        let Some(raw) = value else {
            return;
        };
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => self.push(field, format!("unsupported URL scheme `{}`", url.scheme())),
            Err(err) => self.push(field, format!("malformed URL: {err}")),
        }
    }

    fn check_asset(&mut self, field: &str, asset: &MediaAsset, require_alt: bool) {
        self.require_text(&format!("{field}.ref.bucket"), &asset.storage_ref.bucket);
        self.require_text(&format!("{field}.ref.path"), &asset.storage_ref.path);
        if require_alt && asset.alt.trim().is_empty() {
            self.push(
                format!("{field}.alt"),
                "alternative text is required on published posts",
            );
        }
    }
}

pub fn validate_payload(payload: &CreatePostPayload) -> Result<(), ValidationErrors> {
    let mut check = Collector::default();
    let require_alt = payload.status.is_public();

    if !slug_pattern().is_match(&payload.slug) {
        check.push("slug", "must contain only lowercase letters, digits and dashes");
    }
    check.require_text("title", &payload.title);

    if payload.tags.is_empty() {
        check.push("tags", "at least one tag is required");
    }
    for (idx, tag) in payload.tags.iter().enumerate() {
        check.require_text(&format!("tags[{idx}]"), tag);
    }

    check.require_text("author.name", &payload.author.name);
    check.check_url("author.avatarUrl", payload.author.avatar_url.as_deref());

    if let Some(hero) = &payload.hero {
        check.check_asset("hero.media", &hero.media, require_alt);
        check.check_url("hero.ctaUrl", hero.cta_url.as_deref());
        if let Some(color) = hero.accent_color.as_deref() {
            if !hex_color_pattern().is_match(color) {
                check.push("hero.accentColor", "must be a hex color such as #1a2b3c");
            }
        }
    }

    for (idx, asset) in payload.gallery.iter().enumerate() {
        check.check_asset(&format!("gallery[{idx}]"), asset, require_alt);
    }

    if payload.content.is_empty() {
        check.push("content", "at least one content block is required");
    }
    for (idx, block) in payload.content.iter().enumerate() {
        validate_block(&mut check, &format!("content[{idx}]"), block, require_alt);
    }

    check.check_url("seo.canonicalUrl", payload.seo.canonical_url.as_deref());
    if let Some(og_image) = &payload.seo.og_image {
        check.check_asset("seo.ogImage", og_image, require_alt);
    }

    if payload.status == crate::model::PostStatus::Scheduled && payload.scheduled_for.is_none() {
        check.push("scheduledFor", "scheduled posts need a publication time");
    }

    if check.errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors {
            errors: check.errors,
        })
    }
}

fn validate_block(check: &mut Collector, field: &str, block: &ContentBlock, require_alt: bool) {
    match block {
        ContentBlock::Heading { level, .. } => {
            if !(ContentBlock::MIN_HEADING_LEVEL..=ContentBlock::MAX_HEADING_LEVEL).contains(level)
            {
                check.push(format!("{field}.level"), "heading level must be between 1 and 6");
            }
        }
        ContentBlock::List { items, .. } => {
            if items.is_empty() {
                check.push(format!("{field}.items"), "a list needs at least one item");
            }
        }
        ContentBlock::Image { asset, .. } => {
            check.check_asset(&format!("{field}.asset"), asset, require_alt);
        }
        ContentBlock::Embed { url, .. } => {
            check.check_url(&format!("{field}.url"), Some(url));
        }
        ContentBlock::Paragraph { .. }
        | ContentBlock::Quote { .. }
        | ContentBlock::Code { .. }
        | ContentBlock::Callout { .. }
        | ContentBlock::Divider => {}
    }
}
