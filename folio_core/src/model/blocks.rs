use serde::{Deserialize, Serialize};

use super::{blank_to_none, MediaAsset};

/// One unit of post body content. Order inside a post is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Heading {
        level: u8,
        text: String,
        #[serde(default)]
        anchor: Option<String>,
    },
    Quote {
        text: String,
        #[serde(default)]
        attribution: Option<String>,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Image {
        asset: MediaAsset,
        #[serde(default)]
        full_width: bool,
    },
    Code {
        language: String,
        code: String,
    },
    Embed {
        #[serde(default)]
        provider: Option<String>,
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
    Callout {
        tone: CalloutTone,
        title: String,
        body: String,
    },
    Divider,
}

impl ContentBlock {
    pub const MIN_HEADING_LEVEL: u8 = 1;
    pub const MAX_HEADING_LEVEL: u8 = 6;

    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    /// Block substituted for wire entries that cannot be decoded.
    pub fn fallback() -> Self {
        ContentBlock::Paragraph {
            text: String::new(),
        }
    }

    pub fn normalized(self) -> Self {
        match self {
            ContentBlock::Heading {
                level,
                text,
                anchor,
            } => ContentBlock::Heading {
                level,
                text,
                anchor: blank_to_none(anchor),
            },
            ContentBlock::Quote { text, attribution } => ContentBlock::Quote {
                text,
                attribution: blank_to_none(attribution),
            },
            ContentBlock::Image { asset, full_width } => ContentBlock::Image {
                asset: asset.normalized(),
                full_width,
            },
            ContentBlock::Embed {
                provider,
                url,
                title,
            } => ContentBlock::Embed {
                provider: blank_to_none(provider),
                url,
                title: blank_to_none(title),
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutTone {
    Info,
    Success,
    Warning,
    Danger,
    Tip,
}
