use crate::model::ContentBlock;

pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time in whole minutes, never less than one.
pub fn estimate_reading_minutes(blocks: &[ContentBlock]) -> u32 {
    let words: usize = blocks.iter().map(block_word_count).sum();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

fn block_word_count(block: &ContentBlock) -> usize {
    match block {
        ContentBlock::Paragraph { text } => count_words(text),
        ContentBlock::Heading { text, .. } => count_words(text),
        ContentBlock::Quote { text, attribution } => {
            count_words(text) + attribution.as_deref().map_or(0, count_words)
        }
        ContentBlock::List { items, .. } => items.iter().map(|item| count_words(item)).sum(),
        ContentBlock::Code { code, .. } => count_words(code),
        ContentBlock::Embed { title, .. } => title.as_deref().map_or(0, count_words),
        ContentBlock::Callout { title, body, .. } => count_words(title) + count_words(body),
        ContentBlock::Image { .. } | ContentBlock::Divider => 0,
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
