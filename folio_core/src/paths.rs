//! Object-store path conventions for post media.
//!
//! Drafts upload into `posts/tmp/<draftId>/<folder>/<filename>`. Once the
//! backend assigns an id the same object lives at
//! `posts/<postId>/<folder>/<filename>`.

use crate::model::{PostId, StorageRef};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

pub const POSTS_ROOT: &str = "posts";
pub const TEMPORARY_PREFIX: &str = "posts/tmp/";

/// Identifier for a post that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftId(String);

impl DraftId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns `None` for ids that would not survive as a single path segment.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Splits a temporary path into its draft id and the remainder after it.
fn split_temporary(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix(TEMPORARY_PREFIX)?;
    let (draft, tail) = rest.split_once('/')?;
    if draft.is_empty() || tail.is_empty() {
        return None;
    }
    Some((draft, tail))
}

pub fn is_temporary(path: &str) -> bool {
    split_temporary(path).is_some()
}

/// Draft id embedded in a temporary path, if any.
pub fn draft_of(path: &str) -> Option<&str> {
    split_temporary(path).map(|(draft, _)| draft)
}

/// Permanent location of `path` for `post_id`. Paths outside the temporary
/// namespace, including malformed temporary ones, are returned unchanged.
pub fn permanent_path(path: &str, post_id: PostId) -> String {
    match split_temporary(path) {
        Some((_, tail)) => format!("{POSTS_ROOT}/{post_id}/{tail}"),
        None => path.to_string(),
    }
}

pub fn promote_ref(storage_ref: &StorageRef, post_id: PostId) -> StorageRef {
    StorageRef {
        path: permanent_path(&storage_ref.path, post_id),
        ..storage_ref.clone()
    }
}

pub fn temporary_path(draft: &DraftId, folder: &str, filename: &str) -> String {
    let folder = folder.trim_matches('/');
    let filename = sanitize_filename(filename);
    if folder.is_empty() {
        format!("{TEMPORARY_PREFIX}{draft}/{filename}")
    } else {
        format!("{TEMPORARY_PREFIX}{draft}/{folder}/{filename}")
    }
}

fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|file| file.to_str())
        .unwrap_or("upload")
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_draft_segment_and_keeps_tail() {
        assert_eq!(
            permanent_path("posts/tmp/abc123/hero/x.png", 42),
            "posts/42/hero/x.png"
        );
        assert_eq!(
            permanent_path("posts/tmp/abc123/gallery/2024/a b.jpg", 7),
            "posts/7/gallery/2024/a b.jpg"
        );
    }

    #[test]
    fn leaves_non_temporary_paths_alone() {
        for path in [
            "posts/42/hero/x.png",
            "avatars/sam.png",
            "posts/tmp/",
            "posts/tmp/abc123",
            "posts/tmp/abc123/",
            "posts/tmp//hero/x.png",
            "",
        ] {
            assert_eq!(permanent_path(path, 9), path, "path {path:?}");
            assert!(!is_temporary(path), "path {path:?}");
        }
    }

    #[test]
    fn promotion_is_idempotent() {
        let original = StorageRef::new("assets", "posts/tmp/abc123/hero/x.png");
        let once = promote_ref(&original, 42);
        let twice = promote_ref(&once, 42);
        assert_eq!(once, twice);
        assert_eq!(once.bucket, "assets");
    }

    #[test]
    fn builds_temporary_paths_for_drafts() {
        let draft = DraftId::parse("abc123").expect("draft id");
        let path = temporary_path(&draft, "/hero/", "../My Cover.png");
        assert_eq!(path, "posts/tmp/abc123/hero/My_Cover.png");
        assert!(is_temporary(&path));
        assert_eq!(draft_of(&path), Some("abc123"));
    }

    #[test]
    fn generated_draft_ids_are_path_safe() {
        let draft = DraftId::generate();
        assert!(DraftId::parse(draft.as_str()).is_some());
        assert!(DraftId::parse("a/b").is_none());
        assert!(DraftId::parse("").is_none());
    }
}
