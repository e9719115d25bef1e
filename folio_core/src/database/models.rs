use serde::{Deserialize, Serialize};

/// Row of the `posts` table. `document` holds the post's wire encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    pub slug: String,
    pub status: String,
    pub document: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewPostRecord {
    pub slug: String,
    pub status: String,
    pub created_at: String,
}
