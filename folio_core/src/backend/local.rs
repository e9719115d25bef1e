use super::{BackendError, PostBackend};
use crate::database::models::{NewPostRecord, PostRecord};
use crate::database::repositories::PostRepository;
use crate::database::Database;
use crate::model::{CreatePostPayload, Post, PostId};
use crate::utils::now_utc;
use crate::validation::validate_payload;
use crate::wire::{decode_payload, decode_post, encode_post, encode_summary, WireValue};
use anyhow::Context;
use async_trait::async_trait;

/// SQLite-backed implementation of the backend procedure contract.
#[derive(Clone)]
pub struct LocalBackend {
    database: Database,
}

impl LocalBackend {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn accept_payload(&self, wire: &WireValue) -> Result<CreatePostPayload, BackendError> {
        let decoded = decode_payload(wire)?;
        if !decoded.is_clean() {
            return Err(BackendError::rejected(format!(
                "payload carries {} unreadable content block(s)",
                decoded.fallbacks.len()
            )));
        }
        let payload = decoded.into_value().normalized();
        validate_payload(&payload).map_err(|errors| BackendError::rejected(errors.to_string()))?;
        Ok(payload)
    }
}

fn record_id(id: PostId) -> Option<i64> {
    i64::try_from(id).ok()
}

fn read_document(record: &PostRecord) -> anyhow::Result<Post> {
    let wire: WireValue = serde_json::from_str(&record.document)
        .with_context(|| format!("stored document for post {} is not JSON", record.id))?;
    Ok(decode_post(&wire)?.into_value())
}

fn write_document(record: &mut PostRecord, post: &Post) -> anyhow::Result<WireValue> {
    let wire = encode_post(post)?;
    record.slug = post.slug.clone();
    record.status = post.status.as_str().to_string();
    record.document = serde_json::to_string(&wire)?;
    record.updated_at = post.updated_at.to_rfc3339();
    Ok(wire)
}

#[async_trait]
impl PostBackend for LocalBackend {
    async fn create_post(&self, payload: WireValue) -> Result<WireValue, BackendError> {
        let payload = self.accept_payload(&payload)?;
        let now = now_utc();
        let wire = self
            .database
            .with_transaction(|repos| {
                let posts = repos.posts();
                if posts.get_by_slug(&payload.slug)?.is_some() {
                    return Err(
                        BackendError::rejected(format!("slug `{}` is taken", payload.slug)).into(),
                    );
                }
                let id = posts.reserve(&NewPostRecord {
                    slug: payload.slug.clone(),
                    status: payload.status.as_str().to_string(),
                    created_at: now.to_rfc3339(),
                })?;
                let mut record = posts
                    .get(id)?
                    .context("reserved post row disappeared")?;
                let post = payload.clone().into_post(id as PostId, now);
                let wire = write_document(&mut record, &post)?;
                posts.save(&record)?;
                Ok(wire)
            })
            .map_err(BackendError::from_anyhow)?;
        tracing::info!(slug = %payload.slug, "stored new post");
        Ok(wire)
    }

    async fn replace_post(
        &self,
        id: PostId,
        payload: WireValue,
    ) -> Result<Option<WireValue>, BackendError> {
        let payload = self.accept_payload(&payload)?;
        let Some(row_id) = record_id(id) else {
            return Ok(None);
        };
        let now = now_utc();
        self.database
            .with_transaction(|repos| {
                let posts = repos.posts();
                let Some(mut record) = posts.get(row_id)? else {
                    return Ok(None);
                };
                if let Some(other) = posts.get_by_slug(&payload.slug)? {
                    if other.id != row_id {
                        return Err(BackendError::rejected(format!(
                            "slug `{}` is taken",
                            payload.slug
                        ))
                        .into());
                    }
                }
                let mut post = read_document(&record)?;
                post.apply_payload(payload, now);
                let wire = write_document(&mut record, &post)?;
                posts.save(&record)?;
                tracing::debug!(post_id = id, "replaced post");
                Ok(Some(wire))
            })
            .map_err(BackendError::from_anyhow)
    }

    async fn get_post_by_id(&self, id: PostId) -> Result<Option<WireValue>, BackendError> {
        let Some(row_id) = record_id(id) else {
            return Ok(None);
        };
        self.database
            .with_repositories(|repos| {
                let Some(record) = repos.posts().get(row_id)? else {
                    return Ok(None);
                };
                if record.document.is_empty() {
                    return Ok(None);
                }
                let wire = serde_json::from_str(&record.document)
                    .with_context(|| format!("stored document for post {id} is not JSON"))?;
                Ok(Some(wire))
            })
            .map_err(BackendError::from_anyhow)
    }

    async fn list_posts(&self, limit: usize) -> Result<Vec<WireValue>, BackendError> {
        self.database
            .with_repositories(|repos| {
                let records = repos.posts().list_recent(limit)?;
                let mut summaries = Vec::with_capacity(records.len());
                for record in &records {
                    let post = read_document(record)?;
                    summaries.push(encode_summary(&post.summary())?);
                }
                Ok(summaries)
            })
            .map_err(BackendError::from_anyhow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Author, ContentBlock, FeatureFlags, HeroSettings, MediaAsset, PostStatus, SeoMeta,
        StorageRef,
    };
    use crate::wire::{decode_summary, encode_payload};
    use rusqlite::Connection;
    use tokio::runtime::Runtime;

    fn setup_backend() -> LocalBackend {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let db = Database::from_connection(conn, true);
        db.ensure_migrations().expect("migrations");
        LocalBackend::new(db)
    }

    fn payload(slug: &str) -> CreatePostPayload {
        CreatePostPayload {
            slug: slug.into(),
            title: "Harbour notes".into(),
            subtitle: None,
            excerpt: "Notes from the harbour".into(),
            category: "travel".into(),
            tags: vec!["sea".into()],
            author: Author::new("Robin"),
            hero: Some(HeroSettings::new(MediaAsset::new(
                StorageRef::new("assets", "posts/tmp/d1/hero/x.png"),
                "boats",
            ))),
            gallery: vec![],
            content: vec![ContentBlock::paragraph("word ".repeat(250))],
            seo: SeoMeta::default(),
            status: PostStatus::Draft,
            flags: FeatureFlags::default(),
            scheduled_for: None,
            related: vec![],
        }
    }

    fn wire(payload: &CreatePostPayload) -> WireValue {
        encode_payload(payload).expect("encode")
    }

    #[test]
    fn create_assigns_ids_and_reading_time() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let backend = setup_backend();
            let first = backend.create_post(wire(&payload("one"))).await.unwrap();
            let second = backend.create_post(wire(&payload("two"))).await.unwrap();

            let first = decode_post(&first).unwrap().into_value();
            let second = decode_post(&second).unwrap().into_value();
            assert_eq!(first.id, 1);
            assert_eq!(second.id, 2);
            assert_eq!(first.reading_minutes, 2);
            assert_eq!(first.metrics.views, 0);
            assert_eq!(first.created_at, first.updated_at);
        });
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let backend = setup_backend();
            backend.create_post(wire(&payload("same"))).await.unwrap();
            let err = backend
                .create_post(wire(&payload("same")))
                .await
                .expect_err("duplicate slug");
            assert!(matches!(err, BackendError::Rejected { .. }));
        });
    }

    #[test]
    fn invalid_payload_is_rejected() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let backend = setup_backend();
            let mut invalid = payload("bad");
            invalid.title = "  ".into();
            let err = backend.create_post(wire(&invalid)).await.unwrap_err();
            match err {
                BackendError::Rejected { message } => assert!(message.contains("title")),
                other => panic!("unexpected error: {other}"),
            }
        });
    }

    #[test]
    fn replace_updates_fields_and_keeps_identity() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let backend = setup_backend();
            let created = backend.create_post(wire(&payload("story"))).await.unwrap();
            let created = decode_post(&created).unwrap().into_value();

            let mut edited = created.to_payload();
            edited.title = "Harbour notes, revised".into();
            edited.status = PostStatus::Published;
            let replaced = backend
                .replace_post(created.id, wire(&edited))
                .await
                .unwrap()
                .expect("post exists");
            let replaced = decode_post(&replaced).unwrap().into_value();
            assert_eq!(replaced.id, created.id);
            assert_eq!(replaced.created_at, created.created_at);
            assert_eq!(replaced.title, "Harbour notes, revised");
            assert!(replaced.published_at.is_some());

            let fetched = backend
                .get_post_by_id(created.id)
                .await
                .unwrap()
                .expect("stored");
            assert_eq!(decode_post(&fetched).unwrap().into_value(), replaced);
        });
    }

    #[test]
    fn replace_of_unknown_id_is_none() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let backend = setup_backend();
            assert!(backend
                .replace_post(7, wire(&payload("ghost")))
                .await
                .unwrap()
                .is_none());
            assert!(backend.get_post_by_id(7).await.unwrap().is_none());
            assert!(backend.get_post_by_id(u64::MAX).await.unwrap().is_none());
        });
    }

    #[test]
    fn list_returns_summaries() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let backend = setup_backend();
            backend.create_post(wire(&payload("a"))).await.unwrap();
            backend.create_post(wire(&payload("b"))).await.unwrap();

            let listed = backend.list_posts(10).await.unwrap();
            assert_eq!(listed.len(), 2);
            let mut slugs: Vec<String> = listed
                .iter()
                .map(|value| decode_summary(value).unwrap().slug)
                .collect();
            slugs.sort();
            assert_eq!(slugs, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(backend.list_posts(1).await.unwrap().len(), 1);
        });
    }
}
