use crate::backend::LocalBackend;
use crate::config::FolioConfig;
use crate::database::Database;
use crate::model::{CreatePostPayload, MediaAsset, Post, PostId, StorageRef};
use crate::paths::{temporary_path, DraftId};
use crate::publishing::{PublishStatus, Published, Publisher};
use crate::reading_time::estimate_reading_minutes;
use crate::storage::{FsObjectStore, ObjectStore, SupabaseStorage};
use crate::validation::validate_payload;
use crate::wire::{self, BlockFallback, WireValue};
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Reads a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_payload(path: &Path) -> Result<CreatePostPayload> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid post payload", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_fallbacks(fallbacks: &[BlockFallback]) {
    for fallback in fallbacks {
        eprintln!("warning: {fallback} (replaced with an empty paragraph)");
    }
}

/// Document model JSON to wire JSON.
pub fn encode(input: &Path, full_post: bool) -> Result<()> {
    let raw = read_input(input)?;
    let wire = if full_post {
        let post: Post = serde_json::from_str(&raw).context("input is not a valid post")?;
        wire::encode_post(&post.normalized())?
    } else {
        let payload: CreatePostPayload =
            serde_json::from_str(&raw).context("input is not a valid post payload")?;
        wire::encode_payload(&payload.normalized())?
    };
    print_json(&wire)
}

/// Wire JSON to document model JSON.
pub fn decode(input: &Path, full_post: bool) -> Result<()> {
    let raw = read_input(input)?;
    let value: WireValue = serde_json::from_str(&raw).context("input is not JSON")?;
    if full_post {
        let decoded = wire::decode_post(&value)?;
        report_fallbacks(&decoded.fallbacks);
        print_json(&decoded.value)
    } else {
        let decoded = wire::decode_payload(&value)?;
        report_fallbacks(&decoded.fallbacks);
        print_json(&decoded.value)
    }
}

pub fn validate(input: &Path) -> Result<()> {
    let payload = read_payload(input)?.normalized();
    match validate_payload(&payload) {
        Ok(()) => {
            println!("ok");
            Ok(())
        }
        Err(errors) => {
            for error in &errors.errors {
                println!("{}: {}", error.field, error.message);
            }
            bail!("{} field(s) failed validation", errors.errors.len())
        }
    }
}

pub fn reading_time(input: &Path) -> Result<()> {
    let payload = read_payload(input)?;
    println!("{}", estimate_reading_minutes(&payload.content));
    Ok(())
}

/// Copies a local file into the draft namespace of the filesystem store and
/// prints a media asset pointing at it.
pub async fn stage(
    config: &FolioConfig,
    file: &Path,
    folder: &str,
    draft: Option<&str>,
) -> Result<()> {
    let draft = match draft {
        Some(raw) => DraftId::parse(raw).ok_or_else(|| anyhow!("invalid draft id `{raw}`"))?,
        None => DraftId::generate(),
    };
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", file.display()))?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let path = temporary_path(&draft, folder, filename);
    let store = FsObjectStore::new(&config.paths.objects_dir);
    store
        .put_object(&config.storage.bucket, &path, &bytes)
        .await
        .with_context(|| format!("failed to stage {path}"))?;
    tracing::info!(
        draft = %draft,
        path = %path,
        root = %store.root().display(),
        "staged asset"
    );

    let mut storage_ref = StorageRef::new(config.storage.bucket.clone(), path);
    storage_ref.size = Some(bytes.len() as u64);
    print_json(&MediaAsset::new(storage_ref, ""))
}

pub struct PublishSession {
    publisher: Publisher,
}

impl PublishSession {
    pub fn open(config: &FolioConfig) -> Result<Self> {
        let database = Database::connect(&config.paths)?;
        if database.ensure_migrations()? {
            tracing::info!(path = %config.paths.db_path.display(), "created post database");
        }
        let store: Arc<dyn ObjectStore> = match config.storage.supabase() {
            Some((url, key)) => {
                tracing::info!(url, "using supabase storage");
                Arc::new(SupabaseStorage::new(url, key))
            }
            None => {
                let store = FsObjectStore::new(&config.paths.objects_dir);
                tracing::debug!(root = %store.root().display(), "using local object storage");
                Arc::new(store)
            }
        };
        let publisher = Publisher::new(
            Arc::new(LocalBackend::new(database)),
            store,
            &config.promotion,
        );
        Ok(Self { publisher })
    }

    pub async fn publish(&self, input: &Path) -> Result<()> {
        let payload = read_payload(input)?;
        let published = self.publisher.create_post(payload).await?;
        print_published(&published)
    }

    pub async fn update(&self, post_id: PostId, input: &Path) -> Result<()> {
        let payload = read_payload(input)?;
        let published = self.publisher.update_post(post_id, payload).await?;
        print_published(&published)
    }

    pub async fn show(&self, post_id: PostId) -> Result<()> {
        let decoded = self
            .publisher
            .get_post(post_id)
            .await?
            .ok_or_else(|| anyhow!("post {post_id} does not exist"))?;
        report_fallbacks(&decoded.fallbacks);
        print_json(&decoded.value)
    }

    pub async fn list(&self, limit: usize) -> Result<()> {
        let summaries = self.publisher.list_posts(limit).await?;
        if summaries.is_empty() {
            println!("No posts yet.");
            return Ok(());
        }
        for summary in summaries {
            println!(
                "{:>6}  {:<10} {:>3} min  {}  ({})",
                summary.id,
                summary.status.as_str(),
                summary.reading_minutes,
                summary.title,
                summary.slug
            );
        }
        Ok(())
    }
}

fn print_published(published: &Published) -> Result<()> {
    report_fallbacks(&published.fallbacks);
    print_json(&published.post)?;
    if let PublishStatus::PartiallyPromoted { still_temporary } = &published.status {
        eprintln!(
            "warning: {} asset(s) are still in the draft folder",
            still_temporary.len()
        );
        for failed in still_temporary {
            eprintln!("  {}/{}: {}", failed.bucket, failed.path, failed.error);
        }
    }
    Ok(())
}
