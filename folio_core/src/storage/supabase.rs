use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

/// Client for the Supabase Storage REST API.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest<'a> {
    bucket_id: &'a str,
    source_key: &'a str,
    destination_key: &'a str,
}

impl SupabaseStorage {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, service_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            service_key: service_key.into(),
        }
    }

    fn move_url(&self) -> String {
        format!("{}/storage/v1/object/move", self.base_url)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn move_object(&self, bucket: &str, from: &str, to: &str) -> Result<(), StorageError> {
        if from == to {
            return Ok(());
        }
        let response = self
            .client
            .post(self.move_url())
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&MoveRequest {
                bucket_id: bucket,
                source_key: from,
                destination_key: to,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(bucket, from, to, "moved object in supabase storage");
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                path: from.to_string(),
            });
        }
        Err(StorageError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
