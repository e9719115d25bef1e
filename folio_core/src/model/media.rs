use serde::{Deserialize, Serialize};

use super::blank_to_none;

/// Pointer to an object held by an external, path-addressed object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRef {
    pub bucket: String,
    pub path: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl StorageRef {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
            mime: None,
            size: None,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            mime: blank_to_none(self.mime),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    #[serde(rename = "ref")]
    pub storage_ref: StorageRef,
    pub alt: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub credit: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

impl MediaAsset {
    pub fn new(storage_ref: StorageRef, alt: impl Into<String>) -> Self {
        Self {
            storage_ref,
            alt: alt.into(),
            caption: None,
            credit: None,
            aspect_ratio: None,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            storage_ref: self.storage_ref.normalized(),
            alt: self.alt,
            caption: blank_to_none(self.caption),
            credit: blank_to_none(self.credit),
            aspect_ratio: self.aspect_ratio.filter(|ratio| ratio.is_finite()),
        }
    }
}
