use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_BUCKET: &str = "assets";
pub const DEFAULT_MAX_CONCURRENT_MOVES: usize = 4;

#[derive(Debug, Clone)]
pub struct FolioConfig {
    pub paths: FolioPaths,
    pub storage: StorageConfig,
    pub promotion: PromotionConfig,
}

impl FolioConfig {
    pub fn from_env() -> Result<Self> {
        let paths = match env_non_empty("FOLIO_HOME") {
            Some(home) => FolioPaths::from_base_dir(home)?,
            None => FolioPaths::discover()?,
        };
        Ok(Self {
            paths,
            storage: StorageConfig::from_env(),
            promotion: PromotionConfig::from_env(),
        })
    }

    pub fn with_paths(paths: FolioPaths) -> Self {
        Self {
            paths,
            storage: StorageConfig::default(),
            promotion: PromotionConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            supabase_url: None,
            supabase_service_key: None,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let bucket = env_non_empty("FOLIO_STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.into());
        Self {
            bucket,
            supabase_url: env_non_empty("FOLIO_SUPABASE_URL"),
            supabase_service_key: env_non_empty("FOLIO_SUPABASE_SERVICE_KEY"),
        }
    }

    /// Remote credentials, when both halves are configured.
    pub fn supabase(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_service_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromotionConfig {
    pub max_concurrent_moves: usize,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_moves: DEFAULT_MAX_CONCURRENT_MOVES,
        }
    }
}

impl PromotionConfig {
    pub fn from_env() -> Self {
        let max_concurrent_moves = env::var("FOLIO_MAX_CONCURRENT_MOVES")
            .ok()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_MOVES);
        Self {
            max_concurrent_moves,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FolioPaths {
    pub base: PathBuf,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub objects_dir: PathBuf,
}

impl FolioPaths {
    pub fn discover() -> Result<Self> {
        let exe_path = std::env::current_exe()
            .map_err(|err| anyhow!("failed to resolve current executable: {err}"))?;
        let base = exe_path
            .parent()
            .ok_or_else(|| anyhow!("executable path missing parent"))?
            .to_path_buf();
        Self::from_base_dir(base)
    }

    pub fn from_base_dir<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let data_dir = base.join("data");
        let db_path = data_dir.join("folio.db");
        let objects_dir = base.join("objects");

        Ok(Self {
            base,
            data_dir,
            db_path,
            objects_dir,
        })
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|raw| {
        if raw.trim().is_empty() {
            None
        } else {
            Some(raw)
        }
    })
}
