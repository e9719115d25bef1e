pub mod backend;
pub mod cli;
pub mod config;
pub mod database;
pub mod model;
pub mod paths;
pub mod promotion;
pub mod publishing;
pub mod reading_time;
pub mod storage;
pub mod telemetry;
pub mod utils;
pub mod validation;
pub mod wire;

pub use backend::{BackendError, LocalBackend, PostBackend};
pub use config::FolioConfig;
pub use promotion::{promote_assets, AssetPromoter, PromotionError, PromotionOutcome};
pub use publishing::{PublishError, PublishStatus, Published, Publisher};
