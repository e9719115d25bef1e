use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_core::cli::{self, PublishSession};
use folio_core::config::FolioConfig;
use folio_core::telemetry;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Folio post tooling: wire codec, asset staging and publishing")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert document JSON into its wire encoding
    Encode {
        /// Input file, or `-` for stdin
        input: PathBuf,
        /// Treat the input as a full post rather than a create payload
        #[arg(long)]
        post: bool,
    },
    /// Convert wire JSON back into document JSON
    Decode {
        input: PathBuf,
        #[arg(long)]
        post: bool,
    },
    /// Check a create payload and list every invalid field
    Validate { input: PathBuf },
    /// Estimate reading minutes for a create payload
    ReadingTime { input: PathBuf },
    /// Copy a local file into a draft folder of the object store
    Stage {
        file: PathBuf,
        /// Folder inside the draft, e.g. `hero` or `gallery`
        #[arg(long, default_value = "media")]
        folder: String,
        /// Reuse an existing draft id instead of generating one
        #[arg(long)]
        draft: Option<String>,
    },
    /// Create a post and promote its draft assets
    Publish { input: PathBuf },
    /// Replace an existing post, promoting newly added draft assets
    Update { id: u64, input: PathBuf },
    /// Print a stored post
    Show { id: u64 },
    /// List recently updated posts
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Encode { input, post } => cli::encode(&input, post),
        Command::Decode { input, post } => cli::decode(&input, post),
        Command::Validate { input } => cli::validate(&input),
        Command::ReadingTime { input } => cli::reading_time(&input),
        Command::Stage {
            file,
            folder,
            draft,
        } => {
            let config = FolioConfig::from_env()?;
            cli::stage(&config, &file, &folder, draft.as_deref()).await
        }
        Command::Publish { input } => session()?.publish(&input).await,
        Command::Update { id, input } => session()?.update(id, &input).await,
        Command::Show { id } => session()?.show(id).await,
        Command::List { limit } => session()?.list(limit).await,
    }
}

fn session() -> Result<PublishSession> {
    let config = FolioConfig::from_env()?;
    tracing::debug!(home = %config.paths.base.display(), "opening post store");
    PublishSession::open(&config)
}
