//! Recall server and admin CLI entrypoint.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use recall::admin::{CacheAdmin, PruneOutcome};
use recall::config::Config;
use recall::embedding::HttpEmbeddingClient;
use recall::gateway::{AppState, create_router_with_state};
use recall::index::{IndexError, SemanticIndex};
use recall::loader::load_dataset;
use recall::policy::AnswerEngine;
use recall::synthesis::HttpSynthesizer;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "recall", version, about = "Tiered semantic answer cache")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Build the index snapshot from a JSON-lines dataset.
    Load {
        /// Dataset file with one `{"question", "answer", "reference"}` object
        /// per line.
        #[arg(long)]
        dataset: PathBuf,
    },
    /// Print entry counts from the index snapshot.
    Stats,
    /// Remove generated entries from the index snapshot.
    Prune {
        /// Allow a prune that leaves the index empty.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.validate()?;

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Load { dataset } => load(config, dataset).await,
        Command::Stats => stats(config).await,
        Command::Prune { force } => prune(config, force).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        index_path = %config.index_path.display(),
        "Recall starting"
    );

    let index = match SemanticIndex::open(&config.index_path) {
        Ok(index) => Arc::new(index),
        Err(IndexError::SnapshotNotFound { path }) => {
            anyhow::bail!(
                "no index snapshot at {}; run `recall load --dataset <file>` first",
                path.display()
            );
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(entries = index.count().await, "Index snapshot loaded");

    let api_key = config.require_api_key()?.to_string();
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let embedder = Arc::new(HttpEmbeddingClient::new(
        config.api_base_url.clone(),
        api_key.clone(),
        config.embedding_model.clone(),
        timeout,
    )?);
    let synthesizer = Arc::new(HttpSynthesizer::new(
        config.api_base_url.clone(),
        api_key,
        config.generation_model.clone(),
        config.temperature,
        config.max_completion_tokens,
        timeout,
    )?);

    let engine = Arc::new(AnswerEngine::new(
        Arc::clone(&index),
        embedder,
        synthesizer,
        config.thresholds()?,
        config.top_k,
        config.max_input_chars,
    ));
    let admin = Arc::new(CacheAdmin::new(index));

    let app = create_router_with_state(AppState::new(engine, admin));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Recall shutdown complete");
    Ok(())
}

async fn load(config: Config, dataset: PathBuf) -> anyhow::Result<()> {
    let api_key = config.require_api_key()?.to_string();
    let embedder = Arc::new(HttpEmbeddingClient::new(
        config.api_base_url.clone(),
        api_key,
        config.embedding_model.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?);

    let (index, report) = load_dataset(
        &dataset,
        &config.index_path,
        embedder,
        config.max_input_chars,
    )
    .await?;

    println!(
        "indexed {} entries ({} dropped) into {}",
        report.indexed,
        report.dropped,
        config.index_path.display()
    );
    println!("total entries: {}", index.count().await);
    Ok(())
}

async fn stats(config: Config) -> anyhow::Result<()> {
    let index = Arc::new(SemanticIndex::open(&config.index_path)?);
    let stats = CacheAdmin::new(index).stats().await;

    println!("total:     {}", stats.total);
    println!("curated:   {}", stats.curated);
    println!("generated: {}", stats.generated);
    Ok(())
}

async fn prune(config: Config, force: bool) -> anyhow::Result<()> {
    let index = Arc::new(SemanticIndex::open(&config.index_path)?);
    let admin = CacheAdmin::new(index);

    match admin.prune_generated(force).await? {
        PruneOutcome::Removed(removed) => {
            println!("removed {removed} generated entries");
        }
        PruneOutcome::Refused { total } => {
            println!(
                "refused: pruning would remove all {total} entries; pass --force to confirm"
            );
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
