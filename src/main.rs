use anyhow::Context;
use clap::{Parser, Subcommand};
use order_stats::api::AppState;
use order_stats::{api, loader, store::Store};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "order-stats")]
struct Args {
    #[arg(long, default_value = "order_stats.duckdb")]
    db_path: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the analytics API.
    Serve {
        #[arg(long, default_value = ":5000")]
        listen: String,
    },
    /// Create tables and bulk-load CSV files into the database.
    Load {
        #[arg(long, default_value = "data/files")]
        data_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_stats=info".into()),
        )
        .init();

    let args = Args::parse();
    let store = Arc::new(Store::open(&args.db_path)?);

    match args.command {
        Command::Load { data_dir } => loader::load_dir(&store, &data_dir).await,
        Command::Serve { listen } => serve(store, &listen).await,
    }
}

async fn serve(store: Arc<Store>, listen: &str) -> Result<(), anyhow::Error> {
    let addr = normalize_listen_addr(listen)?;
    let app = api::router(AppState { store });
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("order-stats listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn normalize_listen_addr(listen: &str) -> Result<SocketAddr, anyhow::Error> {
    if listen.starts_with(':') {
        let normalized = format!("0.0.0.0{}", listen);
        return normalized
            .parse()
            .with_context(|| format!("invalid listen address {}", listen));
    }
    listen
        .parse()
        .with_context(|| format!("invalid listen address {}", listen))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
