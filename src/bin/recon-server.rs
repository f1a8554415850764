#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::Parser;
use skud_tabell_recon::tabell::LocalFileTabellSource;
use skud_tabell_recon::web::{create_router, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Serveur HTTP de rapprochement tabell / SKUD
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Adresse d'écoute
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Fichier CSV tabell servi à chaque requête
    #[arg(long)]
    tabell_csv: String,

    /// Répertoire de staging des fichiers XLSX reçus
    #[arg(long, default_value = "uploads")]
    upload_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();

    let source = Arc::new(LocalFileTabellSource::new(&cli.tabell_csv));
    let state = Arc::new(AppState::new(source, PathBuf::from(&cli.upload_dir)));

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, tabell_csv = %cli.tabell_csv, "recon-server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
