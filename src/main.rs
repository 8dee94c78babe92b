//! vidtutor server binary

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidtutor::api::{self, AppState};
use vidtutor::config::Config;
use vidtutor::llm::create_provider;
use vidtutor::video::YouTubeClient;
use vidtutor::{Tutor, TutorSettings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Write the default config file and exit
    #[arg(long, default_value_t = false)]
    init_config: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if args.init_config {
        let path = args.config.clone().unwrap_or_else(Config::default_path);
        Config::default().save(&path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    // API keys usually come from a .env next to the binary
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let mut config = Config::load(args.config.as_deref()).context("loading config")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    let llm = create_provider(config.llm.clone(), config.llm_api_key()?)?;
    let search = YouTubeClient::new(&config.search, config.search_api_key()?);
    let tutor = Tutor::new(
        llm,
        Box::new(search),
        TutorSettings::from_config(&config),
    );

    let state = Arc::new(AppState::new(tutor));
    let app = api::router(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, model = %config.llm.model, subject = ?config.tutor.subject, "vidtutor listening");

    axum::serve(listener, app).await?;

    Ok(())
}
