//! Adimen - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use adimen_backend::{
    api::{self, AppState},
    cli::{Cli, Command},
    config::Config,
    db,
    lifecycle::{shutdown_signal, Lifecycle},
    services::queue_consumer::{MessageSource, SqsMessageSource},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;
    telemetry::init_tracing(&config.log_level)?;

    match cli.command() {
        Command::Migrate => migrate(&config).await,
        Command::Serve => serve(config).await,
    }
}

async fn migrate(config: &Config) -> anyhow::Result<()> {
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");
    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Adimen");
    if config.jwt_secret_generated {
        tracing::warn!("JWT_SECRET is not set, tokens will not survive a restart");
    }

    let db_pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to database");
    db::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("invalid BIND_ADDRESS {}", config.bind_address))?;

    let source: Option<Arc<dyn MessageSource>> = match &config.sqs_queue_url {
        Some(url) => Some(Arc::new(
            SqsMessageSource::from_default_chain(url.as_str()).await,
        )),
        None => None,
    };

    let state = Arc::new(AppState::new(config, db_pool));
    let mut lifecycle = Lifecycle::new();
    lifecycle.on_init(&state, source).await?;

    let app = api::routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    lifecycle.on_shutdown().await;
    served?;

    Ok(())
}
