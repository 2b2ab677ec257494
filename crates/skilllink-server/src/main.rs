use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use skilllink_api::AppStateInner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "skilllink_server=debug,skilllink_api=debug,skilllink_db=debug,tower_http=debug"
                        .into()
                }),
        )
        .init();

    // Config
    let host = std::env::var("SKILLLINK_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SKILLLINK_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;
    let db_path: PathBuf = std::env::var("SKILLLINK_DB_PATH")
        .unwrap_or_else(|_| "skilllink.db".into())
        .into();

    // Init database (file is created on first run)
    let db = skilllink_db::Database::open(&db_path)?;
    let state = Arc::new(AppStateInner { db });

    let app = skilllink_api::router(state)
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024)) // 16 MB resume uploads
        // Any origin may hit /api/*, matching the frontend's deployment model
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("SkillLink server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
