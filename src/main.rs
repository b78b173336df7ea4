use anyhow::Context;
use healer_hub::config::AppConfig;
use healer_hub::server::{build_app, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    eprintln!("🌿 Healer Hub v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!("   Wizard: {} ({})", config.wizard, config.role);
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!("   REST: http://0.0.0.0:{}/api/search", config.listen_port);

    let app = build_app(&config).await.context("Failed to start")?;

    // ── HTTP server ────────────────────────────────────────────────────
    let address = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(port = config.listen_port, "REST server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    eprintln!("Shutting down...");
    Ok(())
}
