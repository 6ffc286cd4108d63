//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use agency_backend::{app, config::{AppState, Config}};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; sem ele, `info`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    // Sem DATABASE_URL (ou com o banco fora do ar) o estado sobe em memória
    let app_state = AppState::new(&config).await?;
    tracing::info!(store = ?app_state.backend, "Armazenamento selecionado");

    let router = app::router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, router).await?;

    Ok(())
}
