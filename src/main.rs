use anyhow::Context;
use tokio::net::TcpListener;

use marketchat::infrastructure::observability::{TracingConfig, init_tracing};
use marketchat::infrastructure::persistence::StorageFactory;
use marketchat::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        TracingConfig::from_settings(environment, &settings.logging),
        settings.server.port,
    );

    let storage = StorageFactory::create(&settings)
        .await
        .context("Failed to initialize conversation storage")?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let router = create_router(AppState::new(storage.repository, storage.change_feed, settings));

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
