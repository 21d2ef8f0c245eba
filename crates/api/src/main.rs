use anyhow::Context;

use lostfound_infra::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lostfound_observability::init();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(?config, "starting lost & found api");

    let app = lostfound_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
