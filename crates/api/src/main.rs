use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    warden_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let app = warden_api::app::build_app(jwt_secret).await;

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .context("failed to bind 0.0.0.0:8080")?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
