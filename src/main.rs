use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;
use schoolhub::logging::init_tracing;
use schoolhub::metrics::{init_metrics, metrics_app};
use schoolhub::router::init_router;
use schoolhub::state::init_app_state;
use schoolhub_config::ServerConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server = ServerConfig::from_env().context("Invalid server configuration")?;
    let _log_guard =
        init_tracing(server.log_dir.as_deref()).context("Failed to open the log directory")?;

    if let Some(handle) =
        init_metrics(server.observability_enabled).context("Failed to install metrics recorder")?
    {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], server.metrics_port));
        let listener = tokio::net::TcpListener::bind(metrics_addr)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {}", metrics_addr))?;
        info!(%metrics_addr, "Metrics available at /metrics");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state(&server).await?;

    let limiters = state.limiters.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiters.retain_recent();
        }
    });

    let app = init_router(state);

    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(%address, "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
