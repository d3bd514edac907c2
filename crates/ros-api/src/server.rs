//! Server startup and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use ros_core::Config;
use tokio::sync::Notify;

pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server.port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        max_upload_mb = config.upload.max_upload_size / 1024 / 1024,
        bucket = %config.storage.bucket,
        topic = %config.kafka.topic,
        validation_topic = %config.kafka.validation_topic,
        auth_enabled = config.auth.enabled,
        "Server ready and accepting connections"
    );

    // In-flight requests get the configured drain window after the shutdown
    // signal; past that the process exits without waiting further.
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let draining = Arc::new(Notify::new());
    let drain_started = draining.clone();

    let server = std::future::IntoFuture::into_future(
        axum::serve(listener, app).with_graceful_shutdown(async move {
            shutdown_signal().await;
            drain_started.notify_one();
        }),
    );
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = async {
            draining.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(
                timeout_secs = config.server.shutdown_timeout_secs,
                "Graceful shutdown timed out, exiting with requests in flight"
            );
        }
    }

    Ok(())
}

/// Listens for Ctrl+C (SIGINT) and SIGTERM to initiate graceful shutdown.
/// In-flight uploads run to completion before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
