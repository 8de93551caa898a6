use observe_engine::Error;
use observe_engine::Result;
use observe_engine::ServerBuilder;
use observe_engine::Settings;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let settings = Settings::new()?.validate()?;

    // Initializing Logs
    init_observability();

    // Initializing Shutdown Signal
    let shutdown = CancellationToken::new();

    let endpoint = settings.server.endpoint();
    let multicast = settings.server.multicast;
    let server = ServerBuilder::new(settings, shutdown.clone())
        .with_default_resources()
        .build()?;

    info!(%endpoint, multicast, "resource server started");
    info!("resource tree:\n{}", server.tree().dump());

    if let Err(e) = graceful_shutdown(shutdown).await {
        error!("Failed to listen for shutdown signal: {:?}", e);
    }

    server.shutdown().await;
    info!("Exiting program.");
    Ok(())
}

async fn graceful_shutdown(shutdown: CancellationToken) -> Result<()> {
    let mut sigint =
        signal(SignalKind::interrupt()).map_err(|e| Error::Fatal(format!("SIGINT handler: {e}")))?;
    let mut sigterm =
        signal(SignalKind::terminate()).map_err(|e| Error::Fatal(format!("SIGTERM handler: {e}")))?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    info!("Shutdown server..");
    shutdown.cancel();
    Ok(())
}

fn init_observability() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
