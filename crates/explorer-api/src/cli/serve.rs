//! `explorer serve`: run the REST API until Ctrl+C or SIGTERM.

use anyhow::Result;
use console::style;

use crate::http::router::build_router;
use crate::state::AppState;

pub async fn serve(
    state: AppState,
    host: Option<String>,
    port: Option<u16>,
    quiet: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| state.config.server.host.clone());
    let port = port.unwrap_or(state.config.server.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !quiet {
        println!(
            "  {} Axum Explorer API listening on {}",
            style("⚡").bold(),
            style(format!("http://{addr}")).cyan()
        );
        println!(
            "  {} Health check: {}",
            style("•").dim(),
            style(format!("http://{addr}/api/health")).dim()
        );
        println!(
            "  {} Data directory: {}",
            style("•").dim(),
            style(state.data_dir.display()).dim()
        );
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }
    tracing::info!(%addr, "server started");

    let pool = state.db_pool.clone();
    let router = build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("server stopped");
    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
