use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use users_backend::{
    config::Config, database::connection::ConnectionManager, routes, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Refusing to start");
            return Ok(ExitCode::FAILURE);
        }
    };

    let connection = ConnectionManager::new();
    {
        let connection = connection.clone();
        let database = config.database.clone();
        tokio::spawn(async move {
            connection.connect(&database).await;
        });
    }

    let addr = config.resolve_addr().await?;
    let environment = config.environment.clone();
    let app = routes::router(AppState::new(config, connection.clone()));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, %environment, "Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let signal = shutdown_signal().await;
        info!(signal, "Shutdown signal received, closing connections");
    })
    .await?;

    match connection.shutdown().await {
        Ok(()) => {
            info!("MongoDB connection closed");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(error = %err, "Failed to close MongoDB connection");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("users_backend=info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
