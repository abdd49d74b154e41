use std::env;

use gatekit_server::{AppState, load_config, observability, routes};

#[tokio::main]
async fn main() {
    // Load .env file if present, before anything reads the environment.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let config_path = env::var("GATEKIT_CONFIG").ok();
    let config = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    observability::apply_logging_level(&config.logging.level);

    tracing::info!(
        issuer = %config.auth.issuer,
        providers = config.providers.len(),
        "Configuration loaded"
    );

    let addr = config.server.bind_addr();
    let state = AppState::from_config(&config);
    let app = routes::router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(%addr, "Gatekit authorization server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
