mod config;
mod decode;
mod detector;
mod event;
mod relay;
mod routes;
mod state;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let detector = detector::from_config(&config.detector).expect("detector init failed");
    let state = state::AppState::new(detector, &config);

    let app = routes::app(state, &config.cors);
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("failed to bind");

    tracing::info!(addr = %config.bind_addr(), "handrelay listening");
    axum::serve(listener, app).await.expect("server failed");
}
