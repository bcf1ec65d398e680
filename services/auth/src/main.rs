use sea_orm::Database;
use tracing::info;

use lovelite_auth::config::AuthConfig;
use lovelite_auth::router::build_router;
use lovelite_auth::state::AppState;

#[tokio::main]
async fn main() {
    lovelite_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http = reqwest::Client::new();

    let state = AppState::new(db, http, &config);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
