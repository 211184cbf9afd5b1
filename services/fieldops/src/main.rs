use sea_orm::Database;
use tracing::info;

use frostline_core::tracing::init_tracing;
use frostline_fieldops::config::FieldopsConfig;
use frostline_fieldops::router::build_router;
use frostline_fieldops::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = FieldopsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.fieldops_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("fieldops service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
