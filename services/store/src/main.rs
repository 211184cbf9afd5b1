use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use frostline_core::tracing::init_tracing;
use frostline_store::config::StoreConfig;
use frostline_store::infra::payment::HttpPaymentGateway;
use frostline_store::infra::storage::LocalImageStore;
use frostline_store::router::build_router;
use frostline_store::state::AppState;
use frostline_store::worker::run_cleanup_worker;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = StoreConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        gateway: HttpPaymentGateway::new(
            config.payment_base_url,
            config.payment_key_id,
            config.payment_key_secret,
        ),
        images: LocalImageStore::new(&config.upload_dir),
        purge_delay: chrono::Duration::seconds(config.order_purge_delay_secs),
        upload_max_bytes: config.upload_max_bytes,
    };

    // Spawn the single order-cleanup consumer.
    tokio::spawn(run_cleanup_worker(
        state.clone(),
        Duration::from_secs(config.cleanup_poll_secs),
        chrono::Duration::seconds(config.cleanup_retry_secs),
        config.cleanup_max_attempts,
    ));

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.store_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("store service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
