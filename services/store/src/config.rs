/// Store service configuration loaded from environment variables.
#[derive(Debug)]
pub struct StoreConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8081). Env var: `STORE_PORT`.
    pub store_port: u16,
    /// Base URL of the checkout gateway's REST API (e.g. "https://api.checkout.example").
    pub payment_base_url: String,
    /// Gateway API key id.
    pub payment_key_id: String,
    /// Gateway API key secret.
    pub payment_key_secret: String,
    /// Directory for uploaded product images (default "uploads").
    pub upload_dir: String,
    /// Maximum accepted image size in bytes (default 5 MiB).
    pub upload_max_bytes: usize,
    /// Delay before a successful order is purged (default 600 s).
    pub order_purge_delay_secs: i64,
    /// Delayed-task consumer poll interval (default 30 s).
    pub cleanup_poll_secs: u64,
    /// Delay before a failed task is retried (default 60 s).
    pub cleanup_retry_secs: i64,
    /// Attempts before a task is marked failed for good (default 5).
    pub cleanup_max_attempts: i32,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            store_port: std::env::var("STORE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8081),
            payment_base_url: std::env::var("PAYMENT_BASE_URL").expect("PAYMENT_BASE_URL"),
            payment_key_id: std::env::var("PAYMENT_KEY_ID").expect("PAYMENT_KEY_ID"),
            payment_key_secret: std::env::var("PAYMENT_KEY_SECRET").expect("PAYMENT_KEY_SECRET"),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_owned()),
            upload_max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
            order_purge_delay_secs: std::env::var("ORDER_PURGE_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            cleanup_poll_secs: std::env::var("CLEANUP_POLL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            cleanup_retry_secs: std::env::var("CLEANUP_RETRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            cleanup_max_attempts: std::env::var("CLEANUP_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
