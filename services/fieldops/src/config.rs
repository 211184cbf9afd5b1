/// Fieldops service configuration loaded from environment variables.
#[derive(Debug)]
pub struct FieldopsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8082). Env var: `FIELDOPS_PORT`.
    pub fieldops_port: u16,
}

impl FieldopsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            fieldops_port: std::env::var("FIELDOPS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8082),
        }
    }
}
