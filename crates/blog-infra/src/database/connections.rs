use std::time::Duration;

#[cfg(feature = "database")]
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    /// Create missing tables on startup.
    pub bootstrap_schema: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 100,
            min_connections: 10,
            connect_timeout: Duration::from_secs(10),
            bootstrap_schema: true,
        }
    }

    /// An in-memory SQLite database lives inside a single connection, so the
    /// pool must never open a second one.
    pub fn is_sqlite_memory(&self) -> bool {
        self.url.starts_with("sqlite::memory:") || self.url.contains("mode=memory")
    }
}

/// Idle and lifetime bound for the single in-memory SQLite connection. The
/// database dies with its connection, so the pool must never recycle it.
#[cfg(feature = "database")]
const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Pool options for `config`.
#[cfg(feature = "database")]
pub fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(&config.url);
    opts.connect_timeout(config.connect_timeout).sqlx_logging(false);

    if config.is_sqlite_memory() {
        // Left unset, sqlx falls back to a 10 minute idle timeout and a
        // 30 minute lifetime.
        opts.max_connections(1)
            .min_connections(1)
            .idle_timeout(MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(MEMORY_CONNECTION_LIFETIME);
    } else {
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Duration::from_secs(300));
    }

    opts
}

/// Open the connection pool described by `config`.
#[cfg(feature = "database")]
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection...");

    let opts = connect_options(config);
    let pool = opts.get_max_connections();

    let conn = Database::connect(opts).await?;
    tracing::info!(
        backend = ?conn.get_database_backend(),
        pool = ?pool,
        "Database connected"
    );

    if config.bootstrap_schema {
        super::schema::bootstrap(&conn).await?;
    }

    Ok(conn)
}
