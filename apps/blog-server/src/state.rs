//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{PostRepository, UserRepository};
use blog_infra::database::DatabaseConfig;
use blog_infra::memory::InMemoryStore;

#[cfg(feature = "database")]
use blog_infra::database::{SeaOrmPostRepository, SeaOrmUserRepository, connect};

/// Which backing store the repositories talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Database,
    Memory,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Database => "database",
            StorageKind::Memory => "memory",
        }
    }
}

/// Shared application state. Repositories are the only shared mutable data.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub storage: StorageKind,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "database")]
        {
            if let Some(config) = db_config {
                match connect(config).await {
                    Ok(conn) => {
                        tracing::info!("Application state initialized (database)");
                        return Self {
                            posts: Arc::new(SeaOrmPostRepository::new(conn.clone())),
                            users: Arc::new(SeaOrmUserRepository::new(conn)),
                            storage: StorageKind::Database,
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "database"))]
        {
            let _ = db_config;
            tracing::info!("Running without database feature - using in-memory repositories");
        }

        Self::in_memory(&InMemoryStore::new())
    }

    /// State over an existing in-memory store.
    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            posts: Arc::new(store.posts()),
            users: Arc::new(store.users()),
            storage: StorageKind::Memory,
        }
    }
}
