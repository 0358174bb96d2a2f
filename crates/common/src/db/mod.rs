//! Database layer for the Newsroom API
//!
//! Provides:
//! - SeaORM entity models
//! - Repository pattern for data access
//! - Article listing query construction
//! - Existence checks for referenced rows
//! - Connection pool management
//! - Schema seeding

pub mod existence;
pub mod models;
pub mod query;
mod repository;
pub mod seed;

pub use existence::Reference;
pub use query::{ArticleListQuery, SortColumn, SortOrder};
pub use repository::Repository;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Database connection pool wrapper
///
/// Created once at startup and handed to whatever needs it; closed
/// explicitly on shutdown. Clones share the same connections.
#[derive(Clone)]
pub struct DbPool {
    /// Primary connection (for writes)
    pub primary: Arc<DatabaseConnection>,

    /// Read replica connection (optional)
    pub replica: Option<Arc<DatabaseConnection>>,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to primary database...");

        let primary = connect(&config.url, config)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect to primary: {}", e),
            })?;

        // Connect to replica if configured
        let replica = match config.read_url {
            Some(ref read_url) => {
                info!("Connecting to read replica...");

                let replica_conn = connect(read_url, config)
                    .await
                    .map_err(|e| AppError::DatabaseConnection {
                        message: format!("Failed to connect to replica: {}", e),
                    })?;

                Some(replica_conn)
            }
            None => None,
        };

        info!("Database connections established");

        Ok(Self {
            primary: Arc::new(primary),
            replica: replica.map(Arc::new),
        })
    }

    /// Wrap an existing connection (used for seeding tools and tests)
    pub fn from_connection(primary: DatabaseConnection) -> Self {
        Self {
            primary: Arc::new(primary),
            replica: None,
        }
    }

    /// Get the connection for reads (replica if available, otherwise primary)
    pub fn read(&self) -> &DatabaseConnection {
        self.replica.as_deref().unwrap_or(&self.primary)
    }

    /// Get the connection for writes (always primary)
    pub fn write(&self) -> &DatabaseConnection {
        &self.primary
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.primary
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Primary ping failed: {}", e),
            })?;

        if let Some(ref replica) = self.replica {
            replica
                .execute_unprepared("SELECT 1")
                .await
                .map_err(|e| AppError::DatabaseConnection {
                    message: format!("Replica ping failed: {}", e),
                })?;
        }

        Ok(())
    }

    /// Close every connection in the pool.
    ///
    /// A connection still shared with another clone is left to close when
    /// its last handle drops.
    pub async fn close(self) -> Result<()> {
        if let Some(replica) = self.replica {
            close_shared(replica, "replica").await?;
        }
        close_shared(self.primary, "primary").await?;

        info!("Database connections closed");
        Ok(())
    }
}

async fn close_shared(conn: Arc<DatabaseConnection>, role: &str) -> Result<()> {
    match Arc::try_unwrap(conn) {
        Ok(conn) => conn.close().await?,
        Err(_) => debug!(role, "Connection still shared, closing on drop"),
    }
    Ok(())
}

async fn connect(url: &str, config: &DatabaseConfig) -> std::result::Result<DatabaseConnection, sea_orm::DbErr> {
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .sqlx_logging(config.log_statements);

    Database::connect(opts).await
}
