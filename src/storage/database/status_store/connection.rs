use crate::config::StoreConfig;
use crate::utils::error::{OrchestratorError, Result};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::entities;
use super::super::migration::Migrator;
use super::types::StatusStore;

impl StatusStore {
    /// Open the store and bring its schema up to date
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let db = Self::connect(config).await?;
        let store = Self { db };
        store.migrate().await?;
        Ok(store)
    }

    /// Connect without running migrations
    pub async fn connect(config: &StoreConfig) -> Result<DatabaseConnection> {
        Self::ensure_sqlite_parent_dir(&config.url)?;

        // Every connection to an in-memory SQLite database sees its own database
        let max_connections = if config.is_in_memory() {
            1
        } else {
            config.max_connections
        };

        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = Database::connect(opt).await.map_err(|e| {
            warn!("Failed to open status store: {}", e);
            OrchestratorError::Storage(e)
        })?;

        info!("Status store connection established");
        Ok(db)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        debug!("Running status store migrations");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            OrchestratorError::Storage(e)
        })?;
        Ok(())
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(OrchestratorError::Storage)?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        entities::Identifier::find()
            .limit(1)
            .all(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;
        Ok(())
    }

    fn ensure_sqlite_parent_dir(url: &str) -> Result<()> {
        let Some(rest) = url.strip_prefix("sqlite://") else {
            return Ok(());
        };
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path.starts_with(":memory:") {
            return Ok(());
        }
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    OrchestratorError::Config(format!(
                        "Failed to create data directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }
}
