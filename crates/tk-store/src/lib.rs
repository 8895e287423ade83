//! SQLite persistence for Tablekeeper.
//!
//! [`Store`] wraps a sqlx connection pool over a single database file.
//! Campaign notes, character sheets, and reference data each get their own
//! module of operations; [`archive`] bundles the whole database into a zip
//! and restores it, and [`bestiary`] imports creature stat blocks from
//! Markdown files.
//!
//! Every user-visible write is a single statement, so each one commits on
//! its own.

pub mod archive;
pub mod bestiary;
pub mod campaigns;
pub mod characters;
pub mod error;
pub mod reference;
mod rows;
mod schema;

pub use archive::{ExportedArchive, Manifest, RestoreReport, TableReport, export_file_name};
pub use bestiary::{IngestReport, parse_creature_document};
pub use error::{StoreError, StoreResult};
pub use reference::{CreatureFilter, ItemFilter, SpellFilter};

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

/// Database handle wrapping a SQLite connection pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database file at `path` and bring
    /// its schema up to date.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "opened database");
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// A private in-memory database, used by tests.
    ///
    /// Every connection to `:memory:` is a separate database, so the pool
    /// holds exactly one connection and never recycles it.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create any missing tables.
    async fn run_migrations(&self) -> StoreResult<()> {
        debug!("running database migrations");
        for statement in schema::MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check the database answers queries.
    pub async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Delete one row by id from a table named by this crate.
    pub(crate) async fn delete_row(&self, table: &'static str, id: i64) -> StoreResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { table, id });
        }
        Ok(())
    }

    /// Fail with [`StoreError::NotFound`] unless the row exists.
    pub(crate) async fn ensure_exists(&self, table: &'static str, id: i64) -> StoreResult<()> {
        let found = sqlx::query(&format!("SELECT 1 FROM {table} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match found {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { table, id }),
        }
    }
}
