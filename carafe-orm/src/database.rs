//! # Database Module
//!
//! Pool ownership and the unit-of-work wrapper. `Database` is constructed
//! once and passed wherever statements run; there is no process-wide
//! instance. `transaction` guarantees the begin/commit/rollback lifecycle
//! around a callback, including rollback when the callback panics.

use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::error;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::error::Error;
use crate::executor::Transaction;
use crate::model::Model;

/// The main entry point: owns the sqlx connection pool.
///
/// Cheap to clone and share across an application.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Creates a new builder for configuring the connection.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Connects using the provided connection string.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        DatabaseBuilder::new().connect(url).await
    }

    /// Starts a transaction owned by the caller. Prefer [`transaction`] for
    /// the managed lifecycle.
    ///
    /// [`transaction`]: Database::transaction
    pub async fn begin(&self) -> Result<Transaction<'static>, Error> {
        let tx = self.pool.begin().await?;
        Ok(Transaction { inner: tx })
    }

    /// Runs `work` inside a transaction.
    ///
    /// Commits when the callback returns `Ok` (a commit failure is returned
    /// like any other error), rolls back and returns the error untouched on
    /// `Err`, and on a panic rolls back and then re-raises the panic — the
    /// transaction is never left open, and the panic is never swallowed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let id = db
    ///     .transaction(|tx| Box::pin(async move {
    ///         let id = tx.insert(&user).await?;
    ///         tx.update_by_key(&profile).await?;
    ///         Ok(id)
    ///     }))
    ///     .await?;
    /// ```
    pub async fn transaction<T, F>(&self, work: F) -> Result<T, Error>
    where
        for<'t> F: FnOnce(&'t mut Transaction<'static>) -> BoxFuture<'t, Result<T, Error>>,
    {
        let mut tx = self.begin().await?;
        match AssertUnwindSafe(work(&mut tx)).catch_unwind().await {
            Ok(Ok(value)) => {
                tx.commit().await?;
                Ok(value)
            }
            Ok(Err(err)) => {
                if let Err(rb) = tx.rollback().await {
                    error!("transaction rollback failed: {rb}");
                }
                Err(err)
            }
            Err(panic) => {
                error!("transaction panicked, rolling back");
                if let Err(rb) = tx.rollback().await {
                    error!("transaction rollback failed: {rb}");
                }
                std::panic::resume_unwind(panic);
            }
        }
    }

    /// Inserts one record in its own transaction and returns the
    /// database-assigned key.
    pub async fn insert_one<M: Model + Sync>(&self, model: &M) -> Result<i64, Error> {
        self.transaction(|tx| Box::pin(async move { tx.insert(model).await }))
            .await
    }

    /// Updates one record by its primary key in its own transaction and
    /// returns the rows affected.
    pub async fn update_one<M: Model + Sync>(&self, model: &M) -> Result<u64, Error> {
        self.transaction(|tx| Box::pin(async move { tx.update_by_key(model).await }))
            .await
    }
}

pub struct DatabaseBuilder {
    max_connections: u32,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self { max_connections: 5 }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub async fn connect(self, url: &str) -> Result<Database, Error> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(url)
            .await?;
        Ok(Database { pool })
    }
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
