//! # Executor Module
//!
//! Statement execution against a live transaction. Every operation builds
//! its SQL through the fragment builders, logs the statement at debug,
//! executes it and enforces the zero-effect policies: an insert must report
//! a key, a keyed update must touch a row.

use log::{debug, error};
use sqlx::any::{AnyArguments, AnyQueryResult, AnyRow};
use sqlx::{Any, Row};

use crate::condition::Condition;
use crate::error::Error;
use crate::fragment::{qualify, table_ref};
use crate::model::Model;
use crate::value::SqlValue;

/// A unit of work against the database.
///
/// Exclusively owned by one task for its whole lifetime; it terminates
/// committed or rolled back. Obtained from [`Database::begin`] or inside
/// [`Database::transaction`].
///
/// [`Database::begin`]: crate::Database::begin
/// [`Database::transaction`]: crate::Database::transaction
pub struct Transaction<'c> {
    pub(crate) inner: sqlx::Transaction<'c, Any>,
}

impl Transaction<'_> {
    /// Persists all changes made during the transaction.
    pub async fn commit(self) -> Result<(), Error> {
        self.inner.commit().await?;
        Ok(())
    }

    /// Reverts all changes made during the transaction.
    pub async fn rollback(self) -> Result<(), Error> {
        self.inner.rollback().await?;
        Ok(())
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<AnyQueryResult, sqlx::Error> {
        let mut args = AnyArguments::default();
        for p in params {
            p.bind(&mut args)?;
        }
        sqlx::query_with(sql, args).execute(&mut *self.inner).await
    }

    /// Inserts one record and returns the database-assigned key.
    ///
    /// An insert that reports key 0 is treated as failed even without a
    /// driver error.
    pub async fn insert<M: Model>(&mut self, model: &M) -> Result<i64, Error> {
        let frag = model.insert_fragment();
        let sql = format!(
            "INSERT INTO {}({}) VALUES({})",
            M::table_name(),
            frag.columns,
            frag.values
        );
        debug!("{sql}");

        let result = match self.execute(&sql, &frag.params).await {
            Ok(r) => r,
            Err(e) => {
                error!("{} insert: {e}", M::table_name());
                return Err(e.into());
            }
        };
        let id = result.last_insert_id().unwrap_or(0);
        if id == 0 {
            error!("{} insert: no key reported", M::table_name());
            return Err(Error::ZeroEffect {
                table: M::table_name(),
                op: "insert",
            });
        }
        Ok(id)
    }

    /// Updates one record by its primary key and returns the rows affected.
    ///
    /// Zero affected rows means "no such record" and is an error.
    pub async fn update_by_key<M: Model>(&mut self, model: &M) -> Result<u64, Error> {
        let alias = M::default_alias();
        let frag = model.update_fragment(alias);
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ? ",
            table_ref(M::table_name(), alias),
            frag.sql,
            qualify(alias, M::primary_key_column())
        );
        debug!("{sql}");

        let mut params = frag.params;
        params.push(model.primary_key_value());
        let result = match self.execute(&sql, &params).await {
            Ok(r) => r,
            Err(e) => {
                error!("{} update_by_key: {e}", M::table_name());
                return Err(e.into());
            }
        };
        let rows = result.rows_affected();
        if rows == 0 {
            error!("{} update_by_key: no rows affected", M::table_name());
            return Err(Error::ZeroEffect {
                table: M::table_name(),
                op: "update_by_key",
            });
        }
        Ok(rows)
    }

    /// Inserts a batch of records in one statement and returns the last
    /// inserted key and the rows affected. The whole batch fails atomically.
    ///
    /// The first record's column shape is reused for every record. An empty
    /// batch is a no-op.
    pub async fn insert_batch<M: Model>(&mut self, models: &[M]) -> Result<(i64, u64), Error> {
        let Some(first) = models.first() else {
            return Ok((0, 0));
        };
        let shape = first.insert_fragment();
        let mut sql = format!("INSERT INTO {}({}) VALUES", M::table_name(), shape.columns);
        let mut params = Vec::with_capacity(shape.bound.len() * models.len());
        for (inx, model) in models.iter().enumerate() {
            sql.push('(');
            sql.push_str(&shape.values);
            sql.push(')');
            if inx != models.len() - 1 {
                sql.push(',');
            }
            let values = model.bind_values();
            params.extend(shape.bound.iter().filter_map(|&i| values.get(i).cloned()));
        }
        debug!("{sql}");

        let result = match self.execute(&sql, &params).await {
            Ok(r) => r,
            Err(e) => {
                error!("{} insert_batch: {e}", M::table_name());
                return Err(e.into());
            }
        };
        let rows = result.rows_affected();
        let id = result.last_insert_id().unwrap_or(0);
        if id == 0 {
            error!("{} insert_batch: no key reported", M::table_name());
            return Err(Error::ZeroEffect {
                table: M::table_name(),
                op: "insert_batch",
            });
        }
        Ok((id, rows))
    }

    /// Executes a caller-supplied statement; zero affected rows is success
    /// (idempotent state transitions are legitimate no-ops).
    pub async fn update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, Error> {
        debug!("{sql}");
        let result = match self.execute(sql, params).await {
            Ok(r) => r,
            Err(e) => {
                error!("update: {e} sql={sql}");
                return Err(e.into());
            }
        };
        Ok(result.rows_affected())
    }

    /// Executes a caller-supplied statement that must touch at least one
    /// row; zero affected rows is an error.
    pub async fn update_must_affect(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, Error> {
        let rows = self.update(sql, params).await?;
        if rows == 0 {
            error!("update_must_affect: no rows affected sql={sql}");
            return Err(Error::ZeroEffect {
                table: "(raw)",
                op: "update_must_affect",
            });
        }
        Ok(rows)
    }

    /// Fetches the records matching a condition, with its compiled
    /// WHERE/ORDER/LIMIT applied.
    pub async fn find<M>(&mut self, cond: &Condition) -> Result<Vec<M>, Error>
    where
        M: Model + for<'r> sqlx::FromRow<'r, AnyRow>,
    {
        let alias = M::default_alias();
        let compiled = cond.compile(alias, &M::columns());
        let sql = format!(
            "SELECT {} FROM {}{}",
            M::select_columns(alias),
            table_ref(M::table_name(), alias),
            compiled.suffix()
        );
        debug!("{sql}");

        let mut args = AnyArguments::default();
        for p in &compiled.params {
            p.bind(&mut args)?;
        }
        let rows = match sqlx::query_with(&sql, args).fetch_all(&mut *self.inner).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("{} find: {e}", M::table_name());
                return Err(e.into());
            }
        };
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(M::from_row(row)?);
        }
        Ok(out)
    }

    /// Counts the records matching a condition's filters and time range.
    pub async fn count<M: Model>(&mut self, cond: &Condition) -> Result<i64, Error> {
        let alias = M::default_alias();
        let compiled = cond.compile(alias, &M::columns());
        let mut sql = format!("SELECT COUNT(*) FROM {}", table_ref(M::table_name(), alias));
        if !compiled.where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&compiled.where_sql);
        }
        debug!("{sql}");

        let mut args = AnyArguments::default();
        for p in &compiled.params {
            p.bind(&mut args)?;
        }
        let row = match sqlx::query_with(&sql, args).fetch_one(&mut *self.inner).await {
            Ok(row) => row,
            Err(e) => {
                error!("{} count: {e}", M::table_name());
                return Err(e.into());
            }
        };
        Ok(row.try_get(0)?)
    }
}
