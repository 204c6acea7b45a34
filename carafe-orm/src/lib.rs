//! # carafe-orm
//!
//! A lightweight metadata-driven SQL compilation layer built on top of sqlx.
//!
//! `#[derive(Model)]` extracts per-column metadata from a record type at
//! compile time; pure fragment builders turn that metadata plus a record or
//! a [`Condition`] into parameterized SQL text; [`Transaction`] executes the
//! fragments and [`Database::transaction`] wraps a unit of work with
//! guaranteed commit-or-rollback, including rollback on panic.
//!
//! ```rust,ignore
//! use carafe_orm::{Condition, Database, FromAnyRow, Model};
//!
//! #[derive(Model, FromAnyRow)]
//! struct User {
//!     #[orm(primary_key)]
//!     id: i64,
//!     name: String,
//!     age: i64,
//! }
//!
//! let db = Database::connect("mysql://...").await?;
//! let id = db.insert_one(&user).await?;
//! let mut tx = db.begin().await?;
//! let adults: Vec<User> = tx.find(&Condition::new().ge("age", 18)).await?;
//! tx.commit().await?;
//! ```

pub mod condition;
pub mod condition_map;
pub mod database;
pub mod error;
pub mod executor;
pub mod fragment;
pub mod model;
pub mod value;

pub use carafe_orm_macro::{FromAnyRow, Model};

pub use condition::{Cmp, Compiled, Condition, Filter, Order, Page, DEFAULT_PAGE_SIZE};
pub use database::{Database, DatabaseBuilder};
pub use error::Error;
pub use executor::Transaction;
pub use fragment::{InsertFragment, SqlFragment};
pub use model::{FieldProperty, Model, TableField};
pub use value::SqlValue;
