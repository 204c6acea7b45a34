//! # Value Module
//!
//! A tagged union over every value the fragment builders can bind or inline.
//! `SqlValue` is what `#[derive(Model)]` extracts from record fields and what
//! the condition compiler carries as filter values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::any::AnyArguments;
use sqlx::Arguments;
use std::fmt;

/// A bindable SQL value.
///
/// `DateTime` binds as formatted text because the sqlx `Any` driver has no
/// chrono support; the format round-trips through both MySQL and SQLite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    /// A list value, only meaningful for `IN`/`NOT IN` rendering where it is
    /// inlined as a comma-joined literal rather than bound.
    List(Vec<SqlValue>),
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Values the condition compiler drops: NULL, the empty string and the
    /// empty list never become predicates.
    pub(crate) fn is_empty_filter(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Text(s) => s.is_empty(),
            SqlValue::List(l) => l.is_empty(),
            _ => false,
        }
    }

    /// Pushes the value onto a sqlx argument buffer.
    pub fn bind<'q>(&self, args: &mut AnyArguments<'q>) -> Result<(), sqlx::Error> {
        let result = match self {
            SqlValue::Null => args.add(None::<String>),
            SqlValue::Bool(b) => args.add(*b),
            SqlValue::Int(i) => args.add(*i),
            SqlValue::Float(f) => args.add(*f),
            SqlValue::Text(s) => args.add(s.clone()),
            SqlValue::DateTime(dt) => args.add(dt.format(DATETIME_FORMAT).to_string()),
            SqlValue::List(_) => args.add(self.to_string()),
        };
        result.map_err(sqlx::Error::Encode)
    }
}

/// Renders the raw literal form used when a value is inlined into an
/// `IN(...)` list. Text renders unquoted, matching the legacy condition
/// semantics where a pre-formatted list such as `"1,2,3"` is pasted verbatim.
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Text(s) => write!(f, "{s}"),
            SqlValue::DateTime(dt) => write!(f, "'{}'", dt.format(DATETIME_FORMAT)),
            SqlValue::List(items) => {
                for (inx, item) in items.iter().enumerate() {
                    if inx != 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SqlValue {
                fn from(value: $t) -> Self {
                    SqlValue::Int(value as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float(value as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::DateTime(value)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for SqlValue {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        SqlValue::DateTime(value.naive_utc())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(values: Vec<T>) -> Self {
        SqlValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<&serde_json::Value> for SqlValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SqlValue::Null,
            serde_json::Value::Bool(b) => SqlValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    SqlValue::Int(u as i64)
                } else {
                    SqlValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => SqlValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                SqlValue::List(items.iter().map(SqlValue::from).collect())
            }
            other => SqlValue::Text(other.to_string()),
        }
    }
}
