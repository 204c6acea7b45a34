//! # Fragment Module
//!
//! Pure SQL-text builders. Each function consumes column metadata plus a
//! record's values and produces a text fragment and the ordered parameters
//! to bind; nothing here touches the database.

use chrono::Utc;

use crate::model::{FieldProperty, TableField};
use crate::value::SqlValue;

/// A generated SQL snippet paired with its ordered bind parameters.
///
/// Parameter order always matches the order placeholders appear in `sql`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Column list, placeholder list and parameters for one INSERT tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertFragment {
    /// Comma-joined column names, no trailing separator.
    pub columns: String,
    /// Comma-joined value expressions (`?` placeholders and time literals).
    pub values: String,
    /// Parameters for the placeholders, in order.
    pub params: Vec<SqlValue>,
    /// Declaration-order indices of the columns bound as placeholders; batch
    /// inserts reuse these to extract values from subsequent records.
    pub(crate) bound: Vec<usize>,
}

pub(crate) fn qualify(alias: &str, column: &str) -> String {
    if alias.is_empty() {
        column.to_string()
    } else {
        format!("{alias}.{column}")
    }
}

pub(crate) fn table_ref(table: &str, alias: &str) -> String {
    if alias.is_empty() {
        table.to_string()
    } else {
        format!("{table} AS {alias}")
    }
}

fn now_literal(field: &TableField, now: i64) -> String {
    if field.sql_type.contains("INT") {
        now.to_string()
    } else {
        "NOW()".to_string()
    }
}

/// `alias.col,...` over every column including the key.
pub fn select_columns(alias: &str, columns: &[TableField]) -> String {
    columns
        .iter()
        .map(|c| qualify(alias, c.column))
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds the INSERT column/value lists for one record.
///
/// The first declared column (the primary key) is skipped. Timestamp columns
/// tagged `CreateTime`/`UpdateTime` render as literals and bind nothing;
/// `DeleteTime` columns are never written; an absent value on a time-typed
/// column is omitted entirely, so only non-default times are written.
pub fn insert_fragment(columns: &[TableField], values: &[SqlValue]) -> InsertFragment {
    let now = Utc::now().timestamp();
    let mut cols = Vec::new();
    let mut vals = Vec::new();
    let mut params = Vec::new();
    let mut bound = Vec::new();

    for (inx, (field, value)) in columns.iter().zip(values).enumerate().skip(1) {
        match field.property {
            FieldProperty::CreateTime | FieldProperty::UpdateTime => {
                cols.push(field.column.to_string());
                vals.push(now_literal(field, now));
            }
            FieldProperty::DeleteTime => {}
            _ => {
                if field.is_time_type() && value.is_null() {
                    continue;
                }
                cols.push(field.column.to_string());
                vals.push("?".to_string());
                params.push(value.clone());
                bound.push(inx);
            }
        }
    }

    InsertFragment {
        columns: cols.join(","),
        values: vals.join(","),
        params,
        bound,
    }
}

/// Builds the UPDATE assignment list for one record.
///
/// The first declared column is skipped (the key is updated only via WHERE).
/// `CreateTime` columns are never touched; `UpdateTime` columns are always
/// rewritten to "now" as a literal; `DeleteTime` columns are never written;
/// an absent value on a time-typed column is omitted.
pub fn update_fragment(alias: &str, columns: &[TableField], values: &[SqlValue]) -> SqlFragment {
    let now = Utc::now().timestamp();
    let mut sets = Vec::new();
    let mut params = Vec::new();

    for (field, value) in columns.iter().zip(values).skip(1) {
        match field.property {
            FieldProperty::UpdateTime => {
                sets.push(format!(
                    "{} = {}",
                    qualify(alias, field.column),
                    now_literal(field, now)
                ));
            }
            FieldProperty::CreateTime | FieldProperty::DeleteTime => {}
            _ => {
                if field.is_time_type() && value.is_null() {
                    continue;
                }
                sets.push(format!("{} = ?", qualify(alias, field.column)));
                params.push(value.clone());
            }
        }
    }

    SqlFragment {
        sql: sets.join(","),
        params,
    }
}
