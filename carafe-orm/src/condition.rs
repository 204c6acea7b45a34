//! # Condition Module
//!
//! The typed filter/sort/paging input consumed by the condition compiler,
//! and the compiler itself: `Condition::compile` resolves filter keys
//! against a model's column metadata and produces WHERE/ORDER/LIMIT text
//! plus the ordered bind parameters.

use serde::{Deserialize, Serialize};

use crate::fragment::qualify;
use crate::model::{FieldProperty, TableField};
use crate::value::SqlValue;

/// Page size applied when no pagination is requested.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Comparison operator of one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmp {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    NotIn,
}

impl Cmp {
    /// Relational filters accumulate on one column (range queries);
    /// equality-class filters deduplicate.
    fn is_relational(self) -> bool {
        matches!(self, Cmp::Gt | Cmp::Lt | Cmp::Gte | Cmp::Lte)
    }
}

/// One column filter.
///
/// `key` is resolved against the model field name, the column name or the
/// JSON name when the condition is compiled; it may carry an `alias.`
/// prefix for multi-table disambiguation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub cmp: Cmp,
    pub value: SqlValue,
}

/// Pagination mode. Absent pagination compiles to `LIMIT 0,20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    /// Explicit row offset plus page size.
    Offset { begin: u64, size: u64 },
    /// 1-based page index plus page size.
    Index { index: u64, size: u64 },
    /// Page size alone, offset 0.
    Size { size: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

/// The universal query-filter input: filters, ordering, pagination and an
/// optional time range, assembled through builder methods.
///
/// # Example
///
/// ```rust,ignore
/// let cond = Condition::new()
///     .eq("status", 2)
///     .gt("age", 18)
///     .order_by("created_at")
///     .page(1, 50);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Condition {
    pub filters: Vec<Filter>,
    /// Order columns; empty means the default `alias.id DESC`.
    pub order_fields: Vec<String>,
    pub order: Order,
    pub page: Option<Page>,
    /// Inclusive lower bound on the time column.
    pub begin_time: Option<SqlValue>,
    /// Exclusive upper bound on the time column.
    pub end_time: Option<SqlValue>,
    /// Column the time range applies to; defaults to `created_at`.
    pub time_column: Option<String>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one filter.
    pub fn filter(mut self, key: impl Into<String>, cmp: Cmp, value: impl Into<SqlValue>) -> Self {
        self.filters.push(Filter {
            key: key.into(),
            cmp,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::Eq, value)
    }

    pub fn ne(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::Neq, value)
    }

    pub fn gt(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::Gt, value)
    }

    pub fn lt(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::Lt, value)
    }

    pub fn ge(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::Gte, value)
    }

    pub fn le(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::Lte, value)
    }

    /// `IN (...)` over an inlined value list.
    pub fn in_list(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::In, value)
    }

    /// `NOT IN (...)` over an inlined value list.
    pub fn not_in_list(self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter(key, Cmp::NotIn, value)
    }

    /// Comma-separated order columns (field, column or JSON names).
    pub fn order_by(mut self, fields: &str) -> Self {
        self.order_fields = fields
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        self
    }

    pub fn asc(mut self) -> Self {
        self.order = Order::Asc;
        self
    }

    pub fn desc(mut self) -> Self {
        self.order = Order::Desc;
        self
    }

    /// 1-based page index plus page size.
    pub fn page(mut self, index: u64, size: u64) -> Self {
        self.page = Some(Page::Index { index, size });
        self
    }

    /// Explicit row offset plus page size.
    pub fn offset(mut self, begin: u64, size: u64) -> Self {
        self.page = Some(Page::Offset { begin, size });
        self
    }

    /// Page size alone, offset 0.
    pub fn limit(mut self, size: u64) -> Self {
        self.page = Some(Page::Size { size });
        self
    }

    /// Inclusive lower bound on the time column.
    pub fn since(mut self, t: impl Into<SqlValue>) -> Self {
        self.begin_time = Some(t.into());
        self
    }

    /// Exclusive upper bound on the time column.
    pub fn until(mut self, t: impl Into<SqlValue>) -> Self {
        self.end_time = Some(t.into());
        self
    }

    /// Column the time range applies to.
    pub fn time_column(mut self, column: impl Into<String>) -> Self {
        self.time_column = Some(column.into());
        self
    }

    /// The single oldest row: ascending by `id` unless an order field is
    /// already set, page 1, size 1.
    pub fn first_asc(mut self) -> Self {
        if self.order_fields.is_empty() {
            self.order_fields = vec!["id".to_string()];
        }
        self.order = Order::Asc;
        self.page = Some(Page::Index { index: 1, size: 1 });
        self
    }

    /// The single newest row: descending by `id` unless an order field is
    /// already set, page 1, size 1.
    pub fn first_desc(mut self) -> Self {
        if self.order_fields.is_empty() {
            self.order_fields = vec!["id".to_string()];
        }
        self.order = Order::Desc;
        self.page = Some(Page::Index { index: 1, size: 1 });
        self
    }

    /// Compiles the condition against a model's column metadata.
    ///
    /// Filter keys resolve against field, column or JSON names (first match
    /// in declaration order); unresolved keys are dropped silently so that
    /// unknown filters stay forward-compatible. When any key carries an
    /// `alias.` prefix, only prefixed keys are considered.
    pub fn compile(&self, alias: &str, columns: &[TableField]) -> Compiled {
        let mut where_sql = String::new();
        let mut params = Vec::new();

        let prefix = format!("{alias}.");
        let scoped =
            !alias.is_empty() && self.filters.iter().any(|f| f.key.starts_with(&prefix));

        let mut used: Vec<&str> = Vec::new();
        for f in &self.filters {
            let key = if alias.is_empty() {
                f.key.as_str()
            } else {
                match f.key.strip_prefix(&prefix) {
                    Some(rest) => rest,
                    None if scoped => continue,
                    None => f.key.as_str(),
                }
            };

            if f.value.is_empty_filter() {
                continue;
            }
            let Some(field) = resolve(key, columns) else {
                continue;
            };
            if used.contains(&field.column) && !f.cmp.is_relational() {
                continue;
            }
            used.push(field.column);

            let col = qualify(alias, field.column);
            if field.property == FieldProperty::Thing || matches!(f.cmp, Cmp::In | Cmp::NotIn) {
                let verb = if matches!(f.cmp, Cmp::Neq | Cmp::NotIn) {
                    "NOT IN"
                } else {
                    "IN"
                };
                if where_sql.is_empty() {
                    where_sql = format!("WHERE {col} {verb}({}) ", f.value);
                } else {
                    where_sql = format!("{where_sql} AND {col} {verb}({}) ", f.value);
                }
            } else {
                let op = match f.cmp {
                    Cmp::Gt => ">",
                    Cmp::Lt => "<",
                    Cmp::Gte => ">=",
                    Cmp::Lte => "<=",
                    Cmp::Neq => "!=",
                    _ => "=",
                };
                params.push(f.value.clone());
                if where_sql.is_empty() {
                    where_sql = format!("WHERE {col} {op} ? ");
                } else {
                    where_sql = format!("{where_sql} AND {col} {op} ? ");
                }
            }
        }

        let time_col = self.time_column.as_deref().unwrap_or("created_at");
        if let Some(t) = &self.begin_time {
            append_time(&mut where_sql, &mut params, alias, time_col, ">=", t);
        }
        if let Some(t) = &self.end_time {
            append_time(&mut where_sql, &mut params, alias, time_col, "<", t);
        }

        let order_sql = if self.order_fields.is_empty() {
            format!("ORDER BY {} DESC", qualify(alias, "id"))
        } else {
            let fields: Vec<String> = self
                .order_fields
                .iter()
                .map(|k| {
                    let column = resolve(k, columns).map(|f| f.column).unwrap_or(k.as_str());
                    qualify(alias, column)
                })
                .collect();
            let dir = match self.order {
                Order::Asc => "ASC",
                Order::Desc => "DESC",
            };
            format!("ORDER BY {} {}", fields.join(","), dir)
        };

        let limit_sql = match self.page {
            Some(Page::Offset { begin, size }) => format!("LIMIT {begin},{size}"),
            Some(Page::Index { index, size }) => {
                format!("LIMIT {},{}", index.saturating_sub(1) * size, size)
            }
            Some(Page::Size { size }) => format!("LIMIT 0,{size}"),
            None => format!("LIMIT 0,{DEFAULT_PAGE_SIZE}"),
        };

        Compiled {
            where_sql,
            params,
            order_sql,
            limit_sql,
        }
    }
}

fn append_time(
    where_sql: &mut String,
    params: &mut Vec<SqlValue>,
    alias: &str,
    column: &str,
    op: &str,
    value: &SqlValue,
) {
    let col = qualify(alias, column);
    if where_sql.is_empty() {
        *where_sql = format!("WHERE {col} {op} ?");
    } else {
        *where_sql = format!("{where_sql} AND {col} {op} ?");
    }
    params.push(value.clone());
}

fn resolve<'c>(key: &str, columns: &'c [TableField]) -> Option<&'c TableField> {
    columns
        .iter()
        .find(|c| key == c.field || key == c.column || key == c.json)
}

/// Compiled WHERE/ORDER/LIMIT text plus ordered bind parameters.
#[derive(Debug, Clone, Default)]
pub struct Compiled {
    pub where_sql: String,
    pub params: Vec<SqlValue>,
    pub order_sql: String,
    pub limit_sql: String,
}

impl Compiled {
    /// Everything after the FROM clause, ready to append to a SELECT.
    pub fn suffix(&self) -> String {
        let mut s = String::new();
        if !self.where_sql.is_empty() {
            s.push(' ');
            s.push_str(&self.where_sql);
        }
        s.push(' ');
        s.push_str(&self.order_sql);
        s.push(' ');
        s.push_str(&self.limit_sql);
        s
    }
}
