//! # Condition Map Module
//!
//! Compatibility adapter for the legacy loosely-typed condition mapping: a
//! JSON object whose keys carry operator markers (`!`, `?>?`, `?<?`, `?>=`,
//! `?<=`) and whose reserved keys configure paging, ordering and time
//! ranges. `parse` translates such a mapping into a typed [`Condition`];
//! new code should build [`Condition`] directly.

use serde_json::{Map, Value};

use crate::condition::{Cmp, Condition, DEFAULT_PAGE_SIZE};
use crate::value::SqlValue;

/// Reserved key: order column(s), comma-separated.
pub const COND_ORDER_FIELD: &str = "condORDERField";
/// Reserved key: order direction, ascending when `1`.
pub const COND_ORDER_TYPE: &str = "condORDERType";
pub const COND_ORDER_TYPE_ASC: i64 = 1;
pub const COND_ORDER_TYPE_DESC: i64 = 2;
/// Reserved key: inclusive lower time bound.
pub const COND_BEGIN_TIME: &str = "condBeginTime";
/// Reserved key: exclusive upper time bound.
pub const COND_END_TIME: &str = "condEndTime";
/// Reserved key: explicit row offset.
pub const COND_LIMIT_BEGIN: &str = "condLimitBegin";
/// Reserved key: 1-based page index.
pub const COND_PAGE_INDEX: &str = "condPageIndex";
/// Reserved key: page size.
pub const COND_PAGE_SIZE: &str = "condPageSize";

/// Less-than marker.
pub const MARK_LT: &str = "?<?";
/// Greater-than marker.
pub const MARK_GT: &str = "?>?";
/// Less-or-equal marker.
pub const MARK_LTE: &str = "?<=";
/// Greater-or-equal marker.
pub const MARK_GTE: &str = "?>=";
/// Negation marker.
pub const MARK_NOT: &str = "!";

fn is_reserved(key: &str) -> bool {
    matches!(
        key,
        COND_ORDER_FIELD
            | COND_ORDER_TYPE
            | COND_BEGIN_TIME
            | COND_END_TIME
            | COND_LIMIT_BEGIN
            | COND_PAGE_INDEX
            | COND_PAGE_SIZE
    )
}

fn parse_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().filter(|i| *i >= 0).map(|i| i as u64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Numeric reserved values arrive as numbers or numeric text; anything else
/// falls back to the given default rather than failing the whole mapping.
fn parse_u64_or(map: &Map<String, Value>, key: &str, default: u64) -> u64 {
    match map.get(key) {
        Some(v) => parse_u64(v).unwrap_or_else(|| {
            log::debug!("condition key {key} is not numeric, using {default}");
            default
        }),
        None => default,
    }
}

/// Translates a legacy condition mapping into a typed [`Condition`].
///
/// Non-reserved keys become filters: a leading `!` negates, a leading
/// 3-character `?`-marker selects a relational operator, and the remainder
/// is matched against field, column or JSON names at compile time (an
/// `alias.` prefix is preserved for scoping). Keys that resolve to nothing
/// are dropped by the compiler, not here.
pub fn parse(map: &Map<String, Value>) -> Condition {
    let mut cond = Condition::new();

    for (key, value) in map {
        if is_reserved(key) {
            continue;
        }

        let mut k = key.as_str();
        let mut cmp = Cmp::Eq;
        if let Some(rest) = k.strip_prefix(MARK_NOT) {
            cmp = Cmp::Neq;
            k = rest;
        }
        if k.starts_with('?') && k.len() >= 3 {
            cmp = match &k[..3] {
                MARK_GT => Cmp::Gt,
                MARK_LT => Cmp::Lt,
                MARK_GTE => Cmp::Gte,
                MARK_LTE => Cmp::Lte,
                _ => cmp,
            };
            k = &k[3..];
        }

        cond = cond.filter(k, cmp, SqlValue::from(value));
    }

    if let Some(fields) = map.get(COND_ORDER_FIELD).and_then(Value::as_str) {
        cond = cond.order_by(fields);
    }
    if let Some(v) = map.get(COND_ORDER_TYPE) {
        if v.as_i64() == Some(COND_ORDER_TYPE_ASC) || v.as_str() == Some("1") {
            cond = cond.asc();
        }
    }

    if let Some(v) = map.get(COND_BEGIN_TIME) {
        cond = cond.since(SqlValue::from(v));
    }
    if let Some(v) = map.get(COND_END_TIME) {
        cond = cond.until(SqlValue::from(v));
    }

    let size = parse_u64_or(map, COND_PAGE_SIZE, DEFAULT_PAGE_SIZE);
    if map.contains_key(COND_LIMIT_BEGIN) {
        cond = cond.offset(parse_u64_or(map, COND_LIMIT_BEGIN, 0), size);
    } else if map.contains_key(COND_PAGE_INDEX) {
        cond = cond.page(parse_u64_or(map, COND_PAGE_INDEX, 1), size);
    } else if map.contains_key(COND_PAGE_SIZE) {
        cond = cond.limit(size);
    }

    cond
}
