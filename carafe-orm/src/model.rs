use crate::fragment::{self, InsertFragment, SqlFragment};
use crate::value::SqlValue;

/// Semantic tag driving special-case SQL generation for one column.
///
/// Populated by the `#[derive(Model)]` macro from `#[orm(...)]` attributes
/// and column-name conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldProperty {
    #[default]
    Null,
    /// Condition values render as an inlined `IN(...)`/`NOT IN(...)` list
    /// rather than a bound parameter.
    Thing,
    Search,
    ImgUrl,
    /// Populated by the database clock at INSERT, never touched by UPDATE.
    CreateTime,
    /// Rewritten to "now" by both INSERT and UPDATE generation.
    UpdateTime,
    /// Soft-delete column, reserved for filtering; never written by
    /// generation.
    DeleteTime,
}

/// Metadata describing one persisted column and its correspondence to a
/// model field.
///
/// This structure is usually populated automatically by the
/// `#[derive(Model)]` macro, one instance per column in declaration order.
#[derive(Debug, Clone)]
pub struct TableField {
    /// The Rust field identifier.
    pub field: &'static str,
    /// The column name in the database.
    pub column: &'static str,
    /// External serialization name, matched against condition keys.
    pub json: &'static str,
    /// Free-text SQL type hint (e.g. "BIGINT", "TIMESTAMP"). A hint
    /// containing "INT" makes timestamp columns render as unix integers.
    pub sql_type: &'static str,
    /// The semantic tag for this column.
    pub property: FieldProperty,
}

impl TableField {
    /// Whether the type hint names a date/time column.
    pub fn is_time_type(&self) -> bool {
        self.sql_type.contains("DATE") || self.sql_type.contains("TIME")
    }
}

/// The capability set every persisted record type implements.
///
/// Typically implemented via the `#[derive(Model)]` macro. The provided
/// methods are the fragment-builder surface consumed by the executor.
///
/// # Example
///
/// ```rust,ignore
/// use carafe_orm::Model;
///
/// #[derive(Model)]
/// struct User {
///     #[orm(primary_key)]
///     id: i64,
///     username: String,
/// }
/// ```
pub trait Model {
    /// Returns the table name associated with this model.
    fn table_name() -> &'static str;

    /// Returns column metadata in declaration order. The first entry is the
    /// primary key.
    fn columns() -> Vec<TableField>;

    /// The alias this table takes in generated statements. May be empty, in
    /// which case column references stay unqualified.
    fn default_alias() -> &'static str;

    /// The primary-key column name.
    fn primary_key_column() -> &'static str;

    /// The current primary-key value of this record.
    fn primary_key_value(&self) -> SqlValue;

    /// Current field values, one per column, in declaration order.
    fn bind_values(&self) -> Vec<SqlValue>;

    /// Builds the column list, placeholder list and parameters for an
    /// INSERT of this record.
    fn insert_fragment(&self) -> InsertFragment {
        fragment::insert_fragment(&Self::columns(), &self.bind_values())
    }

    /// Builds the assignment list and parameters for an UPDATE of this
    /// record.
    fn update_fragment(&self, alias: &str) -> SqlFragment {
        fragment::update_fragment(alias, &Self::columns(), &self.bind_values())
    }

    /// `alias.col,...` over every column, the shape used by SELECT lists.
    fn select_columns(alias: &str) -> String {
        fragment::select_columns(alias, &Self::columns())
    }
}
