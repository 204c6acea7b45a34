use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod derive_anyrow;
mod derive_model;
mod types;

/// Derives the `Model` trait: table and column metadata, key access and
/// declaration-order bind values.
///
/// Struct-level attributes: `#[orm(table = "...", alias = "...")]`.
/// Field-level attributes: `primary_key`, `column = "..."`,
/// `json = "..."`, `sql_type = "..."`, `thing`, `search`, `imgurl`,
/// `create_time`, `update_time`, `delete_time`, `skip`.
#[proc_macro_derive(Model, attributes(orm))]
pub fn model_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    derive_model::expand(ast).into()
}

/// Derives `sqlx::FromRow` for `sqlx::any::AnyRow`, copying column values
/// into fields in declaration order.
#[proc_macro_derive(FromAnyRow, attributes(orm))]
pub fn from_any_row_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    derive_anyrow::expand(ast).into()
}
