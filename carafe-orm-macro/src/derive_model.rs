use heck::{ToLowerCamelCase, ToSnakeCase};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields};

use crate::types::rust_type_to_sql;

struct FieldMeta {
    ident: syn::Ident,
    field: String,
    column: String,
    json: String,
    sql_type: String,
    property: &'static str,
    primary_key: bool,
}

/// Expands the `#[derive(Model)]` macro.
///
/// Walks the struct fields and `#[orm(...)]` attributes and generates the
/// `impl Model` block: `TableField` metadata in declaration order, table
/// name, default alias, primary-key access and bind values.
pub fn expand(ast: DeriveInput) -> TokenStream {
    let struct_name = &ast.ident;

    let mut table_name = struct_name.to_string().to_snake_case();
    let mut alias: Option<String> = None;
    for attr in &ast.attrs {
        if attr.path().is_ident("orm") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    table_name = value.value();
                }

                if meta.path.is_ident("alias") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    alias = Some(value.value());
                }

                Ok(())
            })
            .expect("Failed to parse orm attributes");
        }
    }
    // Default alias is the first letter of the table name.
    let alias = alias.unwrap_or_else(|| table_name.chars().take(1).collect());

    let fields = if let Data::Struct(data) = &ast.data {
        if let Fields::Named(fields) = &data.fields {
            fields
        } else {
            panic!("Model must have named fields");
        }
    } else {
        panic!("Model must be a struct")
    };

    let mut metas: Vec<FieldMeta> = Vec::new();
    for f in &fields.named {
        let ident = f.ident.clone().expect("named field");
        let (inferred_type, _is_nullable) = rust_type_to_sql(&f.ty);

        let mut skip = false;
        let mut primary_key = false;
        let mut column: Option<String> = None;
        let mut json: Option<String> = None;
        let mut sql_type: Option<String> = None;
        let mut thing = false;
        let mut search = false;
        let mut imgurl = false;
        let mut create_time = false;
        let mut update_time = false;
        let mut delete_time = false;

        for attr in &f.attrs {
            if attr.path().is_ident("orm") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        skip = true;
                    }

                    if meta.path.is_ident("primary_key") {
                        primary_key = true;
                    }

                    if meta.path.is_ident("column") {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        column = Some(value.value());
                    }

                    if meta.path.is_ident("json") {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        json = Some(value.value());
                    }

                    if meta.path.is_ident("sql_type") {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        sql_type = Some(value.value());
                    }

                    if meta.path.is_ident("thing") {
                        thing = true;
                    }

                    if meta.path.is_ident("search") {
                        search = true;
                    }

                    if meta.path.is_ident("imgurl") {
                        imgurl = true;
                    }

                    if meta.path.is_ident("create_time") {
                        create_time = true;
                    }

                    if meta.path.is_ident("update_time") {
                        update_time = true;
                    }

                    if meta.path.is_ident("delete_time") {
                        delete_time = true;
                    }

                    Ok(())
                })
                .expect("Failed to parse orm attributes");
            }
        }

        // Fields tagged skip are not persisted columns.
        if skip {
            continue;
        }

        let field = ident
            .to_string()
            .strip_prefix("r#")
            .map(str::to_string)
            .unwrap_or_else(|| ident.to_string());
        let column = column.unwrap_or_else(|| field.to_snake_case());
        let json = json.unwrap_or_else(|| field.to_lower_camel_case());
        let sql_type = sql_type.unwrap_or(inferred_type);

        let mut property = "Null";
        if thing {
            property = "Thing";
        }
        if search {
            property = "Search";
        }
        if imgurl {
            property = "ImgUrl";
        }
        if create_time || column == "create_date" {
            property = "CreateTime";
        }
        if update_time || column == "modify_date" {
            property = "UpdateTime";
        }
        if delete_time {
            property = "DeleteTime";
        }

        metas.push(FieldMeta {
            ident,
            field,
            column,
            json,
            sql_type,
            property,
            primary_key,
        });
    }

    if metas.is_empty() {
        panic!("Model must declare at least one persisted field");
    }

    // The primary key defaults to the first declared column.
    let pk = metas.iter().find(|m| m.primary_key).unwrap_or(&metas[0]);
    let pk_column = pk.column.clone();
    let pk_field = pk.ident.clone();

    let column_defs = metas.iter().map(|m| {
        let field = &m.field;
        let column = &m.column;
        let json = &m.json;
        let sql_type = &m.sql_type;
        let property = format_ident!("{}", m.property);

        quote! {
            carafe_orm::TableField {
                field: #field,
                column: #column,
                json: #json,
                sql_type: #sql_type,
                property: carafe_orm::FieldProperty::#property,
            }
        }
    });

    let bind_values = metas.iter().map(|m| {
        let ident = &m.ident;
        quote! { carafe_orm::SqlValue::from(self.#ident.clone()) }
    });

    quote! {
        impl carafe_orm::Model for #struct_name {
            fn table_name() -> &'static str {
                #table_name
            }

            fn columns() -> Vec<carafe_orm::TableField> {
                vec![#(#column_defs),*]
            }

            fn default_alias() -> &'static str {
                #alias
            }

            fn primary_key_column() -> &'static str {
                #pk_column
            }

            fn primary_key_value(&self) -> carafe_orm::SqlValue {
                carafe_orm::SqlValue::from(self.#pk_field.clone())
            }

            fn bind_values(&self) -> Vec<carafe_orm::SqlValue> {
                vec![#(#bind_values),*]
            }
        }
    }
}
