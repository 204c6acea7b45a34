use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

/// Expands the `FromAnyRow` derive macro.
///
/// Generates an implementation of `sqlx::FromRow` for `AnyRow` that copies
/// column values into fields positionally, in declaration order — the order
/// the generated SELECT lists columns. Date-time fields are parsed from
/// strings because the `Any` driver carries no chrono support.
pub fn expand(input: DeriveInput) -> TokenStream {
    let struct_name = input.ident;

    let fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => panic!("Only structs with named fields supported"),
        },
        _ => panic!("Only structs supported"),
    };

    let mut column_index = 0usize;
    let ext_logic: Vec<TokenStream> = fields
        .iter()
        .map(|f| {
            let field_name = &f.ident;
            let field_type = &f.ty;

            if is_skipped(f) {
                return quote! {
                    let #field_name: #field_type = Default::default();
                };
            }

            let idx = syn::Index::from(column_index);
            column_index += 1;

            match datetime_kind(field_type) {
                DateTimeKind::Naive => quote! {
                    let #field_name: #field_type = {
                        let s: String = row.try_get(#idx)?;
                        chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
                    };
                },
                DateTimeKind::OptionNaive => quote! {
                    let #field_name: #field_type = {
                        let s: Option<String> = row.try_get(#idx)?;
                        match s {
                            Some(s) => Some(
                                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
                            ),
                            None => None,
                        }
                    };
                },
                DateTimeKind::Utc => quote! {
                    let #field_name: #field_type = {
                        let s: String = row.try_get(#idx)?;
                        chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
                            .and_utc()
                    };
                },
                DateTimeKind::None => quote! {
                    let #field_name: #field_type = row.try_get(#idx)?;
                },
            }
        })
        .collect();

    let field_names = fields.iter().map(|f| &f.ident);

    quote! {
        impl<'r> sqlx::FromRow<'r, sqlx::any::AnyRow> for #struct_name {
            fn from_row(row: &'r sqlx::any::AnyRow) -> Result<Self, sqlx::Error> {
                use sqlx::Row;
                #(#ext_logic)*

                Ok(#struct_name {
                    #(#field_names),*
                })
            }
        }
    }
}

enum DateTimeKind {
    Naive,
    OptionNaive,
    Utc,
    None,
}

fn datetime_kind(ty: &Type) -> DateTimeKind {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "NaiveDateTime" {
                return DateTimeKind::Naive;
            }
            if segment.ident == "DateTime" {
                return DateTimeKind::Utc;
            }
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        if matches!(datetime_kind(inner), DateTimeKind::Naive) {
                            return DateTimeKind::OptionNaive;
                        }
                    }
                }
            }
        }
    }
    DateTimeKind::None
}

fn is_skipped(f: &syn::Field) -> bool {
    let mut skip = false;
    for attr in &f.attrs {
        if attr.path().is_ident("orm") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                }
                Ok(())
            });
        }
    }
    skip
}
