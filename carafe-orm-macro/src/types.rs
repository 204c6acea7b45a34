use syn::{GenericArgument, PathArguments, Type};

/// Maps a Rust field type to its SQL type hint.
///
/// Returns the hint (e.g. "TEXT", "BIGINT", "TIMESTAMP") and whether the
/// column is nullable (`Option<T>` unwraps to its inner hint).
pub fn rust_type_to_sql(ty: &Type) -> (String, bool) {
    let Type::Path(type_path) = ty else {
        return ("TEXT".to_string(), false);
    };
    let Some(segment) = type_path.path.segments.last() else {
        return ("TEXT".to_string(), false);
    };
    let name = segment.ident.to_string();

    if name == "Option" {
        if let PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(GenericArgument::Type(inner)) = args.args.first() {
                let (inner_sql, _) = rust_type_to_sql(inner);
                return (inner_sql, true);
            }
        }
    }

    let sql = match name.as_str() {
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => "INTEGER",
        "i64" | "u64" => "BIGINT",
        "bool" => "BOOLEAN",
        "f32" | "f64" => "DOUBLE PRECISION",
        "DateTime" => "TIMESTAMPTZ",
        "NaiveDateTime" => "TIMESTAMP",
        "NaiveDate" => "DATE",
        "NaiveTime" => "TIME",
        _ => "TEXT",
    };
    (sql.to_string(), false)
}
