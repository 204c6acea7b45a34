use carafe_orm::{FieldProperty, Model, SqlValue};
use chrono::NaiveDateTime;

#[derive(Model)]
#[orm(table = "article", alias = "a")]
struct Article {
    #[orm(primary_key)]
    id: i64,
    title: String,
    #[orm(update_time)]
    modify_ts: i64,
    #[orm(create_time)]
    created_at: NaiveDateTime,
    views: i64,
}

#[derive(Model)]
#[orm(table = "event")]
struct Event {
    #[orm(primary_key)]
    id: i64,
    name: String,
    happened_at: Option<NaiveDateTime>,
}

fn sample_article() -> Article {
    Article {
        id: 7,
        title: "hello".to_string(),
        modify_ts: 0,
        created_at: NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
        views: 3,
    }
}

#[test]
fn metadata_is_declaration_ordered_and_deterministic() {
    let columns = Article::columns();
    let names: Vec<&str> = columns.iter().map(|c| c.column).collect();
    assert_eq!(names, vec!["id", "title", "modify_ts", "created_at", "views"]);

    assert_eq!(columns[0].property, FieldProperty::Null);
    assert_eq!(columns[1].property, FieldProperty::Null);
    assert_eq!(columns[2].property, FieldProperty::UpdateTime);
    assert_eq!(columns[3].property, FieldProperty::CreateTime);

    // Calling again yields the same extraction.
    let again = Article::columns();
    let names_again: Vec<&str> = again.iter().map(|c| c.column).collect();
    assert_eq!(names, names_again);
    for (a, b) in columns.iter().zip(&again) {
        assert_eq!(a.property, b.property);
        assert_eq!(a.field, b.field);
        assert_eq!(a.json, b.json);
    }

    assert_eq!(Article::table_name(), "article");
    assert_eq!(Article::default_alias(), "a");
    assert_eq!(Article::primary_key_column(), "id");
    // Default alias is the first letter of the table name.
    assert_eq!(Event::default_alias(), "e");
}

#[test]
fn column_name_conventions_drive_time_properties() {
    #[derive(Model)]
    struct Legacy {
        #[orm(primary_key)]
        id: i64,
        #[orm(column = "create_date")]
        created: NaiveDateTime,
        #[orm(column = "modify_date")]
        modified: NaiveDateTime,
    }

    let columns = Legacy::columns();
    assert_eq!(columns[1].property, FieldProperty::CreateTime);
    assert_eq!(columns[2].property, FieldProperty::UpdateTime);
}

#[test]
fn insert_skips_key_and_binds_one_param_per_placeholder() {
    let frag = sample_article().insert_fragment();

    assert_eq!(frag.columns, "title,modify_ts,created_at,views");
    assert_eq!(frag.values.matches('?').count(), frag.params.len());
    assert_eq!(frag.params.len(), 2);
    assert_eq!(frag.params[0], SqlValue::Text("hello".to_string()));
    assert_eq!(frag.params[1], SqlValue::Int(3));
}

#[test]
fn insert_renders_integer_update_time_as_unix_literal() {
    let frag = sample_article().insert_fragment();

    // title, modify_ts, created_at, views
    let values: Vec<&str> = frag.values.split(',').collect();
    assert_eq!(values[0], "?");
    assert!(values[1].parse::<i64>().is_ok(), "expected a unix literal, got {}", values[1]);
    assert_eq!(values[2], "NOW()");
    assert_eq!(values[3], "?");
}

#[test]
fn insert_omits_absent_time_values() {
    let event = Event {
        id: 0,
        name: "launch".to_string(),
        happened_at: None,
    };
    let frag = event.insert_fragment();
    assert_eq!(frag.columns, "name");
    assert_eq!(frag.values, "?");
    assert_eq!(frag.params.len(), 1);

    let event = Event {
        happened_at: Some(
            NaiveDateTime::parse_from_str("2024-06-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        ),
        ..event
    };
    let frag = event.insert_fragment();
    assert_eq!(frag.columns, "name,happened_at");
    assert_eq!(frag.values, "?,?");
    assert_eq!(frag.params.len(), 2);
}

#[test]
fn update_never_touches_key_or_creation_time() {
    let frag = sample_article().update_fragment("a");

    assert!(!frag.sql.contains("a.id"));
    assert!(!frag.sql.contains("created_at"));

    let sets: Vec<&str> = frag.sql.split(',').collect();
    assert_eq!(sets[0], "a.title = ?");
    assert!(sets[1].starts_with("a.modify_ts = "));
    assert!(sets[1].trim_start_matches("a.modify_ts = ").parse::<i64>().is_ok());
    assert_eq!(sets[2], "a.views = ?");

    assert_eq!(frag.sql.matches('?').count(), frag.params.len());
    assert_eq!(
        frag.params,
        vec![SqlValue::Text("hello".to_string()), SqlValue::Int(3)]
    );
}

#[test]
fn update_with_empty_alias_stays_unqualified() {
    let frag = sample_article().update_fragment("");
    assert!(frag.sql.starts_with("title = ?"));
    assert!(!frag.sql.contains('.'));
}

#[test]
fn select_columns_qualifies_every_column() {
    assert_eq!(
        Article::select_columns("a"),
        "a.id,a.title,a.modify_ts,a.created_at,a.views"
    );
    assert_eq!(Event::select_columns(""), "id,name,happened_at");
}
