use carafe_orm::{Condition, Model, SqlValue};

#[derive(Model)]
#[orm(table = "ticket", alias = "a")]
struct Ticket {
    #[orm(primary_key)]
    id: i64,
    #[orm(thing)]
    status: i64,
    age: i64,
    #[orm(json = "userName")]
    name: String,
    created_at: i64,
}

#[test]
fn empty_condition_uses_defaults() {
    let compiled = Condition::new().compile("a", &Ticket::columns());

    assert_eq!(compiled.where_sql, "");
    assert!(compiled.params.is_empty());
    assert_eq!(compiled.order_sql, "ORDER BY a.id DESC");
    assert_eq!(compiled.limit_sql, "LIMIT 0,20");
}

#[test]
fn thing_columns_render_inlined_in_lists() {
    let compiled = Condition::new().eq("status", 5).compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "WHERE a.status IN(5) ");
    assert!(compiled.params.is_empty());

    let compiled = Condition::new().ne("status", 5).compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "WHERE a.status NOT IN(5) ");

    let compiled = Condition::new()
        .in_list("age", vec![18, 21, 30])
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "WHERE a.age IN(18,21,30) ");
    assert!(compiled.params.is_empty());
}

#[test]
fn relational_filters_accumulate_into_ranges() {
    let compiled = Condition::new()
        .gt("age", 18)
        .lt("age", 65)
        .compile("a", &Ticket::columns());

    assert_eq!(compiled.where_sql, "WHERE a.age > ?  AND a.age < ? ");
    assert_eq!(compiled.params, vec![SqlValue::Int(18), SqlValue::Int(65)]);
}

#[test]
fn duplicate_equality_filters_keep_the_first() {
    let compiled = Condition::new()
        .eq("age", 1)
        .eq("age", 2)
        .compile("a", &Ticket::columns());

    assert_eq!(compiled.where_sql, "WHERE a.age = ? ");
    assert_eq!(compiled.params, vec![SqlValue::Int(1)]);

    // A relational filter on the same column still accumulates.
    let compiled = Condition::new()
        .eq("age", 1)
        .gt("age", 0)
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "WHERE a.age = ?  AND a.age > ? ");
}

#[test]
fn keys_resolve_through_field_column_and_json_names() {
    let compiled = Condition::new()
        .eq("userName", "bob")
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "WHERE a.name = ? ");

    let compiled = Condition::new().eq("name", "bob").compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "WHERE a.name = ? ");

    // Unknown keys are dropped silently.
    let compiled = Condition::new()
        .eq("no_such_column", 1)
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "");
}

#[test]
fn null_and_empty_values_drop_their_filter() {
    let compiled = Condition::new()
        .eq("name", "")
        .eq("age", SqlValue::Null)
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.where_sql, "");
    assert!(compiled.params.is_empty());
}

#[test]
fn alias_prefixed_keys_scope_the_condition() {
    let compiled = Condition::new()
        .eq("a.age", 30)
        .eq("name", "bob")
        .compile("a", &Ticket::columns());

    // Once any key is alias-prefixed, unprefixed keys are dropped.
    assert_eq!(compiled.where_sql, "WHERE a.age = ? ");
    assert_eq!(compiled.params, vec![SqlValue::Int(30)]);
}

#[test]
fn ordering_resolves_names_and_direction() {
    let compiled = Condition::new()
        .order_by("age,created_at")
        .asc()
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.order_sql, "ORDER BY a.age,a.created_at ASC");

    let compiled = Condition::new()
        .order_by("userName")
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.order_sql, "ORDER BY a.name DESC");

    // Unresolved order fields pass through untouched.
    let compiled = Condition::new()
        .order_by("rank")
        .compile("a", &Ticket::columns());
    assert_eq!(compiled.order_sql, "ORDER BY a.rank DESC");
}

#[test]
fn pagination_modes() {
    let columns = Ticket::columns();

    let compiled = Condition::new().page(2, 10).compile("a", &columns);
    assert_eq!(compiled.limit_sql, "LIMIT 10,10");

    let compiled = Condition::new().page(1, 10).compile("a", &columns);
    assert_eq!(compiled.limit_sql, "LIMIT 0,10");

    let compiled = Condition::new().offset(40, 25).compile("a", &columns);
    assert_eq!(compiled.limit_sql, "LIMIT 40,25");

    let compiled = Condition::new().limit(7).compile("a", &columns);
    assert_eq!(compiled.limit_sql, "LIMIT 0,7");
}

#[test]
fn time_range_appends_with_correct_joining() {
    let columns = Ticket::columns();

    let compiled = Condition::new().since(100).until(200).compile("a", &columns);
    assert_eq!(
        compiled.where_sql,
        "WHERE a.created_at >= ? AND a.created_at < ?"
    );
    assert_eq!(compiled.params, vec![SqlValue::Int(100), SqlValue::Int(200)]);

    let compiled = Condition::new().gt("age", 18).since(100).compile("a", &columns);
    assert_eq!(
        compiled.where_sql,
        "WHERE a.age > ?  AND a.created_at >= ?"
    );

    let compiled = Condition::new()
        .since(100)
        .time_column("updated_at")
        .compile("a", &columns);
    assert_eq!(compiled.where_sql, "WHERE a.updated_at >= ?");
}

#[test]
fn first_helpers_pin_order_and_page() {
    let columns = Ticket::columns();

    let compiled = Condition::new().first_desc().compile("a", &columns);
    assert_eq!(compiled.order_sql, "ORDER BY a.id DESC");
    assert_eq!(compiled.limit_sql, "LIMIT 0,1");

    let compiled = Condition::new().first_asc().compile("a", &columns);
    assert_eq!(compiled.order_sql, "ORDER BY a.id ASC");
    assert_eq!(compiled.limit_sql, "LIMIT 0,1");

    let compiled = Condition::new().order_by("age").first_asc().compile("a", &columns);
    assert_eq!(compiled.order_sql, "ORDER BY a.age ASC");
}

#[test]
fn suffix_concatenates_where_order_limit() {
    let compiled = Condition::new().eq("age", 1).compile("a", &Ticket::columns());
    assert_eq!(
        compiled.suffix(),
        " WHERE a.age = ?  ORDER BY a.id DESC LIMIT 0,20"
    );
}
