use carafe_orm::{Condition, Database, Error, FromAnyRow, Model};

#[derive(Model, FromAnyRow, Debug, Clone, PartialEq)]
#[orm(table = "entry", alias = "")]
struct Entry {
    #[orm(primary_key)]
    id: i64,
    name: String,
    age: i64,
}

fn entry(name: &str, age: i64) -> Entry {
    Entry {
        id: 0,
        name: name.to_string(),
        age,
    }
}

async fn setup() -> Result<Database, Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::builder()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let mut tx = db.begin().await?;
    tx.update(
        "CREATE TABLE entry(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, age BIGINT NOT NULL)",
        &[],
    )
    .await?;
    tx.commit().await?;
    Ok(db)
}

async fn count(db: &Database) -> Result<i64, Error> {
    let mut tx = db.begin().await?;
    let n = tx.count::<Entry>(&Condition::new()).await?;
    tx.rollback().await?;
    Ok(n)
}

#[tokio::test]
async fn successful_work_is_committed() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let record = entry("Alice", 25);
    let id = db
        .transaction(|tx| Box::pin(async move { tx.insert(&record).await }))
        .await?;
    assert_eq!(id, 1);
    assert_eq!(count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn returned_errors_roll_the_work_back() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let record = entry("Alice", 25);
    let result: Result<(), Error> = db
        .transaction(|tx| {
            Box::pin(async move {
                tx.insert(&record).await?;
                // Touches nothing, so the unit of work fails.
                tx.update_must_affect("UPDATE entry SET age = 1 WHERE id = -5", &[])
                    .await?;
                Ok(())
            })
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_zero_effect());
    assert_eq!(count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn panics_roll_back_and_re_raise() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let db2 = db.clone();
    let record = entry("Alice", 25);
    let handle = tokio::spawn(async move {
        db2.transaction::<(), _>(|tx| {
            Box::pin(async move {
                tx.insert(&record).await?;
                panic!("induced failure");
            })
        })
        .await
    });

    let join = handle.await;
    assert!(join.unwrap_err().is_panic());
    assert_eq!(count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn explicit_rollback_discards_the_work() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let mut tx = db.begin().await?;
    tx.insert(&entry("Alice", 25)).await?;
    tx.rollback().await?;
    assert_eq!(count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn one_shot_helpers_wrap_their_own_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;

    let id = db.insert_one(&entry("Alice", 25)).await?;
    assert_eq!(id, 1);
    assert_eq!(count(&db).await?, 1);

    let mut updated = entry("Alicia", 26);
    updated.id = id;
    let rows = db.update_one(&updated).await?;
    assert_eq!(rows, 1);

    let mut ghost = entry("Nobody", 1);
    ghost.id = 999;
    let err = db.update_one(&ghost).await.unwrap_err();
    assert!(err.is_zero_effect());
    Ok(())
}
