#![allow(clippy::unwrap_used, clippy::expect_used)]

use minorm::{
    Database, Entity, Error,
    entity::{
        column::{ComparableColumn, NullableColumn},
        model::{ActiveModelValue, Model as _},
        value::Value,
    },
};

use crate::models::{counter, quote, student};

async fn memory_db() -> Database {
    Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open database")
}

async fn insert_student(db: &mut Database, name: &str, age: Option<i64>) -> i64 {
    let record = student::Entity::insert(
        db,
        student::ActiveModel {
            name: name.to_string().into(),
            age: age.into(),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to insert student");

    match record.key() {
        Value::Integer(id) => *id,
        other => panic!("Unexpected key {other:?}"),
    }
}

#[tokio::test]
async fn test_ensure_table_twice() {
    let mut db = memory_db().await;

    student::Entity::ensure_table(&mut db).await.unwrap();
    student::Entity::ensure_table(&mut db).await.unwrap();
}

#[tokio::test]
async fn test_table_created_by_another_handle() {
    let path = std::env::temp_dir().join(format!("minorm-shared-{}.db", std::process::id()));
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let mut first = Database::connect(&url).await.unwrap();
    student::Entity::ensure_table(&mut first).await.unwrap();
    quote::Entity::ensure_table(&mut first).await.unwrap();
    first.close().await.unwrap();

    // This handle has not seen either table yet, so it runs into the existing ones, the second
    // time with an insert pending.
    let mut second = Database::connect(&url).await.unwrap();
    insert_student(&mut second, "Pavlo", None).await;
    assert_eq!(quote::Entity::get_many(&mut second, None).await.unwrap().len(), 0);
    second.commit().await.unwrap();
    second.close().await.unwrap();

    let mut third = Database::connect(&url).await.unwrap();
    assert_eq!(student::Entity::get_many(&mut third, None).await.unwrap().len(), 1);
    third.close().await.unwrap();

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_table_creation_leaves_pending_work_alone() {
    let mut db = memory_db().await;

    insert_student(&mut db, "Pending", None).await;

    // Creates the quotes table while the insert is still uncommitted.
    assert_eq!(quote::Entity::get_many(&mut db, None).await.unwrap().len(), 0);
    assert!(db.in_transaction());

    db.rollback().await.unwrap();

    assert_eq!(student::Entity::get_many(&mut db, None).await.unwrap().len(), 0);
    assert_eq!(quote::Entity::get_many(&mut db, None).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_insert_and_read_back() {
    let mut db = memory_db().await;

    let id = insert_student(&mut db, "Pavlo", None).await;
    assert!(id > 0);

    let pavlo = student::Entity::get_one(&mut db, student::columns::Id::eq(id))
        .await
        .unwrap()
        .expect("Inserted row is missing");

    assert_eq!(
        pavlo.get::<student::columns::Name>(&mut db).await.unwrap(),
        "Pavlo"
    );
    assert_eq!(pavlo.get::<student::columns::Age>(&mut db).await.unwrap(), None);
    assert_eq!(
        pavlo.get_field(&mut db, "name").await.unwrap(),
        Value::Text("Pavlo".to_string())
    );
    assert_eq!(
        pavlo.get_field(&mut db, "id").await.unwrap(),
        Value::Integer(id)
    );
}

#[tokio::test]
async fn test_filter_by_age() {
    let mut db = memory_db().await;

    insert_student(&mut db, "Pavlo", None).await;
    insert_student(&mut db, "B", Some(19)).await;
    let a = insert_student(&mut db, "A", Some(52)).await;

    let older = student::Entity::get_many(&mut db, Some(student::columns::Age::gt(Some(20))))
        .await
        .unwrap();
    assert_eq!(older.len(), 1);

    let keys = older.map(|e| e.key().clone()).collect::<Vec<_>>();
    assert_eq!(keys, vec![Value::Integer(a)]);

    let everyone = student::Entity::get_many(&mut db, None).await.unwrap();
    assert_eq!(everyone.len(), 3);
}

#[tokio::test]
async fn test_get_one_without_match() {
    let mut db = memory_db().await;

    insert_student(&mut db, "Pavlo", None).await;

    let missing = student::Entity::get_one(
        &mut db,
        student::columns::Name::eq("NoSuchName".to_string()),
    )
    .await
    .unwrap();

    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_everything() {
    let mut db = memory_db().await;

    insert_student(&mut db, "Pavlo", None).await;
    insert_student(&mut db, "A", Some(52)).await;

    student::Entity::delete(&mut db, student::columns::Id::gt(0))
        .await
        .unwrap();

    assert_eq!(student::Entity::get_many(&mut db, None).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_duplicate_primary_key() {
    let mut db = memory_db().await;

    let id = insert_student(&mut db, "Pavlo", None).await;
    db.commit().await.unwrap();

    let pavlo = student::Entity::get_one(&mut db, student::columns::Id::eq(id))
        .await
        .unwrap()
        .unwrap();
    let duplicate = pavlo.load(&mut db).await.unwrap().into_active();

    let result = student::Entity::insert(&mut db, duplicate).await;
    assert!(matches!(result, Err(Error::InsertFailed(_))), "{result:?}");
    assert!(!db.in_transaction());

    let remaining = student::Entity::get_many(&mut db, None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        pavlo.get::<student::columns::Name>(&mut db).await.unwrap(),
        "Pavlo"
    );
}

#[tokio::test]
async fn test_rollback_discards_uncommitted_rows() {
    let mut db = memory_db().await;

    insert_student(&mut db, "Kept", None).await;
    db.commit().await.unwrap();

    insert_student(&mut db, "Dropped", None).await;
    db.rollback().await.unwrap();

    let names = student::Entity::get_many(&mut db, None).await.unwrap();
    assert_eq!(names.len(), 1);
}

#[tokio::test]
async fn test_update_fields() {
    let mut db = memory_db().await;

    let id = insert_student(&mut db, "Pavlo", None).await;
    let mut pavlo = student::Entity::get_one(&mut db, student::columns::Id::eq(id))
        .await
        .unwrap()
        .unwrap();

    pavlo
        .set::<student::columns::Age>(&mut db, Some(30))
        .await
        .unwrap();
    assert_eq!(
        pavlo.get::<student::columns::Age>(&mut db).await.unwrap(),
        Some(30)
    );

    pavlo.set_field(&mut db, "age", "31").await.unwrap();
    assert_eq!(
        pavlo.get::<student::columns::Age>(&mut db).await.unwrap(),
        Some(31)
    );

    pavlo.set_field(&mut db, "age", None::<i64>).await.unwrap();
    assert_eq!(
        pavlo.get::<student::columns::Age>(&mut db).await.unwrap(),
        None
    );

    pavlo
        .set::<student::columns::Id>(&mut db, id + 100)
        .await
        .unwrap();
    assert_eq!(pavlo.key(), &Value::Integer(id + 100));
    assert_eq!(
        pavlo.get::<student::columns::Name>(&mut db).await.unwrap(),
        "Pavlo"
    );

    // Text written to an integer key is stored, and kept, as an integer.
    pavlo.set_field(&mut db, "id", "200").await.unwrap();
    assert_eq!(pavlo.key(), &Value::Integer(200));
    assert_eq!(
        pavlo.get::<student::columns::Id>(&mut db).await.unwrap(),
        200
    );
    assert_eq!(
        pavlo.get::<student::columns::Name>(&mut db).await.unwrap(),
        "Pavlo"
    );
}

#[tokio::test]
async fn test_field_errors() {
    let mut db = memory_db().await;

    let id = insert_student(&mut db, "Pavlo", None).await;
    let mut pavlo = student::Entity::get_one(&mut db, student::columns::Id::eq(id))
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(
        pavlo.set_field(&mut db, "age", "abc").await,
        Err(Error::Sanitize { .. })
    ));
    assert!(matches!(
        pavlo.get_field(&mut db, "nope").await,
        Err(Error::UnknownColumn { .. })
    ));

    student::Entity::delete(&mut db, student::columns::Id::eq(id))
        .await
        .unwrap();

    assert!(matches!(
        pavlo.get::<student::columns::Name>(&mut db).await,
        Err(Error::RowNotFound { .. })
    ));
    assert!(matches!(
        pavlo.load(&mut db).await,
        Err(Error::RowNotFound { .. })
    ));
}

#[tokio::test]
async fn test_load_model() {
    let mut db = memory_db().await;

    let id = insert_student(&mut db, "A", Some(52)).await;
    let record = student::Entity::get_one(&mut db, student::columns::Id::eq(id))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        record.load(&mut db).await.unwrap(),
        student::Model {
            id,
            name: "A".to_string(),
            age: Some(52),
        }
    );
}

#[tokio::test]
async fn test_combined_filters() {
    let mut db = memory_db().await;

    insert_student(&mut db, "A", Some(52)).await;
    insert_student(&mut db, "B", Some(40)).await;
    let c = insert_student(&mut db, "C", None).await;

    let not_a = student::Entity::get_many(
        &mut db,
        Some(student::columns::Age::gt(Some(20)) & !student::columns::Name::eq("A".to_string())),
    )
    .await
    .unwrap();
    assert_eq!(not_a.len(), 1);

    let without_age = student::Entity::find()
        .filter(student::columns::Age::is_null())
        .filter(student::columns::Id::geq(1))
        .all(&mut db)
        .await
        .unwrap()
        .collect::<Vec<_>>();
    assert_eq!(without_age.len(), 1);
    assert_eq!(without_age[0].key(), &Value::Integer(c));

    let by_none = student::Entity::get_many(&mut db, Some(student::columns::Age::eq(None)))
        .await
        .unwrap()
        .map(|e| e.key().clone())
        .collect::<Vec<_>>();
    assert_eq!(by_none, vec![Value::Integer(c)]);

    let with_age = student::Entity::get_many(&mut db, Some(student::columns::Age::not_eq(None)))
        .await
        .unwrap();
    assert_eq!(with_age.len(), 2);

    let either = student::Entity::get_many(
        &mut db,
        Some(student::columns::Name::eq("A".to_string()) | student::columns::Age::is_null()),
    )
    .await
    .unwrap();
    assert_eq!(either.len(), 2);
}

#[tokio::test]
async fn test_quotes_round_trip() {
    let mut db = memory_db().await;

    let text = "It's 'quoted' -- isn't it?'; DROP TABLE \"quotes\"; --";

    let record = quote::Entity::insert(
        &mut db,
        quote::ActiveModel {
            slug: "o'brien".to_string().into(),
            text: text.to_string().into(),
            year: ActiveModelValue::Set(Some(1999)),
        },
    )
    .await
    .unwrap();

    assert_eq!(record.key(), &Value::Text("o'brien".to_string()));
    assert_eq!(record.get::<quote::columns::Text>(&mut db).await.unwrap(), text);

    let found = quote::Entity::get_one(&mut db, quote::columns::Text::eq(text.to_string()))
        .await
        .unwrap();
    assert_eq!(found, Some(record.clone()));

    assert_eq!(
        record.load(&mut db).await.unwrap(),
        quote::Model {
            slug: "o'brien".to_string(),
            text: text.to_string(),
            year: Some(1999),
        }
    );
}

#[tokio::test]
async fn test_insert_default_values() {
    let mut db = memory_db().await;

    let first = counter::Entity::insert(&mut db, counter::ActiveModel::default())
        .await
        .unwrap();
    let second = counter::Entity::insert(&mut db, counter::ActiveModel::default())
        .await
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(
        first.get::<counter::columns::Hits>(&mut db).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_missing_required_value() {
    let mut db = memory_db().await;

    // "name" is NOT NULL.
    let result = student::Entity::insert(&mut db, student::ActiveModel::default()).await;

    assert!(matches!(result, Err(Error::InsertFailed(_))), "{result:?}");
}
