use crate::db::connect;
use crate::{address, animal, animal_relation, feeding_schedule, medical_history, message, multimedia, newsletter, user};
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4())
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = unique_email("crud");
    let created = user::create(&db, "Ana", "Pop", &email, "0700000000").await?;
    assert_eq!(created.email, email);

    let found = user::find_by_email(&db, &email).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let by_id = user::find_by_id(&db, created.id).await?;
    assert!(by_id.is_some());

    let removed = user::hard_delete(&db, created.id).await?;
    assert_eq!(removed, 1);
    assert!(user::find_by_id(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_user_validation() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    assert!(user::create(&db, "Ana", "Pop", "not-an-email", "07").await.is_err());
    assert!(user::create(&db, "", "Pop", &unique_email("v"), "07").await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_animal_with_children() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let owner = user::create(&db, "Ion", "Ionescu", &unique_email("animal"), "0711").await?;
    let a = animal::create(&db, owner.id, "Rex", "Labrador", "Dog", 3, "male").await?;
    assert_eq!(a.views, 0);

    multimedia::create(&db, a.id, "photo", "/server/photo/rex.jpg", Some("image/jpeg".into()), None).await?;
    feeding_schedule::create(&db, a.id, &["08:00".to_string(), "18:00".to_string()], "kibble", None).await?;
    medical_history::create(&db, a.id, "VET-42", chrono::Utc::now().into(), Some("vaccinated".into()), false).await?;
    animal_relation::create(&db, a.id, "Cats").await?;

    assert_eq!(multimedia::find_by_animal(&db, a.id).await?.len(), 1);
    assert_eq!(feeding_schedule::find_by_animal(&db, a.id).await?.len(), 1);
    assert_eq!(medical_history::find_by_animal(&db, a.id).await?.len(), 1);
    assert_eq!(animal_relation::find_by_animal(&db, a.id).await?.len(), 1);

    animal::increment_views(&db, a.id).await?;
    animal::increment_views(&db, a.id).await?;
    let reread = animal::find_by_id(&db, a.id).await?.unwrap();
    assert_eq!(reread.views, 2);

    assert!(animal::exists(&db, a.id).await?);

    // cleanup (children first; FKs are NoAction on purpose)
    animal_relation::delete_by_animal(&db, a.id).await?;
    multimedia::delete_by_animal(&db, a.id).await?;
    feeding_schedule::delete_by_animal(&db, a.id).await?;
    medical_history::delete_by_animal(&db, a.id).await?;
    assert_eq!(animal::hard_delete(&db, a.id).await?, 1);
    assert!(!animal::exists(&db, a.id).await?);
    user::hard_delete(&db, owner.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_popular_breeds_by_species() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let owner = user::create(&db, "Maria", "Breeds", &unique_email("breeds"), "0722").await?;
    let species = format!("Species-{}", Uuid::new_v4());
    let a1 = animal::create(&db, owner.id, "A", "Corgi", &species, 1, "female").await?;
    let a2 = animal::create(&db, owner.id, "B", "Corgi", &species, 2, "male").await?;
    let a3 = animal::create(&db, owner.id, "C", "Husky", &species, 2, "male").await?;

    let breeds = animal::popular_breeds_by_species(&db, &species).await?;
    assert_eq!(breeds.len(), 2);
    assert_eq!(breeds[0].breed, "Corgi");
    assert_eq!(breeds[0].breed_count, 2);

    for id in [a1.id, a2.id, a3.id] {
        animal::hard_delete(&db, id).await?;
    }
    user::hard_delete(&db, owner.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_message_flow() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let alice = user::create(&db, "Alice", "A", &unique_email("alice"), "0731").await?;
    let bob = user::create(&db, "Bob", "B", &unique_email("bob"), "0732").await?;

    message::create(&db, alice.id, bob.id, "hi bob").await?;
    message::create(&db, bob.id, alice.id, "hi alice").await?;
    message::create(&db, alice.id, bob.id, "want to adopt Rex?").await?;

    let convo = message::conversation_between(&db, alice.id, bob.id).await?;
    assert_eq!(convo.len(), 3);
    assert_eq!(convo[0].content, "hi bob");

    // bob has two unread from alice
    assert_eq!(message::count_unread(&db, bob.id).await?, 2);
    let marked = message::mark_read(&db, bob.id, alice.id).await?;
    assert_eq!(marked, 2);
    assert_eq!(message::count_unread(&db, bob.id).await?, 0);

    // purge helper removes both directions
    let removed = message::delete_involving_user(&db, alice.id).await?;
    assert_eq!(removed, 3);

    user::hard_delete(&db, alice.id).await?;
    user::hard_delete(&db, bob.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_newsletter_upsert_is_idempotent() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let u = user::create(&db, "Nora", "News", &unique_email("news"), "0741").await?;

    newsletter::upsert_active(&db, u.id, "Dog").await?;
    newsletter::upsert_active(&db, u.id, "Dog").await?;
    newsletter::upsert_active(&db, u.id, "Cat").await?;

    let active = newsletter::active_by_user(&db, u.id).await?;
    assert_eq!(active.len(), 2);

    newsletter::deactivate_all(&db, u.id).await?;
    assert!(newsletter::active_by_user(&db, u.id).await?.is_empty());

    // reactivation flips the existing row instead of inserting a duplicate
    newsletter::upsert_active(&db, u.id, "Dog").await?;
    let active = newsletter::active_by_user(&db, u.id).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].species, "Dog");

    newsletter::delete_by_user(&db, u.id).await?;
    user::hard_delete(&db, u.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_address_lookup_and_delete() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let u = user::create(&db, "Dan", "Adr", &unique_email("addr"), "0751").await?;
    address::create(&db, u.id, "Main St 1", "Cluj", "CJ", "400000", "RO").await?;

    let found = address::find_by_user(&db, u.id).await?;
    assert_eq!(found.map(|a| a.city), Some("Cluj".to_string()));

    assert_eq!(address::delete_by_user(&db, u.id).await?, 1);
    user::hard_delete(&db, u.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_multimedia_type_is_checked() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let u = user::create(&db, "Eva", "M", &unique_email("mm"), "0761").await?;
    let a = animal::create(&db, u.id, "Pix", "Siamese", "Cat", 1, "female").await?;

    let err = multimedia::create(&db, a.id, "hologram", "/server/photo/x.jpg", None, None).await;
    assert!(err.is_err());

    animal::hard_delete(&db, a.id).await?;
    user::hard_delete(&db, u.id).await?;
    Ok(())
}
