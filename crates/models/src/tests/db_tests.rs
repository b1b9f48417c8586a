use crate::db::connect;
use anyhow::Result;
use migration::MigratorTrait;

/// Connectivity + schema smoke test
#[tokio::test]
async fn test_connect_and_migrate() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;

    // ping the connection
    assert!(db.ping().await.is_ok());
    Ok(())
}

#[tokio::test]
async fn test_connect_with_config_pool_settings() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let mut cfg = configs::DatabaseConfig::default();
    cfg.url = crate::db::DATABASE_URL.clone();
    cfg.max_connections = 5;
    cfg.min_connections = 1;
    cfg.connect_timeout_secs = 10;
    cfg.idle_timeout_secs = 60;
    cfg.acquire_timeout_secs = 10;

    let db = crate::db::connect_with_config(&cfg).await?;
    assert!(db.ping().await.is_ok());
    Ok(())
}
