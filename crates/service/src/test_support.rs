#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_with_config;
use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;

/// Fresh SQLite file per call so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let path = std::env::temp_dir()
        .join("task-service-tests")
        .join(uuid::Uuid::new_v4().to_string())
        .join("tasks.db");
    common::env::ensure_storage_dir(Some(&path)).await?;
    let cfg = DatabaseConfig {
        url: configs::sqlite_url_for_path(&path.to_string_lossy()),
        max_connections: 2,
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
