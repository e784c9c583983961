#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use rota::AppServices;

/// In-memory database with the production schema applied. One connection
/// only: a second pooled connection would open a fresh in-memory database
/// without the migrated schema.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create memory pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn setup_test_services() -> (SqlitePool, AppServices) {
    let pool = setup_test_db().await;
    let services = AppServices::new(pool.clone());
    (pool, services)
}

pub async fn seed_ministry(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO ministries (name, color) VALUES (?, '#336699')")
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to seed ministry")
        .last_insert_rowid()
}

pub async fn seed_volunteer(pool: &SqlitePool, name: &str) -> i64 {
    seed_user(pool, name, "VOLUNTEER", "ACTIVE").await
}

pub async fn seed_user(pool: &SqlitePool, name: &str, role: &str, status: &str) -> i64 {
    sqlx::query("INSERT INTO users (name, email, role, status) VALUES (?, ?, ?, ?)")
        .bind(name)
        .bind(format!("{name}@example.com"))
        .bind(role)
        .bind(status)
        .execute(pool)
        .await
        .expect("Failed to seed user")
        .last_insert_rowid()
}
