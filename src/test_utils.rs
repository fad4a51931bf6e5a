use actix_web::HttpResponse;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::auth::password::hash_password;
use crate::config::Config;
use crate::db;
use crate::utils::uploads::FileStore;

/// Fresh in-memory database with the full schema and no seed rows.
/// A single connection keeps every query inside the same memory instance.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::create_schema(&pool).await.unwrap();
    pool
}

pub async fn insert_employee(pool: &SqlitePool, username: &str, password: &str) -> i64 {
    let done = sqlx::query(
        "INSERT INTO employees (full_name, username, password_hash, email) VALUES (?, ?, ?, ?)",
    )
    .bind(format!("{username} Example"))
    .bind(username)
    .bind(hash_password(password))
    .bind(format!("{username}@example.com"))
    .execute(pool)
    .await
    .unwrap();
    done.last_insert_rowid()
}

pub fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        uploads_dir: "uploads".to_string(),
        admin_username: "psychy".to_string(),
        admin_password: "Scambanenabler".to_string(),
        rate_login_per_min: 60,
        rate_api_per_min: 1000,
        api_prefix: "/api".to_string(),
    }
}

pub async fn body_json(resp: HttpResponse) -> serde_json::Value {
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// File store rooted in a fresh temp directory. Keep the `TempDir` alive for
/// the duration of the test, dropping it deletes the tree.
pub fn temp_store() -> (FileStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    (FileStore::new(dir.path()), dir)
}
