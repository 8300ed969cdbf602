// Shared test utilities for integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use fyyur_db::sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use fyyur_migration::{Migrator, MigratorTrait};

/// Fresh in-memory SQLite database with every migration applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    // sqlx already enables foreign keys for SQLite; the cascade tests depend on it
    db.execute_unprepared("PRAGMA foreign_keys = ON").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// The reference "now" the tests classify shows against.
pub fn now() -> NaiveDateTime {
    at(2026, 10, 19, 12, 0)
}
