use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::{info, log};

/// every connection to a in memory sqlite database opens a new empty database
fn is_in_memory_sqlite(db_url: &str) -> bool {
    db_url.starts_with("sqlite:") && db_url.contains(":memory:")
}

/// Builds the connection pool options for the database URL.
///
/// in memory sqlite databases (used by the tests) are kept on a single connection
/// that is never closed, otherwise the schema would be lost
pub fn connect_options(db_url: &str) -> ConnectOptions {
    let mut opt = ConnectOptions::new(db_url);

    if is_in_memory_sqlite(db_url) {
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        return opt;
    }

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    opt
}

pub async fn connect(db_url: &str) -> DatabaseConnection {
    info!("[DB] getting connection");
    Database::connect(connect_options(db_url))
        .await
        .unwrap_or_else(|e| panic!("[DB] failed to build connection pool: {}", e))
}

/// Apply all pending migrations
pub async fn run_migrations(db: &DatabaseConnection) {
    info!("[DB] running migrations");
    Migrator::up(db, None)
        .await
        .unwrap_or_else(|e| panic!("[DB] failed to run migrations: {}", e));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_in_memory_sqlite_is_detected() {
        assert!(is_in_memory_sqlite("sqlite::memory:"));
        assert!(is_in_memory_sqlite("sqlite://file::memory:?cache=shared"));
        assert!(!is_in_memory_sqlite("sqlite://diagnost.db"));
        assert!(!is_in_memory_sqlite("postgres://localhost/diagnost_dev"));
    }

    #[test]
    fn in_memory_sqlite_uses_a_single_connection() {
        let opt = connect_options("sqlite::memory:");

        assert_eq!(opt.get_max_connections(), Some(1));
        assert_eq!(opt.get_min_connections(), Some(1));
    }
}
