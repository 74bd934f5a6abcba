//! # Persistence Layer
//!
//! Wraps the connection pool and owns transaction lifetimes. The handle is
//! created once at startup, injected into handler state, and closed at
//! shutdown; there is no ambient module-level pool.
//!
//! Concurrency contract: each transaction exclusively owns one leased
//! connection; leases are bounded by `max_connections`; acquisition and
//! statement execution are the only suspension points and both carry
//! timeouts that surface as errors without leaking the connection.

pub mod error;
pub mod upsert;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::Config;
pub use error::{DbError, DbResult};
pub use upsert::{SqlValue, TableSpec};

/// Handle to the database pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    statement_timeout: Duration,
}

impl Database {
    /// Open the pool described by the config. Creates the database file if
    /// it does not exist.
    pub async fn connect(config: &Config) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(DbError::from_sqlx)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.acquire_timeout())
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(DbError::from_sqlx)?;

        Ok(Self {
            pool,
            statement_timeout: config.statement_timeout(),
        })
    }

    /// The underlying pool, for building queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Statement / batch-transaction timeout
    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }

    /// Run a single query future under the statement timeout, classifying
    /// driver errors into the persistence taxonomy.
    pub async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> DbResult<T> {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result.map_err(DbError::from_sqlx),
            Err(_) => Err(DbError::Timeout(self.statement_timeout)),
        }
    }

    /// Close the pool, waiting for leased connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Bootstrap the schema. Every statement is idempotent so this runs on
    /// every startup.
    pub async fn migrate(&self) -> DbResult<()> {
        let ddl = [
            "CREATE TABLE IF NOT EXISTS users(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'staff'
            )",
            "CREATE TABLE IF NOT EXISTS staff(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                department TEXT,
                profile_picture_url TEXT
            )",
            "CREATE TABLE IF NOT EXISTS students(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reg_no TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                year TEXT NOT NULL,
                section TEXT NOT NULL,
                department TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS marks(
                reg_no TEXT PRIMARY KEY,
                student_name TEXT NOT NULL,
                year TEXT NOT NULL,
                section TEXT NOT NULL,
                department TEXT NOT NULL,
                test1 REAL NOT NULL,
                test2 REAL NOT NULL,
                test3 REAL NOT NULL,
                total REAL NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS attendance(
                reg_no TEXT NOT NULL,
                date TEXT NOT NULL,
                period INTEGER NOT NULL,
                staff_id INTEGER NOT NULL,
                status TEXT NOT NULL CHECK(status IN ('Present', 'Absent', 'On Duty')),
                reason TEXT,
                UNIQUE(reg_no, date, period)
            )",
            "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date)",
            "CREATE TABLE IF NOT EXISTS timetables(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                staff_id INTEGER NOT NULL,
                day_of_week TEXT NOT NULL,
                period_number INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                subject TEXT NOT NULL,
                year TEXT NOT NULL,
                section TEXT NOT NULL,
                department TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_timetables_staff ON timetables(staff_id)",
            "CREATE INDEX IF NOT EXISTS idx_timetables_staff_day ON timetables(staff_id, day_of_week)",
        ];

        for statement in ddl {
            self.with_timeout(sqlx::query(statement).execute(&self.pool))
                .await?;
        }
        Ok(())
    }
}
