//! # Batch Upsert Engine
//!
//! Applies an ordered batch of records to one table as a single atomic
//! unit: each record is an insert-or-update on the table's declared
//! uniqueness key, executed in input order on one transaction. If any
//! statement fails the whole batch is rolled back.
//!
//! Conflicting keys take the update branch and overwrite every mutable
//! column unconditionally (last write wins). Duplicate keys within one
//! batch are permitted and resolve left-to-right by statement order; the
//! engine does not deduplicate its input.

use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use super::error::{DbError, DbResult};
use super::Database;

/// Static description of an upsert target: the table, its insert columns,
/// the uniqueness key, and the mutable columns overwritten on conflict.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub key_columns: &'static [&'static str],
    pub update_columns: &'static [&'static str],
}

impl TableSpec {
    /// `INSERT ... ON CONFLICT(key) DO UPDATE SET col = excluded.col, ...`
    pub fn upsert_sql(&self) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        let updates = self
            .update_columns
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) DO UPDATE SET {}",
            self.table,
            self.columns.join(", "),
            placeholders,
            self.key_columns.join(", "),
            updates
        )
    }

    /// Plain `INSERT`, used by the single-record create path. A conflict on
    /// the uniqueness key is an error here, not an update.
    pub fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            placeholders
        )
    }
}

/// A positional SQL parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Text(s) => query.bind(s.as_str()),
        SqlValue::Integer(i) => query.bind(*i),
        SqlValue::Real(f) => query.bind(*f),
        SqlValue::Null => query.bind(Option::<&str>::None),
    }
}

impl Database {
    /// Apply `rows` to `spec`'s table atomically, in input order.
    ///
    /// An empty batch is rejected before any connection is acquired. The
    /// whole transaction runs under the statement timeout; on timeout the
    /// leased connection is released and the transaction rolls back when
    /// dropped. Returns the number of records applied.
    pub async fn upsert_batch(&self, spec: &TableSpec, rows: &[Vec<SqlValue>]) -> DbResult<usize> {
        if rows.is_empty() {
            return Err(DbError::EmptyBatch);
        }
        for row in rows {
            if row.len() != spec.columns.len() {
                return Err(DbError::Arity {
                    expected: spec.columns.len(),
                    got: row.len(),
                });
            }
        }

        let sql = spec.upsert_sql();
        let tx_work = async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| match DbError::from_sqlx(e) {
                    DbError::Query(m) => DbError::Tx(m),
                    other => other,
                })?;

            let mut failed: Option<sqlx::Error> = None;
            for row in rows {
                let mut query = sqlx::query(&sql);
                for value in row {
                    query = bind_value(query, value);
                }
                if let Err(e) = query.execute(&mut *tx).await {
                    failed = Some(e);
                    break;
                }
            }

            if let Some(e) = failed {
                // Abort the remaining records; nothing from this batch is kept
                tx.rollback().await.ok();
                return Err(DbError::Query(e.to_string()));
            }

            tx.commit()
                .await
                .map_err(|e| DbError::Tx(e.to_string()))?;
            Ok(rows.len())
        };

        match tokio::time::timeout(self.statement_timeout, tx_work).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout(self.statement_timeout)),
        }
    }

    /// Insert exactly one record; a uniqueness-key conflict is surfaced as
    /// `DbError::Duplicate` instead of overwriting. Returns the new row id.
    pub async fn insert_one(&self, spec: &TableSpec, row: &[SqlValue]) -> DbResult<i64> {
        if row.len() != spec.columns.len() {
            return Err(DbError::Arity {
                expected: spec.columns.len(),
                got: row.len(),
            });
        }

        let sql = spec.insert_sql();
        let mut query = sqlx::query(&sql);
        for value in row {
            query = bind_value(query, value);
        }

        let result = self.with_timeout(query.execute(&self.pool)).await?;
        Ok(result.last_insert_rowid())
    }
}
