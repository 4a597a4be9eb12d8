// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The D1 gateway: `query`/`execute`/`batch`/`dump` against a per-namespace
//! SQLite connection (spec.md §4.5 "D1").

use crate::entry::{QueryMeta, Statement, StatementResult};
use crate::error::D1Error;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool, TypeInfo};
use std::time::Instant;

pub struct D1Gateway {
    pool: SqlitePool,
    path: Option<std::path::PathBuf>,
}

impl D1Gateway {
    pub fn new(pool: SqlitePool, path: Option<std::path::PathBuf>) -> Self {
        Self { pool, path }
    }

    /// Run one statement, returning whatever rows it produces. Unlike
    /// [`Self::execute`], this accepts `SELECT`/`PRAGMA`/`RETURNING`
    /// statements.
    pub async fn query(&self, statement: &Statement) -> Result<StatementResult, D1Error> {
        self.run(statement).await
    }

    /// Run one statement, rejecting anything that would return rows
    /// (spec.md §4.5 "`execute` rejects row-returning statements").
    pub async fn execute(&self, statement: &Statement) -> Result<StatementResult, D1Error> {
        if is_row_returning(&statement.sql) {
            return Err(D1Error::RowReturningStatement);
        }
        self.run(statement).await
    }

    /// Run a sequence of statements inside one transaction, rolling back on
    /// the first failure and returning the results gathered before it
    /// (spec.md §4.5 "rolls back on the first failure, returning the
    /// partial results gathered before the failure").
    pub async fn batch(
        &self,
        statements: &[Statement],
    ) -> (Vec<StatementResult>, Option<D1Error>) {
        let mut results = Vec::with_capacity(statements.len());
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(err) => return (results, Some(D1Error::Sql(err))),
        };

        for (index, statement) in statements.iter().enumerate() {
            let started = Instant::now();
            let query = match bind(&statement.sql, &statement.params) {
                Ok(q) => q,
                Err(err) => {
                    let _ = tx.rollback().await;
                    return (results, Some(err));
                }
            };

            if is_row_returning(&statement.sql) {
                match query.fetch_all(&mut *tx).await {
                    Ok(rows) => {
                        let meta = QueryMeta {
                            duration: started.elapsed().as_secs_f64() * 1000.0,
                            changes: 0,
                            last_row_id: 0,
                            rows_read: rows.len() as u64,
                            rows_written: 0,
                        };
                        let row_objects = rows.iter().map(row_to_object).collect();
                        results.push(StatementResult { results: row_objects, success: true, meta });
                    }
                    Err(source) => {
                        let _ = tx.rollback().await;
                        return (results, Some(D1Error::BatchFailed { index, source }));
                    }
                }
            } else {
                match query.execute(&mut *tx).await {
                    Ok(outcome) => {
                        let meta = QueryMeta {
                            duration: started.elapsed().as_secs_f64() * 1000.0,
                            changes: outcome.rows_affected(),
                            last_row_id: outcome.last_insert_rowid(),
                            rows_read: 0,
                            rows_written: outcome.rows_affected(),
                        };
                        results.push(StatementResult { results: Vec::new(), success: true, meta });
                    }
                    Err(source) => {
                        let _ = tx.rollback().await;
                        return (results, Some(D1Error::BatchFailed { index, source }));
                    }
                }
            }
        }

        if let Err(err) = tx.commit().await {
            return (results, Some(D1Error::Sql(err)));
        }
        (results, None)
    }

    /// Stream the full SQLite file backing this namespace, for
    /// `dump` (spec.md §4.5 "streams the full SQLite file as a binary
    /// blob response"). `None` for the in-memory variant, which has no
    /// file to stream.
    pub async fn dump(&self) -> Result<Option<Vec<u8>>, D1Error> {
        match &self.path {
            Some(path) => Ok(Some(tokio::fs::read(path).await?)),
            None => Ok(None),
        }
    }

    async fn run(&self, statement: &Statement) -> Result<StatementResult, D1Error> {
        let started = Instant::now();
        if is_row_returning(&statement.sql) {
            let query = bind(&statement.sql, &statement.params)?;
            let rows = query.fetch_all(&self.pool).await?;
            let meta = QueryMeta {
                duration: started.elapsed().as_secs_f64() * 1000.0,
                changes: 0,
                last_row_id: 0,
                rows_read: rows.len() as u64,
                rows_written: 0,
            };
            let row_objects = rows.iter().map(row_to_object).collect();
            return Ok(StatementResult { results: row_objects, success: true, meta });
        }
        let query = bind(&statement.sql, &statement.params)?;
        let outcome = query.execute(&self.pool).await?;
        let meta = QueryMeta {
            duration: started.elapsed().as_secs_f64() * 1000.0,
            changes: outcome.rows_affected(),
            last_row_id: outcome.last_insert_rowid(),
            rows_read: 0,
            rows_written: outcome.rows_affected(),
        };
        Ok(StatementResult { results: Vec::new(), success: true, meta })
    }
}

fn is_row_returning(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    let first_word: String = trimmed
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();
    matches!(first_word.as_str(), "SELECT" | "PRAGMA" | "EXPLAIN")
        || trimmed.to_ascii_uppercase().contains("RETURNING")
}

fn bind<'q>(
    sql: &'q str,
    params: &'q [Value],
) -> Result<sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>, D1Error> {
    let mut query = sqlx::query(sql);
    for (index, param) in params.iter().enumerate() {
        query = match param {
            Value::Null => query.bind(None::<i64>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) if n.is_i64() => query.bind(n.as_i64()),
            Value::Number(n) if n.is_u64() => query.bind(n.as_u64().map(|v| v as i64)),
            Value::Number(n) => query.bind(n.as_f64()),
            Value::String(s) => query.bind(s.clone()),
            Value::Array(_) | Value::Object(_) => return Err(D1Error::UnsupportedParam(index)),
        };
    }
    Ok(query)
}

/// Convert one row into a JSON object, decoding each column by its declared
/// SQLite type affinity.
fn row_to_object(row: &SqliteRow) -> Map<String, Value> {
    let mut object = Map::new();
    for column in row.columns() {
        let name = column.name().to_string();
        let value = decode_column(row, column.ordinal(), column.type_info().name());
        object.insert(name, value);
    }
    object
}

fn decode_column(row: &SqliteRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<i64, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "REAL" => row.try_get::<f64, _>(index).ok().and_then(|v| {
            serde_json::Number::from_f64(v).map(Value::Number)
        }).unwrap_or(Value::Null),
        "TEXT" => row.try_get::<String, _>(index).map(Value::from).unwrap_or(Value::Null),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(|bytes| Value::String(base64_encode(&bytes)))
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<String, _>(index)
            .map(Value::from)
            .or_else(|_| row.try_get::<i64, _>(index).map(Value::from))
            .unwrap_or(Value::Null),
    }
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD.encode(bytes)
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
