use std::path::Path;

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Executor, Row, Statement, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::config::IfExists;
use crate::error::{Error, Result};
use crate::record::{RecordSet, Value};

/// Opens a single connection to the SQLite file at `db_path`.
async fn connect_sqlite(db_path: &Path, create: bool) -> Result<SqliteConnection> {
    info!("connecting to SQLite database {}", db_path.display());
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(create);
    SqliteConnection::connect_with(&options).await.map_err(|e| {
        Error::Query(format!(
            "cannot open SQLite database {}: {e}",
            db_path.display()
        ))
    })
}

/// Runs `query` against the database and collects every result row.
/// Column names come from the prepared statement, so they are known even
/// when no rows match.
pub async fn query(db_path: &Path, query: &str) -> Result<RecordSet> {
    let mut conn = connect_sqlite(db_path, false).await?;
    let result = fetch_record_set(&mut conn, query).await;
    if result.is_ok() {
        conn.close().await?;
    }
    result
}

async fn fetch_record_set(conn: &mut SqliteConnection, query: &str) -> Result<RecordSet> {
    info!("executing SQL query: {}", query);
    let statement = (&mut *conn).prepare(query).await?;
    let headers: Vec<String> = statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let rows = statement.query().fetch_all(&mut *conn).await?;
    if rows.is_empty() {
        debug!("query returned no rows");
    }

    let mut set = RecordSet::new(headers);
    for row in &rows {
        let values = (0..row.columns().len())
            .map(|i| decode_value(row, i))
            .collect::<Result<Vec<_>>>()?;
        set.push_row(values)?;
    }
    Ok(set)
}

/// Maps a cell by its runtime storage class.
fn decode_value(row: &SqliteRow, i: usize) -> Result<Value> {
    let raw = row.try_get_raw(i)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get_unchecked::<i64, _>(i)?),
        "REAL" | "NUMERIC" => Value::Real(row.try_get_unchecked::<f64, _>(i)?),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(i)?;
            Value::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::Text(row.try_get_unchecked::<String, _>(i)?),
    };
    Ok(value)
}

/// Writes `data` into `table`, creating the database file if needed.
/// The table policy and every insert run in one transaction.
pub async fn write_table(
    data: &RecordSet,
    db_path: &Path,
    table: &str,
    if_exists: IfExists,
) -> Result<()> {
    if data.columns().is_empty() {
        return Err(Error::Query(format!(
            "cannot create table '{table}' from data with no columns"
        )));
    }

    let mut conn = connect_sqlite(db_path, true).await?;
    let mut tx = conn.begin().await?;

    let exists = table_exists(&mut tx, table).await?;
    let create = create_table_sql(data, table);
    match (if_exists, exists) {
        (IfExists::Fail, true) => {
            return Err(Error::Query(format!("table '{table}' already exists")));
        }
        (IfExists::Replace, true) => {
            debug!("dropping existing table {}", table);
            sqlx::query(&format!("DROP TABLE {}", quote_ident(table)))
                .execute(&mut *tx)
                .await?;
            sqlx::query(&create).execute(&mut *tx).await?;
        }
        (_, false) => {
            sqlx::query(&create).execute(&mut *tx).await?;
        }
        (IfExists::Append, true) => {}
    }

    let insert = insert_sql(data, table);
    for row in data.rows() {
        let query = row.iter().fold(sqlx::query(&insert), bind_value);
        query.execute(&mut *tx).await?;
    }

    tx.commit().await?;
    conn.close().await?;
    info!("inserted {} rows into {}", data.len(), table);
    Ok(())
}

async fn table_exists(conn: &mut SqliteConnection, table: &str) -> Result<bool> {
    // sqlite identifiers are case-insensitive
    let found: Option<(i64,)> = sqlx::query_as(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE",
    )
    .bind(table)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Integer(i) => query.bind(*i),
        Value::Real(r) => query.bind(*r),
        Value::Text(s) => query.bind(s.as_str()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL type for a column, judged from its non-null values. A column with
/// no values at all is TEXT.
fn column_type(data: &RecordSet, idx: usize) -> &'static str {
    let mut seen = false;
    let mut all_integer = true;
    let mut all_numeric = true;
    for row in data.rows() {
        match &row[idx] {
            Value::Null => continue,
            Value::Bool(_) | Value::Integer(_) => {}
            Value::Real(_) => all_integer = false,
            Value::Text(_) => {
                all_integer = false;
                all_numeric = false;
            }
        }
        seen = true;
    }
    if !seen {
        "TEXT"
    } else if all_integer {
        "INTEGER"
    } else if all_numeric {
        "REAL"
    } else {
        "TEXT"
    }
}

fn create_table_sql(data: &RecordSet, table: &str) -> String {
    let columns = data
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} {}", quote_ident(c), column_type(data, i)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table), columns)
}

fn insert_sql(data: &RecordSet, table: &str) -> String {
    let columns = data
        .columns()
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let params = vec!["?"; data.columns().len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns,
        params
    )
}
