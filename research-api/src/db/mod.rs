//! Database access layer for research-api
//!
//! Every query opens its own read-only connection and closes it before
//! returning, whether the query succeeded or not.

use research_common::db::{CellValue, Record};
use research_common::{Error, Result};
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions};
use sqlx::query::Query;
use sqlx::{Connection, Sqlite, SqliteConnection};
use std::path::Path;
use tracing::{debug, warn};

mod papers;
mod runs;

pub use papers::papers_for_run;
pub use runs::{latest_run_id, list_runs};

/// Message returned when the database file is absent
pub const NO_DATABASE: &str = "No database found";

/// Open a read-only connection to the results database
///
/// Fails with `NotFound` if the file does not exist. `mode=ro` keeps SQLite
/// from creating an empty database in its place.
pub async fn connect_readonly(db_path: &Path) -> Result<SqliteConnection> {
    if !db_path.is_file() {
        return Err(Error::NotFound(NO_DATABASE.to_string()));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true);

    let conn = SqliteConnection::connect_with(&options).await?;
    debug!("Opened read-only connection to {}", db_path.display());
    Ok(conn)
}

/// Close a connection, logging rather than failing on close errors
async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection: {}", e);
    }
}

/// Run a statement on a fresh connection and decode every row
async fn fetch_records<'q>(
    db_path: &Path,
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
) -> Result<Vec<Record>> {
    let mut conn = connect_readonly(db_path).await?;
    let rows = query.fetch_all(&mut conn).await;
    release(conn).await;

    Ok(rows?.iter().map(Record::from_row).collect())
}

/// Bind a dynamic scalar as a query parameter
fn bind_cell<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q CellValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        CellValue::Null => query.bind(None::<String>),
        CellValue::Integer(v) => query.bind(*v),
        CellValue::Real(v) => query.bind(*v),
        CellValue::Text(s) => query.bind(s.as_str()),
    }
}
