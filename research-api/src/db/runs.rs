//! Queries over the `runs` table

use research_common::db::{CellValue, Record};
use research_common::Result;
use std::path::Path;

use super::{connect_readonly, fetch_records, release};

/// All runs, newest first
pub async fn list_runs(db_path: &Path) -> Result<Vec<Record>> {
    fetch_records(db_path, sqlx::query("SELECT * FROM runs ORDER BY timestamp DESC")).await
}

/// `run_id` of the run with the greatest timestamp
///
/// Ties go to whichever row the descending sort yields first.
/// Returns `Ok(None)` when the table is empty or the newest run has a NULL id.
pub async fn latest_run_id(db_path: &Path) -> Result<Option<CellValue>> {
    let mut conn = connect_readonly(db_path).await?;
    let row = sqlx::query("SELECT run_id FROM runs ORDER BY timestamp DESC LIMIT 1")
        .fetch_optional(&mut conn)
        .await;
    release(conn).await;

    Ok(row?
        .and_then(|row| Record::from_row(&row).get("run_id").cloned())
        .filter(|run_id| *run_id != CellValue::Null))
}
