//! Queries over the `papers` table

use research_common::db::{CellValue, Record};
use research_common::Result;
use std::path::Path;

use super::{bind_cell, fetch_records};

/// Every paper whose `run_id` equals `run_id`, in table order
///
/// An unknown run and a run without papers both yield an empty list.
pub async fn papers_for_run(db_path: &Path, run_id: &CellValue) -> Result<Vec<Record>> {
    let query = bind_cell(sqlx::query("SELECT * FROM papers WHERE run_id = ?"), run_id);
    fetch_records(db_path, query).await
}
