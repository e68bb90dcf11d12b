//! Database row model

pub mod record;

pub use record::{CellValue, Record};
