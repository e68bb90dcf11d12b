//! # Research Common Library
//!
//! Shared code for the research results services:
//! - Error and result types
//! - Configuration resolution (CLI, environment, TOML, defaults)
//! - Dynamic row model for schema-less SQLite results

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
