//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - Argument helpers shared by the record and report commands

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use finexo_core::db::Database;
use finexo_core::period::Period;

/// Open (creating if needed) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record income: finexo income add --amount 3000 --source Salary");
    println!("  2. Record spending: finexo expense add --amount 40 --category Food --intent need");
    println!("  3. Start web UI: finexo serve");

    Ok(())
}

/// Parse a YYYY-MM-DD date, defaulting to today (UTC)
pub fn parse_date_arg(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", value)),
        None => Ok(Utc::now().date_naive()),
    }
}

/// A month filter, present only when both month and year are given
pub fn period_filter(month: Option<i64>, year: Option<i64>) -> Result<Option<Period>> {
    match (month, year) {
        (Some(month), Some(year)) => Ok(Some(Period::normalized(month, year)?)),
        _ => Ok(None),
    }
}
