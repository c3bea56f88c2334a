//! Income operations

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Income, IncomeUpdate, NewIncome};
use crate::period::Period;

const INCOME_COLUMNS: &str = "id, user_id, amount, source, date, is_recurring, created_at";

pub(crate) const INCOME_NOT_FOUND: &str = "Income not found or unauthorized";

impl Database {
    /// Record an income for a user, returning its id
    pub fn create_income(&self, user_id: &str, income: &NewIncome) -> Result<i64> {
        income.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO incomes (user_id, amount, source, date, is_recurring)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                income.amount,
                income.source.trim(),
                income.date.to_string(),
                income.is_recurring,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(user_id, id, amount = income.amount, "Created income");
        Ok(id)
    }

    /// Get a single income owned by the user
    pub fn get_income(&self, user_id: &str, id: i64) -> Result<Option<Income>> {
        let conn = self.conn()?;
        let income = conn
            .query_row(
                &format!(
                    "SELECT {} FROM incomes WHERE id = ? AND user_id = ?",
                    INCOME_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_income,
            )
            .optional()?;
        Ok(income)
    }

    /// List a user's incomes, most recent first, optionally restricted to one month
    pub fn list_incomes(&self, user_id: &str, period: Option<Period>) -> Result<Vec<Income>> {
        let conn = self.conn()?;

        let incomes = match period {
            Some(period) => {
                let (start, end) = period.range();
                let mut stmt = conn.prepare(&format!(
                    r#"
                    SELECT {} FROM incomes
                    WHERE user_id = ? AND date BETWEEN ? AND ?
                    ORDER BY date DESC, created_at DESC, id DESC
                    "#,
                    INCOME_COLUMNS
                ))?;
                let rows = stmt.query_map(
                    params![user_id, start.to_string(), end.to_string()],
                    Self::row_to_income,
                )?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    r#"
                    SELECT {} FROM incomes
                    WHERE user_id = ?
                    ORDER BY date DESC, created_at DESC, id DESC
                    "#,
                    INCOME_COLUMNS
                ))?;
                let rows = stmt.query_map(params![user_id], Self::row_to_income)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(incomes)
    }

    /// Total income for a user in one month
    pub fn sum_incomes(&self, user_id: &str, period: Period) -> Result<f64> {
        let conn = self.conn()?;
        let (start, end) = period.range();
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM incomes WHERE user_id = ? AND date BETWEEN ? AND ?",
            params![user_id, start.to_string(), end.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Apply a partial update to an income owned by the user
    pub fn update_income(&self, user_id: &str, id: i64, update: &IncomeUpdate) -> Result<Income> {
        update.validate()?;
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE incomes SET
                amount = COALESCE(?, amount),
                source = COALESCE(?, source),
                date = COALESCE(?, date),
                is_recurring = COALESCE(?, is_recurring)
            WHERE id = ? AND user_id = ?
            "#,
            params![
                update.amount,
                update.source.as_deref().map(str::trim),
                update.date.map(|d| d.to_string()),
                update.is_recurring,
                id,
                user_id,
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(INCOME_NOT_FOUND.to_string()));
        }

        self.get_income(user_id, id)?
            .ok_or_else(|| Error::NotFound(INCOME_NOT_FOUND.to_string()))
    }

    /// Delete an income owned by the user
    pub fn delete_income(&self, user_id: &str, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM incomes WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(INCOME_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub(crate) fn row_to_income(row: &rusqlite::Row) -> rusqlite::Result<Income> {
        let date_str: String = row.get(4)?;
        let created_at_str: String = row.get(6)?;
        Ok(Income {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: row.get(2)?,
            source: row.get(3)?,
            date: parse_date(4, &date_str)?,
            is_recurring: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
