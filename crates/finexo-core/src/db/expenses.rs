//! Expense operations

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseUpdate, Intent, NewExpense};
use crate::period::Period;

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, intent, date, note, created_at";

pub(crate) const EXPENSE_NOT_FOUND: &str = "Expense not found or unauthorized";

impl Database {
    /// Record an expense for a user, returning its id
    pub fn create_expense(&self, user_id: &str, expense: &NewExpense) -> Result<i64> {
        expense.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO expenses (user_id, amount, category, intent, date, note)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                expense.amount,
                expense.category.trim(),
                expense.intent.as_str(),
                expense.date.to_string(),
                expense.note,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(user_id, id, amount = expense.amount, intent = %expense.intent, "Created expense");
        Ok(id)
    }

    /// Get a single expense owned by the user
    pub fn get_expense(&self, user_id: &str, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                    EXPENSE_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// List a user's expenses, most recent first, optionally restricted to one month
    pub fn list_expenses(&self, user_id: &str, period: Option<Period>) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let expenses = match period {
            Some(period) => {
                let (start, end) = period.range();
                let mut stmt = conn.prepare(&format!(
                    r#"
                    SELECT {} FROM expenses
                    WHERE user_id = ? AND date BETWEEN ? AND ?
                    ORDER BY date DESC, created_at DESC, id DESC
                    "#,
                    EXPENSE_COLUMNS
                ))?;
                let rows = stmt.query_map(
                    params![user_id, start.to_string(), end.to_string()],
                    Self::row_to_expense,
                )?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    r#"
                    SELECT {} FROM expenses
                    WHERE user_id = ?
                    ORDER BY date DESC, created_at DESC, id DESC
                    "#,
                    EXPENSE_COLUMNS
                ))?;
                let rows = stmt.query_map(params![user_id], Self::row_to_expense)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(expenses)
    }

    /// Total expense for a user in one month
    pub fn sum_expenses(&self, user_id: &str, period: Period) -> Result<f64> {
        let conn = self.conn()?;
        let (start, end) = period.range();
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses WHERE user_id = ? AND date BETWEEN ? AND ?",
            params![user_id, start.to_string(), end.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Apply a partial update to an expense owned by the user
    pub fn update_expense(
        &self,
        user_id: &str,
        id: i64,
        update: &ExpenseUpdate,
    ) -> Result<Expense> {
        update.validate()?;
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE expenses SET
                amount = COALESCE(?, amount),
                category = COALESCE(?, category),
                intent = COALESCE(?, intent),
                date = COALESCE(?, date),
                note = COALESCE(?, note)
            WHERE id = ? AND user_id = ?
            "#,
            params![
                update.amount,
                update.category.as_deref().map(str::trim),
                update.intent.map(|i| i.as_str()),
                update.date.map(|d| d.to_string()),
                update.note,
                id,
                user_id,
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(EXPENSE_NOT_FOUND.to_string()));
        }

        self.get_expense(user_id, id)?
            .ok_or_else(|| Error::NotFound(EXPENSE_NOT_FOUND.to_string()))
    }

    /// Delete an expense owned by the user
    pub fn delete_expense(&self, user_id: &str, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(EXPENSE_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let intent_str: String = row.get(4)?;
        let date_str: String = row.get(5)?;
        let created_at_str: String = row.get(7)?;
        let intent: Intent = intent_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(Error::InvalidData(e)),
            )
        })?;
        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            intent,
            date: parse_date(5, &date_str)?,
            note: row.get(6)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
