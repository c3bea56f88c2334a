//! Unified income/expense search
//!
//! Incomes and expenses live in separate tables; a search is one
//! `UNION ALL` over both, with every filter pushed into the branch it
//! applies to so the row limit only ever counts matching rows.

use chrono::NaiveDate;
use tracing::debug;

use super::{parse_date, Database};
use crate::error::{Error, Result};
use crate::models::{Intent, SearchFilter, TransactionKind, TransactionView, INCOME_CATEGORY};

/// Maximum number of rows a search returns
pub const SEARCH_LIMIT: i64 = 100;

/// Builder for the search query over both record tables
///
/// The lifetime `'query` is how long the borrowed filter values
/// (user id, category, search text) must stay valid.
pub struct SearchQuery<'query> {
    pub user_id: &'query str,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub category: Option<&'query str>,
    pub intent: Option<Intent>,
    pub text: Option<&'query str>,
    limit: i64,
}

/// SQL and its bound parameters
pub struct SearchSql {
    pub sql: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl SearchSql {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

/// Which tables a category filter selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryScope<'query> {
    Everything,
    IncomesOnly,
    Expenses(&'query str),
}

impl<'query> SearchQuery<'query> {
    /// Create a new query builder for one user
    pub fn new(user_id: &'query str) -> Self {
        Self {
            user_id,
            date_range: None,
            min_amount: None,
            max_amount: None,
            category: None,
            intent: None,
            text: None,
            limit: SEARCH_LIMIT,
        }
    }

    /// Copy every field of a [`SearchFilter`] onto the builder
    pub fn from_filter(user_id: &'query str, filter: &'query SearchFilter) -> Self {
        Self::new(user_id)
            .date_range(filter.period.map(|p| p.range()))
            .min_amount(filter.min_amount)
            .max_amount(filter.max_amount)
            .category(filter.category.as_deref())
            .intent(filter.intent)
            .text(filter.text.as_deref())
    }

    /// Set date range filter (inclusive)
    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    pub fn min_amount(mut self, amount: Option<f64>) -> Self {
        self.min_amount = amount;
        self
    }

    pub fn max_amount(mut self, amount: Option<f64>) -> Self {
        self.max_amount = amount;
        self
    }

    /// Set category filter ("All" means none, "Income" selects incomes)
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// Set intent filter (expenses only)
    pub fn intent(mut self, intent: Option<Intent>) -> Self {
        self.intent = intent;
        self
    }

    /// Set free-text filter
    pub fn text(mut self, text: Option<&'query str>) -> Self {
        self.text = text;
        self
    }

    fn category_scope(&self) -> CategoryScope<'query> {
        match self.category.map(str::trim) {
            None | Some("") => CategoryScope::Everything,
            Some("All") => CategoryScope::Everything,
            Some(INCOME_CATEGORY) => CategoryScope::IncomesOnly,
            Some(c) => CategoryScope::Expenses(c),
        }
    }

    /// Conditions shared by both branches
    fn push_common(
        &self,
        conditions: &mut Vec<&'static str>,
        params: &mut Vec<Box<dyn rusqlite::ToSql>>,
    ) {
        conditions.push("user_id = ?");
        params.push(Box::new(self.user_id.to_string()));

        if let Some((from_date, to_date)) = self.date_range {
            conditions.push("date >= ? AND date <= ?");
            params.push(Box::new(from_date.to_string()));
            params.push(Box::new(to_date.to_string()));
        }
        if let Some(min) = self.min_amount {
            conditions.push("amount >= ?");
            params.push(Box::new(min));
        }
        if let Some(max) = self.max_amount {
            conditions.push("amount <= ?");
            params.push(Box::new(max));
        }
    }

    fn search_pattern(&self) -> Option<String> {
        self.text
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)))
    }

    /// Build the query, or `None` when the filters can match nothing
    pub fn build(self) -> Option<SearchSql> {
        let scope = self.category_scope();
        let include_incomes =
            self.intent.is_none() && !matches!(scope, CategoryScope::Expenses(_));
        let include_expenses = scope != CategoryScope::IncomesOnly;

        let mut branches = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if include_incomes {
            let mut conditions = Vec::new();
            self.push_common(&mut conditions, &mut params);
            if let Some(pattern) = self.search_pattern() {
                conditions.push("source LIKE ? ESCAPE '\\'");
                params.push(Box::new(pattern));
            }
            branches.push(format!(
                "SELECT 'income' AS kind, id, date, amount, '{}' AS category, source, \
                 NULL AS intent, NULL AS note, created_at FROM incomes WHERE {}",
                INCOME_CATEGORY,
                conditions.join(" AND ")
            ));
        }

        if include_expenses {
            let mut conditions = Vec::new();
            self.push_common(&mut conditions, &mut params);
            if let CategoryScope::Expenses(category) = scope {
                conditions.push("category = ?");
                params.push(Box::new(category.to_string()));
            }
            if let Some(intent) = self.intent {
                conditions.push("intent = ?");
                params.push(Box::new(intent.as_str()));
            }
            if let Some(pattern) = self.search_pattern() {
                conditions.push(
                    "(category LIKE ? ESCAPE '\\' OR note LIKE ? ESCAPE '\\' \
                     OR intent LIKE ? ESCAPE '\\')",
                );
                params.push(Box::new(pattern.clone()));
                params.push(Box::new(pattern.clone()));
                params.push(Box::new(pattern));
            }
            branches.push(format!(
                "SELECT 'expense' AS kind, id, date, amount, category, NULL AS source, \
                 intent, note, created_at FROM expenses WHERE {}",
                conditions.join(" AND ")
            ));
        }

        if branches.is_empty() {
            return None;
        }

        params.push(Box::new(self.limit));
        let sql = format!(
            "SELECT kind, id, date, amount, category, source, intent, note FROM ({}) \
             ORDER BY date DESC, created_at DESC, id DESC LIMIT ?",
            branches.join(" UNION ALL ")
        );

        Some(SearchSql { sql, params })
    }
}

/// Escape LIKE wildcards so the text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Database {
    /// Search a user's incomes and expenses together, most recent first
    pub fn search_transactions(
        &self,
        user_id: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<TransactionView>> {
        let Some(query) = SearchQuery::from_filter(user_id, filter).build() else {
            debug!(user_id, "Search filters exclude every record");
            return Ok(Vec::new());
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&query.sql)?;
        let rows = stmt.query_map(query.params_refs().as_slice(), Self::row_to_view)?;
        let results = rows.collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(user_id, count = results.len(), "Search complete");
        Ok(results)
    }

    fn row_to_view(row: &rusqlite::Row) -> rusqlite::Result<TransactionView> {
        let kind_str: String = row.get(0)?;
        let date_str: String = row.get(2)?;
        let intent_str: Option<String> = row.get(6)?;

        let conversion_error = |idx: usize, msg: String| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(Error::InvalidData(msg)),
            )
        };

        let kind: TransactionKind = kind_str.parse().map_err(|e| conversion_error(0, e))?;
        let intent = intent_str
            .map(|s| s.parse::<Intent>())
            .transpose()
            .map_err(|e| conversion_error(6, e))?;

        Ok(TransactionView {
            id: row.get(1)?,
            kind,
            date: parse_date(2, &date_str)?,
            amount: row.get(3)?,
            category: row.get(4)?,
            source: row.get(5)?,
            intent,
            note: row.get(7)?,
        })
    }
}
