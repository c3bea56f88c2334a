//! Domain models for Finexo

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::period::Period;

/// Why an expense was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Need,
    Want,
    Emergency,
    Impulse,
}

impl Intent {
    pub const ALL: [Intent; 4] = [Self::Need, Self::Want, Self::Emergency, Self::Impulse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Need => "need",
            Self::Want => "want",
            Self::Emergency => "emergency",
            Self::Impulse => "impulse",
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(Intent::as_str).collect();
                format!("Invalid intent. Must be one of {}", valid.join(","))
            })
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejection message for an update that changes nothing
pub const NO_FIELDS_TO_UPDATE: &str = "No fields to update";

fn validate_amount(amount: f64, allow_zero: bool) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 || (!allow_zero && amount == 0.0) {
        return Err(Error::InvalidData(format!(
            "Amount must be a {} number, got {}",
            if allow_zero { "non-negative" } else { "positive" },
            amount
        )));
    }
    Ok(())
}

fn validate_label(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidData(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// A recorded income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: i64,
    pub user_id: String,
    pub amount: f64,
    pub source: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an income
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub amount: f64,
    pub source: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
}

impl NewIncome {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount, false)?;
        validate_label("Source", &self.source)
    }
}

/// Partial update of an income; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeUpdate {
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
}

impl IncomeUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidData(NO_FIELDS_TO_UPDATE.to_string()));
        }
        if let Some(amount) = self.amount {
            validate_amount(amount, true)?;
        }
        if let Some(source) = &self.source {
            validate_label("Source", source)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.source.is_none()
            && self.date.is_none()
            && self.is_recurring.is_none()
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub intent: Intent,
    pub date: NaiveDate,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub intent: Intent,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

impl NewExpense {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount, false)?;
        validate_label("Category", &self.category)
    }
}

/// Partial update of an expense; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub intent: Option<Intent>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl ExpenseUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidData(NO_FIELDS_TO_UPDATE.to_string()));
        }
        if let Some(amount) = self.amount {
            validate_amount(amount, true)?;
        }
        if let Some(category) = &self.category {
            validate_label("Category", category)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.intent.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}

/// Income and expense totals for one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
}

impl PeriodTotals {
    pub fn savings(&self) -> f64 {
        self.income - self.expense
    }
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// Expense total for one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAmount {
    pub intent: Intent,
    pub amount: f64,
}

/// The three components of the health score, plus the impulse share they were derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreDetails {
    pub savings_score: f64,
    pub impulse_score: f64,
    pub cash_flow_score: f64,
    pub impulse_percentage: f64,
}

/// Month-over-month percentage changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub income_change_percentage: f64,
    pub expense_change_percentage: f64,
    pub savings_change_percentage: f64,
}

/// Analytics for one user and one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub total_income: f64,
    pub total_expense: f64,
    pub savings: f64,
    pub savings_percentage: f64,
    pub category_breakdown: Vec<CategoryAmount>,
    pub intent_breakdown: Vec<IntentAmount>,
    /// `None` when the month has no records at all
    pub health_score: Option<u32>,
    pub health_score_details: HealthScoreDetails,
    pub highlights: Vec<String>,
    pub comparison: PeriodComparison,
}

/// One month of the income/expense timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// "YYYY-MM"
    pub date: String,
    pub income: f64,
    pub expense: f64,
}

/// One day of a month's cash flow with the running balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub day: u32,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Income or expense, for unified transaction listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label used as the category of every income in unified listings
pub const INCOME_CATEGORY: &str = "Income";

/// A search hit: either an income or an expense flattened into one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub amount: f64,
    /// Expense category, or "Income" for incomes
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Filters for transaction search; every field is optional and they combine with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub period: Option<Period>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// "All" or empty means no filter, "Income" selects incomes only
    pub category: Option<String>,
    /// Restricts results to expenses with this intent
    pub intent: Option<Intent>,
    /// Case-insensitive substring over income source and expense category/note/intent
    pub text: Option<String>,
}

impl SearchFilter {
    /// Parse an intent filter value where "All" (or blank) means no filter
    pub fn parse_intent(value: &str) -> Result<Option<Intent>> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        value.parse().map(Some).map_err(Error::InvalidData)
    }
}
