//! Finexo Core Library
//!
//! Shared functionality for the Finexo personal finance tracker:
//! - Income and expense models with spending intent
//! - Calendar month periods with year rollover
//! - Monthly analytics: totals, breakdowns, health score, highlights
//! - Database access and migrations, scoped per user

pub mod db;
pub mod error;
pub mod models;
pub mod period;
pub mod summary;

pub use db::{AuditEntry, Database, SearchQuery};
pub use error::{Error, Result};
pub use models::{
    CategoryAmount, DailyFlow, Expense, ExpenseUpdate, HealthScoreDetails, Income, IncomeUpdate,
    Intent, IntentAmount, MonthlySummary, NewExpense, NewIncome, PeriodComparison, PeriodTotals,
    SearchFilter, TimelinePoint, TransactionKind, TransactionView,
};
pub use period::Period;
pub use summary::{compute_daily_breakdown, compute_monthly_summary, percentage_change};
