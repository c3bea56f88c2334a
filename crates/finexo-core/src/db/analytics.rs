//! Monthly analytics backed by the store

use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::models::{DailyFlow, MonthlySummary, PeriodTotals, TimelinePoint};
use crate::period::Period;
use crate::summary::{compute_daily_breakdown, compute_monthly_summary};

/// Number of months shown on the income/expense timeline
pub const TIMELINE_MONTHS: usize = 6;

impl Database {
    /// Income and expense totals for one month
    pub fn get_period_totals(&self, user_id: &str, period: Period) -> Result<PeriodTotals> {
        Ok(PeriodTotals {
            income: self.sum_incomes(user_id, period)?,
            expense: self.sum_expenses(user_id, period)?,
        })
    }

    /// Full monthly summary, compared against the previous month
    pub fn get_monthly_summary(&self, user_id: &str, period: Period) -> Result<MonthlySummary> {
        // Breakdown ties keep the order records were entered in
        let mut incomes = self.list_incomes(user_id, Some(period))?;
        incomes.sort_by_key(|i| i.id);
        let mut expenses = self.list_expenses(user_id, Some(period))?;
        expenses.sort_by_key(|e| e.id);
        let previous = self.get_period_totals(user_id, period.previous())?;

        debug!(
            user_id,
            period = %period,
            incomes = incomes.len(),
            expenses = expenses.len(),
            "Computing monthly summary"
        );

        Ok(compute_monthly_summary(period, &incomes, &expenses, previous))
    }

    /// Income and expense totals for the months ending at `anchor`, oldest first
    pub fn get_timeline(&self, user_id: &str, anchor: Period) -> Result<Vec<TimelinePoint>> {
        anchor
            .trailing(TIMELINE_MONTHS)
            .into_iter()
            .map(|period| {
                let totals = self.get_period_totals(user_id, period)?;
                Ok(TimelinePoint {
                    date: period.label(),
                    income: totals.income,
                    expense: totals.expense,
                })
            })
            .collect()
    }

    /// Day-by-day cash flow with running balance for one month
    pub fn get_daily_breakdown(&self, user_id: &str, period: Period) -> Result<Vec<DailyFlow>> {
        let incomes = self.list_incomes(user_id, Some(period))?;
        let expenses = self.list_expenses(user_id, Some(period))?;
        Ok(compute_daily_breakdown(period, &incomes, &expenses))
    }
}
