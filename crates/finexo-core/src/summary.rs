//! Monthly analytics engine
//!
//! Pure functions over already-fetched records. The database layer gathers
//! a month's incomes and expenses plus the previous month's totals and hands
//! them to [`compute_monthly_summary`].

use std::collections::HashMap;
use std::hash::Hash;

use chrono::Datelike;
use tracing::debug;

use crate::models::{
    CategoryAmount, DailyFlow, Expense, HealthScoreDetails, Income, Intent, IntentAmount,
    MonthlySummary, PeriodComparison, PeriodTotals,
};
use crate::period::Period;

/// Savings component cap (savings rate × 2, up to this)
const MAX_SAVINGS_SCORE: f64 = 40.0;
/// Impulse component starts here and drops 2 points per impulse percent
const MAX_IMPULSE_SCORE: f64 = 40.0;
/// Awarded when income strictly exceeds expense
const CASH_FLOW_SCORE: f64 = 20.0;

const IMPULSE_WARNING_PCT: f64 = 25.0;
const LOW_SAVINGS_PCT: f64 = 5.0;
const GOOD_SAVINGS_PCT: f64 = 20.0;
const EXCELLENT_SCORE: u32 = 80;

/// Round to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Percentage change from `previous` to `current`
///
/// A zero baseline reports 0 when nothing changed and 100 otherwise.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Sum amounts per key, keeping keys in first-seen order
fn group_amounts<'a, K, T: 'a>(
    records: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> K,
    amount: impl Fn(&T) -> f64,
) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, f64)> = Vec::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1 += amount(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, amount(record)));
            }
        }
    }

    // Stable sort: equal totals stay in first-seen order
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups
}

/// Compute the monthly summary for one period
///
/// `incomes` and `expenses` must already be restricted to `period`;
/// `previous` holds the totals of the month before it.
pub fn compute_monthly_summary(
    period: Period,
    incomes: &[Income],
    expenses: &[Expense],
    previous: PeriodTotals,
) -> MonthlySummary {
    let total_income: f64 = incomes.iter().map(|i| i.amount).sum();
    let total_expense: f64 = expenses.iter().map(|e| e.amount).sum();
    let savings = total_income - total_expense;
    let savings_percentage = if total_income > 0.0 {
        savings / total_income * 100.0
    } else {
        0.0
    };

    let category_breakdown: Vec<CategoryAmount> =
        group_amounts(expenses, |e: &Expense| e.category.clone(), |e| e.amount)
            .into_iter()
            .map(|(category, amount)| CategoryAmount { category, amount })
            .collect();

    let intent_breakdown: Vec<IntentAmount> =
        group_amounts(expenses, |e: &Expense| e.intent, |e| e.amount)
            .into_iter()
            .map(|(intent, amount)| IntentAmount { intent, amount })
            .collect();

    let total_impulse: f64 = expenses
        .iter()
        .filter(|e| e.intent == Intent::Impulse)
        .map(|e| e.amount)
        .sum();

    // Health score components
    let savings_score = if total_income > 0.0 {
        (savings_percentage * 2.0).clamp(0.0, MAX_SAVINGS_SCORE)
    } else {
        0.0
    };
    let impulse_percentage = if total_expense > 0.0 {
        total_impulse / total_expense * 100.0
    } else {
        0.0
    };
    let impulse_score = (MAX_IMPULSE_SCORE - impulse_percentage * 2.0).max(0.0);
    let cash_flow_score = if total_income > total_expense {
        CASH_FLOW_SCORE
    } else {
        0.0
    };

    let no_data = total_income == 0.0 && total_expense == 0.0;
    let health_score = if no_data {
        None
    } else {
        Some((savings_score + impulse_score + cash_flow_score).round() as u32)
    };

    debug!(
        period = %period,
        savings_score,
        impulse_score,
        cash_flow_score,
        ?health_score,
        "Computed health score"
    );

    let mut highlights = Vec::new();

    if total_expense > total_income && total_income > 0.0 {
        highlights.push(format!(
            "Warning: Expenses exceed Income by ${:.2}",
            total_expense - total_income
        ));
    }

    if impulse_percentage > IMPULSE_WARNING_PCT {
        highlights.push(format!(
            "Be careful! {:.1}% of spending was on Impulse items.",
            impulse_percentage
        ));
    }

    if savings_percentage < LOW_SAVINGS_PCT && total_income > 0.0 {
        highlights.push(
            "Savings rate is critically low (< 5%). Try to cut non-essential costs.".to_string(),
        );
    }

    if savings_percentage >= GOOD_SAVINGS_PCT {
        highlights.push(format!(
            "Great job! You saved {:.1}% of your income this month.",
            savings_percentage
        ));
    }

    if impulse_percentage == 0.0 && total_expense > 0.0 {
        highlights.push("Outstanding control! No impulse spending recorded this month.".to_string());
    }

    if matches!(health_score, Some(score) if score >= EXCELLENT_SCORE) {
        highlights.push("Your Financial Health Score is excellent! Keep it up.".to_string());
    }

    if let Some(top) = category_breakdown.first() {
        highlights.push(format!(
            "Highest spending category: {} (${:.2})",
            top.category, top.amount
        ));
    }

    let comparison = PeriodComparison {
        income_change_percentage: round_to(percentage_change(total_income, previous.income), 1),
        expense_change_percentage: round_to(percentage_change(total_expense, previous.expense), 1),
        savings_change_percentage: round_to(percentage_change(savings, previous.savings()), 1),
    };

    MonthlySummary {
        month: period.month(),
        year: period.year(),
        total_income,
        total_expense,
        savings,
        savings_percentage: round_to(savings_percentage, 2),
        category_breakdown,
        intent_breakdown,
        health_score,
        health_score_details: HealthScoreDetails {
            savings_score: round_to(savings_score, 1),
            impulse_score: round_to(impulse_score, 1),
            cash_flow_score,
            impulse_percentage: round_to(impulse_percentage, 1),
        },
        highlights,
        comparison,
    }
}

/// Per-day income, expense and running balance for every day of `period`
///
/// Records dated outside the period are ignored.
pub fn compute_daily_breakdown(
    period: Period,
    incomes: &[Income],
    expenses: &[Expense],
) -> Vec<DailyFlow> {
    let mut days: Vec<DailyFlow> = (1..=period.days_in_month())
        .map(|day| DailyFlow {
            day,
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        })
        .collect();

    for income in incomes.iter().filter(|i| period.contains(i.date)) {
        days[income.date.day0() as usize].income += income.amount;
    }
    for expense in expenses.iter().filter(|e| period.contains(e.date)) {
        days[expense.date.day0() as usize].expense += expense.amount;
    }

    let mut balance = 0.0;
    for day in &mut days {
        balance += day.income - day.expense;
        day.balance = balance;
    }

    days
}
