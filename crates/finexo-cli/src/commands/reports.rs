//! Report command implementations (summary, timeline, daily, search)

use anyhow::Result;
use chrono::Utc;
use finexo_core::db::Database;
use finexo_core::models::{MonthlySummary, SearchFilter, TransactionKind};
use finexo_core::period::Period;

use super::{period_filter, print_json, truncate};

pub fn cmd_summary(
    db: &Database,
    user_id: &str,
    month: Option<i64>,
    year: Option<i64>,
    json: bool,
) -> Result<()> {
    let period = Period::resolve(month, year, Utc::now().date_naive())?;
    let summary = db.get_monthly_summary(user_id, period)?;

    if json {
        return print_json(&summary);
    }

    print_summary(&summary, period);
    Ok(())
}

fn print_summary(summary: &MonthlySummary, period: Period) {
    println!();
    println!("📊 Monthly Summary for {}", period);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:   \x1b[32m${:>10.2}\x1b[0m", summary.total_income);
    println!("   Expenses: \x1b[31m${:>10.2}\x1b[0m", summary.total_expense);
    println!(
        "   Savings:  ${:>10.2} ({:.2}%)",
        summary.savings, summary.savings_percentage
    );

    match summary.health_score {
        Some(score) => {
            let details = &summary.health_score_details;
            println!();
            println!("   💪 Health score: {}/100", score);
            println!(
                "      savings {:.1} │ impulse {:.1} │ cash flow {:.1} │ impulse share {:.1}%",
                details.savings_score,
                details.impulse_score,
                details.cash_flow_score,
                details.impulse_percentage
            );
        }
        None => {
            println!();
            println!("   No records for this month yet.");
            return;
        }
    }

    if !summary.category_breakdown.is_empty() {
        println!();
        println!("   {:25} │ {:>10}", "Category", "Amount");
        println!("   ──────────────────────────┼────────────");
        for item in &summary.category_breakdown {
            println!("   {:25} │ {:>10.2}", truncate(&item.category, 25), item.amount);
        }
    }

    if !summary.intent_breakdown.is_empty() {
        println!();
        println!("   {:25} │ {:>10}", "Intent", "Amount");
        println!("   ──────────────────────────┼────────────");
        for item in &summary.intent_breakdown {
            println!("   {:25} │ {:>10.2}", item.intent.as_str(), item.amount);
        }
    }

    let comparison = &summary.comparison;
    println!();
    println!("   vs {}:", period.previous());
    println!(
        "      income {:+.1}% │ expenses {:+.1}% │ savings {:+.1}%",
        comparison.income_change_percentage,
        comparison.expense_change_percentage,
        comparison.savings_change_percentage
    );

    if !summary.highlights.is_empty() {
        println!();
        println!("   ✨ Highlights");
        for highlight in &summary.highlights {
            println!("      • {}", highlight);
        }
    }
}

pub fn cmd_timeline(db: &Database, user_id: &str, json: bool) -> Result<()> {
    let anchor = Period::containing(Utc::now().date_naive());
    let timeline = db.get_timeline(user_id, anchor)?;

    if json {
        return print_json(&timeline);
    }

    println!();
    println!("📈 Last {} months", timeline.len());
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:8} │ {:>10} │ {:>10} │ {:>10}", "Month", "Income", "Expenses", "Net");
    println!("   ─────────┼────────────┼────────────┼────────────");
    for point in &timeline {
        println!(
            "   {:8} │ {:>10.2} │ {:>10.2} │ {:>10.2}",
            point.date,
            point.income,
            point.expense,
            point.income - point.expense
        );
    }

    Ok(())
}

pub fn cmd_daily(db: &Database, user_id: &str, month: i64, year: i64, json: bool) -> Result<()> {
    let period = Period::normalized(month, year)?;
    let days = db.get_daily_breakdown(user_id, period)?;

    if json {
        return print_json(&days);
    }

    println!();
    println!("📅 Daily cash flow for {}", period);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:>3} │ {:>10} │ {:>10} │ {:>10}", "Day", "Income", "Expenses", "Balance");
    println!("   ────┼────────────┼────────────┼────────────");
    for day in days.iter().filter(|d| d.income != 0.0 || d.expense != 0.0) {
        println!(
            "   {:>3} │ {:>10.2} │ {:>10.2} │ {:>10.2}",
            day.day, day.income, day.expense, day.balance
        );
    }
    if let Some(last) = days.last() {
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Closing balance: ${:.2}", last.balance);
    }

    Ok(())
}

/// Raw search arguments as given on the command line
#[derive(Debug, Default)]
pub struct SearchArgs {
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub category: Option<String>,
    pub intent: Option<String>,
    pub query: Option<String>,
}

impl SearchArgs {
    pub fn into_filter(self) -> Result<SearchFilter> {
        let intent = match self.intent.as_deref() {
            Some(value) => SearchFilter::parse_intent(value)?,
            None => None,
        };
        Ok(SearchFilter {
            period: period_filter(self.month, self.year)?,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            category: self.category.filter(|c| !c.trim().is_empty()),
            intent,
            text: self.query.filter(|q| !q.trim().is_empty()),
        })
    }
}

pub fn cmd_search(db: &Database, user_id: &str, args: SearchArgs, json: bool) -> Result<usize> {
    let filter = args.into_filter()?;
    let results = db.search_transactions(user_id, &filter)?;

    if json {
        print_json(&results)?;
        return Ok(results.len());
    }

    if results.is_empty() {
        println!("No matching transactions.");
        return Ok(0);
    }

    println!();
    println!("🔍 {} matching transactions", results.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for tx in &results {
        let (amount_str, detail) = match tx.kind {
            TransactionKind::Income => (
                format!("\x1b[32m+{:.2}\x1b[0m", tx.amount),
                tx.source.clone().unwrap_or_default(),
            ),
            TransactionKind::Expense => (
                format!("\x1b[31m-{:.2}\x1b[0m", tx.amount),
                match (&tx.intent, &tx.note) {
                    (Some(intent), Some(note)) if !note.is_empty() => {
                        format!("{} · {}", intent, note)
                    }
                    (Some(intent), _) => intent.to_string(),
                    _ => String::new(),
                },
            ),
        };
        println!(
            "   {} │ {:>20} │ {:15} │ {}",
            tx.date,
            amount_str,
            truncate(&tx.category, 15),
            truncate(&detail, 40)
        );
    }

    Ok(results.len())
}
