//! Income command implementations

use anyhow::{Context, Result};
use finexo_core::db::Database;
use finexo_core::models::NewIncome;
use tracing::info;

use super::{parse_date_arg, period_filter, print_json, truncate};

pub fn cmd_income_add(
    db: &Database,
    user_id: &str,
    amount: f64,
    source: &str,
    date: Option<&str>,
    recurring: bool,
) -> Result<i64> {
    let income = NewIncome {
        amount,
        source: source.to_string(),
        date: parse_date_arg(date)?,
        is_recurring: recurring,
    };

    let id = db
        .create_income(user_id, &income)
        .context("Failed to add income")?;
    db.log_audit(
        user_id,
        "create",
        Some("income"),
        Some(id),
        Some(&format!("amount={}, source={}", income.amount, income.source)),
    )?;
    info!(id, user_id, "Income recorded");

    println!(
        "✅ Income added (id {}): \x1b[32m+${:.2}\x1b[0m from {} on {}",
        id, income.amount, income.source, income.date
    );
    Ok(id)
}

pub fn cmd_income_list(
    db: &Database,
    user_id: &str,
    month: Option<i64>,
    year: Option<i64>,
    json: bool,
) -> Result<()> {
    let period = period_filter(month, year)?;
    let incomes = db.list_incomes(user_id, period)?;

    if json {
        return print_json(&incomes);
    }

    if incomes.is_empty() {
        println!("No incomes found. Record one with:");
        println!("  finexo income add --amount 3000 --source Salary");
        return Ok(());
    }

    println!();
    match period {
        Some(p) => println!("💰 Incomes for {}", p),
        None => println!("💰 Incomes"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    let mut total = 0.0;
    for income in &incomes {
        total += income.amount;
        println!(
            "   {:>5} │ {} │ \x1b[32m{:>10.2}\x1b[0m │ {}{}",
            income.id,
            income.date,
            income.amount,
            truncate(&income.source, 30),
            if income.is_recurring { " (recurring)" } else { "" }
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${:.2} across {} records", total, incomes.len());

    Ok(())
}

pub fn cmd_income_delete(db: &Database, user_id: &str, id: i64) -> Result<()> {
    db.delete_income(user_id, id)?;
    db.log_audit(user_id, "delete", Some("income"), Some(id), None)?;
    println!("🗑️  Income {} deleted", id);
    Ok(())
}
