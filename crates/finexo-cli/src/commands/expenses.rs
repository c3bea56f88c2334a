//! Expense command implementations

use anyhow::{anyhow, Context, Result};
use finexo_core::db::Database;
use finexo_core::models::{Intent, NewExpense};
use tracing::info;

use super::{parse_date_arg, period_filter, print_json, truncate};

pub fn cmd_expense_add(
    db: &Database,
    user_id: &str,
    amount: f64,
    category: &str,
    intent: &str,
    date: Option<&str>,
    note: &str,
) -> Result<i64> {
    let intent: Intent = intent.parse().map_err(|e: String| anyhow!(e))?;
    let expense = NewExpense {
        amount,
        category: category.to_string(),
        intent,
        date: parse_date_arg(date)?,
        note: note.to_string(),
    };

    let id = db
        .create_expense(user_id, &expense)
        .context("Failed to add expense")?;
    db.log_audit(
        user_id,
        "create",
        Some("expense"),
        Some(id),
        Some(&format!(
            "amount={}, category={}, intent={}",
            expense.amount, expense.category, expense.intent
        )),
    )?;
    info!(id, user_id, "Expense recorded");

    println!(
        "✅ Expense added (id {}): \x1b[31m-${:.2}\x1b[0m on {} ({}) on {}",
        id, expense.amount, expense.category, expense.intent, expense.date
    );
    Ok(id)
}

pub fn cmd_expense_list(
    db: &Database,
    user_id: &str,
    month: Option<i64>,
    year: Option<i64>,
    json: bool,
) -> Result<()> {
    let period = period_filter(month, year)?;
    let expenses = db.list_expenses(user_id, period)?;

    if json {
        return print_json(&expenses);
    }

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  finexo expense add --amount 40 --category Food --intent need");
        return Ok(());
    }

    println!();
    match period {
        Some(p) => println!("🧾 Expenses for {}", p),
        None => println!("🧾 Expenses"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    let mut total = 0.0;
    for expense in &expenses {
        total += expense.amount;
        println!(
            "   {:>5} │ {} │ \x1b[31m{:>10.2}\x1b[0m │ {:15} │ {:9} │ {}",
            expense.id,
            expense.date,
            expense.amount,
            truncate(&expense.category, 15),
            expense.intent.as_str(),
            truncate(&expense.note, 30)
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${:.2} across {} records", total, expenses.len());

    Ok(())
}

pub fn cmd_expense_delete(db: &Database, user_id: &str, id: i64) -> Result<()> {
    db.delete_expense(user_id, id)?;
    db.log_audit(user_id, "delete", Some("expense"), Some(id), None)?;
    println!("🗑️  Expense {} deleted", id);
    Ok(())
}
