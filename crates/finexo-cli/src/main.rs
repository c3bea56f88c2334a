//! Finexo CLI - Personal finance tracker
//!
//! Usage:
//!   finexo init                                  Initialize database
//!   finexo income add -a 3000 -s Salary          Record an income
//!   finexo expense add -a 40 -c Food -i need     Record an expense
//!   finexo summary --month 5 --year 2024         Monthly summary
//!   finexo serve --port 3000                     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user.as_str();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, static_dir.as_deref()).await,
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                IncomeAction::Add {
                    amount,
                    source,
                    date,
                    recurring,
                } => commands::cmd_income_add(&db, user, amount, &source, date.as_deref(), recurring)
                    .map(|_| ()),
                IncomeAction::List { month, year, json } => {
                    commands::cmd_income_list(&db, user, month, year, json)
                }
                IncomeAction::Delete { id } => commands::cmd_income_delete(&db, user, id),
            }
        }
        Commands::Expense { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                ExpenseAction::Add {
                    amount,
                    category,
                    intent,
                    date,
                    note,
                } => commands::cmd_expense_add(
                    &db,
                    user,
                    amount,
                    &category,
                    &intent,
                    date.as_deref(),
                    &note,
                )
                .map(|_| ()),
                ExpenseAction::List { month, year, json } => {
                    commands::cmd_expense_list(&db, user, month, year, json)
                }
                ExpenseAction::Delete { id } => commands::cmd_expense_delete(&db, user, id),
            }
        }
        Commands::Summary { month, year, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_summary(&db, user, month, year, json)
        }
        Commands::Timeline { json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_timeline(&db, user, json)
        }
        Commands::Daily { month, year, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_daily(&db, user, month, year, json)
        }
        Commands::Search {
            month,
            year,
            min,
            max,
            category,
            intent,
            query,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            let args = commands::SearchArgs {
                month,
                year,
                min_amount: min,
                max_amount: max,
                category,
                intent,
                query,
            };
            commands::cmd_search(&db, user, args, json).map(|_| ())
        }
    }
}
