//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finexo - Track income, expenses and spending intent
#[derive(Parser)]
#[command(name = "finexo")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "finexo.db", global = true)]
    pub db: PathBuf,

    /// User that records are read and written for
    #[arg(long, default_value = "local-dev", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (local development only)
        ///
        /// Requests are attributed to the X-User-Id header, or "local-dev".
        #[arg(long)]
        no_auth: bool,

        /// Directory of static files to serve (the web UI)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage income records
    Income {
        #[command(subcommand)]
        action: IncomeAction,
    },

    /// Manage expense records
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Monthly summary with health score and highlights
    Summary {
        /// Month (1-12, out-of-range values roll over into adjacent years)
        #[arg(short, long)]
        month: Option<i64>,

        /// Year
        #[arg(short, long)]
        year: Option<i64>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Income and expense totals for the last six months
    Timeline {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Day-by-day cash flow for a month
    Daily {
        /// Month (1-12)
        #[arg(short, long)]
        month: i64,

        /// Year
        #[arg(short, long)]
        year: i64,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Search incomes and expenses together
    Search {
        /// Restrict to a month (requires --year)
        #[arg(short, long, requires = "year")]
        month: Option<i64>,

        /// Restrict to a year (requires --month)
        #[arg(short, long, requires = "month")]
        year: Option<i64>,

        /// Minimum amount
        #[arg(long)]
        min: Option<f64>,

        /// Maximum amount
        #[arg(long)]
        max: Option<f64>,

        /// Category ("Income" for incomes only, "All" for everything)
        #[arg(short, long)]
        category: Option<String>,

        /// Spending intent (need, want, emergency, impulse)
        #[arg(short, long)]
        intent: Option<String>,

        /// Text to match in note, source or category
        #[arg(short, long)]
        query: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// Record an income
    Add {
        /// Amount received
        #[arg(short, long)]
        amount: f64,

        /// Where the money came from (e.g. "Salary")
        #[arg(short, long)]
        source: String,

        /// Date received (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Mark as recurring income
        #[arg(long)]
        recurring: bool,
    },

    /// List incomes, newest first
    List {
        /// Restrict to a month (requires --year)
        #[arg(short, long, requires = "year")]
        month: Option<i64>,

        /// Restrict to a year (requires --month)
        #[arg(short, long, requires = "month")]
        year: Option<i64>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an income
    Delete {
        /// Income ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add {
        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Spending category (e.g. "Food")
        #[arg(short, long)]
        category: String,

        /// Spending intent (need, want, emergency, impulse)
        #[arg(short, long)]
        intent: String,

        /// Date spent (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// List expenses, newest first
    List {
        /// Restrict to a month (requires --year)
        #[arg(short, long, requires = "year")]
        month: Option<i64>,

        /// Restrict to a year (requires --month)
        #[arg(short, long, requires = "month")]
        year: Option<i64>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}
