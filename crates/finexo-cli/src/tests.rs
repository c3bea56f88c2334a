//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use finexo_core::db::Database;
use finexo_core::models::{Intent, TransactionKind};
use finexo_core::period::Period;

use crate::commands::{self, truncate, SearchArgs};

const USER: &str = "local-dev";

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer string", 10), "a much ...");
    assert_eq!(truncate("café au lait", 7), "café...");
}

#[test]
fn test_parse_date_arg() {
    let date = commands::parse_date_arg(Some("2024-05-10")).unwrap();
    assert_eq!(date.to_string(), "2024-05-10");

    assert!(commands::parse_date_arg(Some("10/05/2024")).is_err());
    assert!(commands::parse_date_arg(None).is_ok());
}

#[test]
fn test_period_filter_needs_both() {
    assert_eq!(commands::period_filter(Some(5), None).unwrap(), None);
    assert_eq!(commands::period_filter(None, Some(2024)).unwrap(), None);
    assert_eq!(
        commands::period_filter(Some(13), Some(2024)).unwrap(),
        Some(Period::new(1, 2025).unwrap())
    );
}

// ========== Init Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("finexo.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Re-running init on an existing database is fine
    assert!(commands::cmd_init(&path).is_ok());
}

// ========== Income Command Tests ==========

#[test]
fn test_cmd_income_add_and_list() {
    let db = setup_test_db();
    let id = commands::cmd_income_add(&db, USER, 3000.0, "Salary", Some("2024-05-01"), true)
        .unwrap();

    let income = db.get_income(USER, id).unwrap().unwrap();
    assert_eq!(income.source, "Salary");
    assert!(income.is_recurring);

    assert!(commands::cmd_income_list(&db, USER, None, None, false).is_ok());
    assert!(commands::cmd_income_list(&db, USER, Some(5), Some(2024), true).is_ok());
}

#[test]
fn test_cmd_income_add_rejects_bad_input() {
    let db = setup_test_db();
    assert!(commands::cmd_income_add(&db, USER, 0.0, "Salary", None, false).is_err());
    assert!(commands::cmd_income_add(&db, USER, -5.0, "Salary", None, false).is_err());
    assert!(commands::cmd_income_add(&db, USER, 10.0, "Salary", Some("yesterday"), false).is_err());
    assert!(db.list_incomes(USER, None).unwrap().is_empty());
}

#[test]
fn test_cmd_income_delete() {
    let db = setup_test_db();
    let id = commands::cmd_income_add(&db, USER, 100.0, "Gift", None, false).unwrap();

    // Another user cannot delete it
    assert!(commands::cmd_income_delete(&db, "someone-else", id).is_err());
    assert!(commands::cmd_income_delete(&db, USER, id).is_ok());
    assert!(db.get_income(USER, id).unwrap().is_none());
    assert!(commands::cmd_income_delete(&db, USER, id).is_err());
}

#[test]
fn test_cmd_income_list_empty() {
    let db = setup_test_db();
    assert!(commands::cmd_income_list(&db, USER, None, None, false).is_ok());
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expense_add_and_list() {
    let db = setup_test_db();
    let id = commands::cmd_expense_add(
        &db,
        USER,
        42.5,
        "Food",
        "Impulse",
        Some("2024-05-03"),
        "late night snacks",
    )
    .unwrap();

    let expense = db.get_expense(USER, id).unwrap().unwrap();
    assert_eq!(expense.intent, Intent::Impulse);
    assert_eq!(expense.note, "late night snacks");

    assert!(commands::cmd_expense_list(&db, USER, Some(5), Some(2024), false).is_ok());
    assert!(commands::cmd_expense_list(&db, USER, None, None, true).is_ok());
}

#[test]
fn test_cmd_expense_add_invalid_intent() {
    let db = setup_test_db();
    let err = commands::cmd_expense_add(&db, USER, 10.0, "Food", "luxury", None, "")
        .unwrap_err();
    assert!(err.to_string().contains("Invalid intent"));
    assert!(db.list_expenses(USER, None).unwrap().is_empty());
}

#[test]
fn test_cmd_expense_delete() {
    let db = setup_test_db();
    let id = commands::cmd_expense_add(&db, USER, 10.0, "Food", "need", None, "").unwrap();
    assert!(commands::cmd_expense_delete(&db, USER, id).is_ok());
    assert!(db.get_expense(USER, id).unwrap().is_none());
}

#[test]
fn test_write_commands_are_audited() {
    let db = setup_test_db();
    let income = commands::cmd_income_add(&db, USER, 100.0, "Gift", None, false).unwrap();
    commands::cmd_expense_add(&db, USER, 10.0, "Food", "need", None, "").unwrap();
    commands::cmd_income_delete(&db, USER, income).unwrap();

    let entries = db.list_audit_log(USER, 10).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].action, "delete");
}

// ========== Report Command Tests ==========

fn seed_may(db: &Database) {
    commands::cmd_income_add(db, USER, 1000.0, "Salary", Some("2024-05-01"), true).unwrap();
    commands::cmd_expense_add(db, USER, 300.0, "Rent", "need", Some("2024-05-02"), "").unwrap();
    commands::cmd_expense_add(db, USER, 50.0, "Food", "impulse", Some("2024-05-20"), "pizza")
        .unwrap();
}

#[test]
fn test_cmd_summary() {
    let db = setup_test_db();
    seed_may(&db);

    assert!(commands::cmd_summary(&db, USER, Some(5), Some(2024), false).is_ok());
    assert!(commands::cmd_summary(&db, USER, Some(5), Some(2024), true).is_ok());
    // Month without records and month rollover
    assert!(commands::cmd_summary(&db, USER, Some(13), Some(2023), false).is_ok());
    // Current month by default
    assert!(commands::cmd_summary(&db, USER, None, None, false).is_ok());
}

#[test]
fn test_cmd_summary_rejects_out_of_range_year() {
    let db = setup_test_db();
    assert!(commands::cmd_summary(&db, USER, Some(1), Some(10_000), false).is_err());
}

#[test]
fn test_cmd_timeline_and_daily() {
    let db = setup_test_db();
    seed_may(&db);

    assert!(commands::cmd_timeline(&db, USER, false).is_ok());
    assert!(commands::cmd_timeline(&db, USER, true).is_ok());
    assert!(commands::cmd_daily(&db, USER, 5, 2024, false).is_ok());
    assert!(commands::cmd_daily(&db, USER, 2, 2024, true).is_ok());
}

#[test]
fn test_cmd_search() {
    let db = setup_test_db();
    seed_may(&db);

    let all = commands::cmd_search(&db, USER, SearchArgs::default(), false).unwrap();
    assert_eq!(all, 3);

    let impulse = SearchArgs {
        intent: Some("impulse".to_string()),
        ..Default::default()
    };
    assert_eq!(commands::cmd_search(&db, USER, impulse, false).unwrap(), 1);

    let incomes = SearchArgs {
        category: Some("Income".to_string()),
        ..Default::default()
    };
    assert_eq!(commands::cmd_search(&db, USER, incomes, true).unwrap(), 1);

    let text = SearchArgs {
        query: Some("PIZZA".to_string()),
        month: Some(5),
        year: Some(2024),
        ..Default::default()
    };
    assert_eq!(commands::cmd_search(&db, USER, text, false).unwrap(), 1);

    let nothing = SearchArgs {
        min_amount: Some(5000.0),
        ..Default::default()
    };
    assert_eq!(commands::cmd_search(&db, USER, nothing, false).unwrap(), 0);
}

#[test]
fn test_search_args_into_filter() {
    let filter = SearchArgs {
        intent: Some("All".to_string()),
        category: Some("  ".to_string()),
        query: Some("rent".to_string()),
        ..Default::default()
    }
    .into_filter()
    .unwrap();
    assert_eq!(filter.intent, None);
    assert_eq!(filter.category, None);
    assert_eq!(filter.text.as_deref(), Some("rent"));

    let bad = SearchArgs {
        intent: Some("luxury".to_string()),
        ..Default::default()
    };
    assert!(bad.into_filter().is_err());
}

#[test]
fn test_cmd_search_is_user_scoped() {
    let db = setup_test_db();
    seed_may(&db);

    let results = db
        .search_transactions("someone-else", &Default::default())
        .unwrap();
    assert!(results.is_empty());

    let mine = db.search_transactions(USER, &Default::default()).unwrap();
    assert!(mine.iter().any(|t| t.kind == TransactionKind::Income));
}
