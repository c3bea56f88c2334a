//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::incomes::CreatedResponse;
use super::params::{non_empty, parse_date, PeriodQuery};
use crate::{AppError, AppState, AuthUser, MessageResponse};
use finexo_core::models::{Expense, ExpenseUpdate, Intent, NewExpense};

/// Body for creating an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub intent: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Body for updating an expense; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub intent: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Response for an updated expense
#[derive(Serialize)]
pub struct ExpenseUpdatedResponse {
    pub message: String,
    pub expense: Expense,
}

fn parse_intent(value: &str) -> Result<Intent, AppError> {
    value.parse().map_err(|e: String| AppError::bad_request(&e))
}

/// POST /api/expense - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let (Some(amount), Some(category), Some(intent), Some(date)) = (
        body.amount.filter(|a| *a != 0.0),
        non_empty(&body.category),
        non_empty(&body.intent),
        non_empty(&body.date),
    ) else {
        return Err(AppError::bad_request("Missing required fields"));
    };

    let expense = NewExpense {
        amount,
        category: category.to_string(),
        intent: parse_intent(intent)?,
        date: parse_date(date)?,
        note: body.note.unwrap_or_default(),
    };

    let id = state
        .db
        .create_expense(&user.user_id, &expense)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        &user.user_id,
        "create",
        Some("expense"),
        Some(id),
        Some(&format!(
            "amount={}, category={}, intent={}",
            expense.amount, expense.category, expense.intent
        )),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Expense added successfully".to_string(),
            id,
        }),
    ))
}

/// GET /api/expense - List expenses, optionally for one month
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let period = params.both()?;
    let expenses = state.db.list_expenses(&user.user_id, period)?;
    Ok(Json(expenses))
}

/// PUT /api/expense/:id - Update an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseUpdatedResponse>, AppError> {
    let update = ExpenseUpdate {
        amount: body.amount,
        category: body.category,
        intent: body.intent.as_deref().map(parse_intent).transpose()?,
        date: body.date.as_deref().map(parse_date).transpose()?,
        note: body.note,
    };

    let expense = state
        .db
        .update_expense(&user.user_id, id, &update)
        .map_err(AppError::from_core)?;

    state
        .db
        .log_audit(&user.user_id, "update", Some("expense"), Some(id), None)?;

    Ok(Json(ExpenseUpdatedResponse {
        message: "Expense updated successfully".to_string(),
        expense,
    }))
}

/// DELETE /api/expense/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .db
        .delete_expense(&user.user_id, id)
        .map_err(AppError::from_core)?;

    state
        .db
        .log_audit(&user.user_id, "delete", Some("expense"), Some(id), None)?;

    Ok(Json(MessageResponse {
        message: "Expense deleted successfully".to_string(),
    }))
}
