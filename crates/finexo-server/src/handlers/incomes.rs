//! Income handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::params::{non_empty, parse_date, PeriodQuery};
use crate::{AppError, AppState, AuthUser, MessageResponse};
use finexo_core::models::{Income, IncomeUpdate, NewIncome};

/// Body for creating an income
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncomeRequest {
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

/// Body for updating an income; absent fields are left unchanged
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncomeRequest {
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub date: Option<String>,
    pub is_recurring: Option<bool>,
}

/// Response for a created record
#[derive(Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Response for an updated income
#[derive(Serialize)]
pub struct IncomeUpdatedResponse {
    pub message: String,
    pub income: Income,
}

/// POST /api/income - Record an income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateIncomeRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let (Some(amount), Some(source), Some(date)) = (
        body.amount.filter(|a| *a != 0.0),
        non_empty(&body.source),
        non_empty(&body.date),
    ) else {
        return Err(AppError::bad_request("Missing required fields"));
    };

    let income = NewIncome {
        amount,
        source: source.to_string(),
        date: parse_date(date)?,
        is_recurring: body.is_recurring,
    };

    let id = state
        .db
        .create_income(&user.user_id, &income)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        &user.user_id,
        "create",
        Some("income"),
        Some(id),
        Some(&format!("amount={}, source={}", income.amount, income.source)),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Income added successfully".to_string(),
            id,
        }),
    ))
}

/// GET /api/income - List incomes, optionally for one month
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<Vec<Income>>, AppError> {
    let period = params.both()?;
    let incomes = state.db.list_incomes(&user.user_id, period)?;
    Ok(Json(incomes))
}

/// PUT /api/income/:id - Update an income
pub async fn update_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateIncomeRequest>,
) -> Result<Json<IncomeUpdatedResponse>, AppError> {
    let update = IncomeUpdate {
        amount: body.amount,
        source: body.source,
        date: body.date.as_deref().map(parse_date).transpose()?,
        is_recurring: body.is_recurring,
    };

    let income = state
        .db
        .update_income(&user.user_id, id, &update)
        .map_err(AppError::from_core)?;

    state
        .db
        .log_audit(&user.user_id, "update", Some("income"), Some(id), None)?;

    Ok(Json(IncomeUpdatedResponse {
        message: "Income updated successfully".to_string(),
        income,
    }))
}

/// DELETE /api/income/:id - Delete an income
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .db
        .delete_income(&user.user_id, id)
        .map_err(AppError::from_core)?;

    state
        .db
        .log_audit(&user.user_id, "delete", Some("income"), Some(id), None)?;

    Ok(Json(MessageResponse {
        message: "Income deleted successfully".to_string(),
    }))
}
