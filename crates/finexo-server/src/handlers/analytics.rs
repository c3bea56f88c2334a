//! Analytics handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::params::{non_empty, parse_amount, PeriodQuery};
use crate::{AppError, AppState, AuthUser};
use finexo_core::models::{
    DailyFlow, MonthlySummary, SearchFilter, TimelinePoint, TransactionView,
};
use finexo_core::period::Period;

/// GET /api/analytics/monthly - Summary for a month (defaults to the current one)
pub async fn get_monthly_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let period = params.resolve()?;
    let summary = state.db.get_monthly_summary(&user.user_id, period)?;
    Ok(Json(summary))
}

/// GET /api/analytics/timeline - Income and expense for the last six months
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TimelinePoint>>, AppError> {
    let anchor = Period::containing(Utc::now().date_naive());
    let timeline = state.db.get_timeline(&user.user_id, anchor)?;
    Ok(Json(timeline))
}

/// GET /api/analytics/daily - Day-by-day cash flow for a month
pub async fn get_daily_breakdown(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<Vec<DailyFlow>>, AppError> {
    let period = params
        .both()?
        .ok_or_else(|| AppError::bad_request("Month and Year are required"))?;
    let days = state.db.get_daily_breakdown(&user.user_id, period)?;
    Ok(Json(days))
}

/// Query parameters for transaction search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub month: Option<String>,
    pub year: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub category: Option<String>,
    pub intent: Option<String>,
    pub q: Option<String>,
}

/// GET /api/analytics/search - Search incomes and expenses together
pub async fn search_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<TransactionView>>, AppError> {
    let period = PeriodQuery {
        month: params.month.clone(),
        year: params.year.clone(),
    }
    .both()?;

    let intent = match non_empty(&params.intent) {
        Some(value) => SearchFilter::parse_intent(value).map_err(AppError::from_core)?,
        None => None,
    };

    let filter = SearchFilter {
        period,
        min_amount: parse_amount("min_amount", &params.min_amount)?,
        max_amount: parse_amount("max_amount", &params.max_amount)?,
        category: non_empty(&params.category).map(str::to_string),
        intent,
        text: non_empty(&params.q).map(str::to_string),
    };

    let results = state.db.search_transactions(&user.user_id, &filter)?;
    Ok(Json(results))
}
