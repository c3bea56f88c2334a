//! Query and body value parsing shared by handlers

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::AppError;
use finexo_core::period::{parse_component, Period};

/// Optional month/year query parameters, as sent by the client
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// Treat absent and blank values alike
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn component(name: &str, value: &Option<String>) -> Result<Option<i64>, AppError> {
    non_empty(value)
        .map(|v| parse_component(name, v))
        .transpose()
        .map_err(AppError::from_core)
}

impl PeriodQuery {
    /// Month/year with missing parts taken from today
    pub(crate) fn resolve(&self) -> Result<Period, AppError> {
        let month = component("month", &self.month)?;
        let year = component("year", &self.year)?;
        Period::resolve(month, year, Utc::now().date_naive()).map_err(AppError::from_core)
    }

    /// Month/year only when both are given
    pub(crate) fn both(&self) -> Result<Option<Period>, AppError> {
        match (component("month", &self.month)?, component("year", &self.year)?) {
            (Some(month), Some(year)) => Period::normalized(month, year)
                .map(Some)
                .map_err(AppError::from_core),
            _ => Ok(None),
        }
    }
}

/// Parse a "YYYY-MM-DD" date
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("Invalid date format (use YYYY-MM-DD)"))
}

/// Parse an amount filter value
pub(crate) fn parse_amount(name: &str, value: &Option<String>) -> Result<Option<f64>, AppError> {
    non_empty(value)
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|a| a.is_finite())
                .ok_or_else(|| AppError::bad_request(&format!("Invalid {}: {}", name, v)))
        })
        .transpose()
}
