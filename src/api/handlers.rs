//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_employee_breakdown, run_payroll};
use crate::models::Employee;

use super::request::{BreakdownRequest, PayrollRunRequest};
use super::response::{ApiError, ApiErrorResponse, ComponentListing, ComponentSummary};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/breakdown", post(breakdown_handler))
        .route("/payroll-run", post(payroll_run_handler))
        .route("/components", get(components_handler))
        .with_state(state)
}

/// Handler for POST /breakdown.
///
/// Calculates the monthly breakdown for one employee under their assigned
/// salary structure.
async fn breakdown_handler(
    State(state): State<AppState>,
    payload: Result<Json<BreakdownRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing breakdown request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let employee = match Employee::try_from(request.employee) {
        Ok(employee) => employee,
        Err(error) => return invalid_request(correlation_id, error),
    };
    let config = state.config();
    let working_days = request
        .working_days
        .unwrap_or(config.metadata().default_working_days);

    let structure = match config.structure_for(&employee) {
        Ok(structure) => structure,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                error = %err,
                "Salary structure lookup failed"
            );
            return error_response(err.into());
        }
    };

    let start_time = Instant::now();
    match calculate_employee_breakdown(&employee, structure, config.config(), Some(working_days)) {
        Ok(breakdown) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                net_pay = %breakdown.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Breakdown completed successfully"
            );
            json_response(StatusCode::OK, &breakdown)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Breakdown failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /payroll-run.
///
/// Employees without a resolvable salary structure are left out of the run
/// rather than failing it.
async fn payroll_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let employees = match request
        .employees
        .into_iter()
        .map(Employee::try_from)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(employees) => employees,
        Err(error) => return invalid_request(correlation_id, error),
    };
    let config = state.config();
    let working_days = request
        .working_days
        .unwrap_or(config.metadata().default_working_days);

    let start_time = Instant::now();
    match run_payroll(
        &employees,
        config.structures(),
        config.config(),
        Some(working_days),
    ) {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %run.id,
                requested = employees.len(),
                processed = run.employee_count(),
                total_payroll = %run.total_payroll,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll run completed successfully"
            );
            json_response(StatusCode::OK, &run)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll run failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for GET /components.
async fn components_handler(State(state): State<AppState>) -> Response {
    let config = state.config();
    let listing = ComponentListing {
        currency: config.metadata().currency.clone(),
        components: config
            .components()
            .iter()
            .map(|c| ComponentSummary::describe(c, config.config()))
            .collect(),
    };
    json_response(StatusCode::OK, &listing)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    error_response(ApiErrorResponse::bad_request(error))
}

fn invalid_request(correlation_id: Uuid, error: ApiError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error.message,
        "Request validation failed"
    );
    error_response(ApiErrorResponse::bad_request(error))
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, &api_error.error)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
