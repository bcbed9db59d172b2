//! Response types for the payroll engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::{ComponentCatalog, describe_formula};
use crate::error::EngineError;
use crate::formatting::format_currency;
use crate::models::{Component, ComponentCategory, ComponentType, FormulaTerm};

/// Response body for the `/components` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentListing {
    /// ISO currency code of the catalog.
    pub currency: String,
    /// Components in catalog order.
    pub components: Vec<ComponentSummary>,
}

/// A catalog component with a human-readable description of its value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSummary {
    /// The component id.
    pub id: String,
    /// The display name.
    pub name: String,
    /// Earning or deduction.
    pub component_type: ComponentType,
    /// How the value is derived.
    pub component_category: ComponentCategory,
    /// Whether loss-of-pay proration applies.
    pub apply_lop_deduction: bool,
    /// e.g. `₹1,600`, `40% of CTC (Monthly)`.
    pub description: String,
}

impl ComponentSummary {
    /// Summarises a component, resolving referenced names through `catalog`.
    pub fn describe<C: ComponentCatalog + ?Sized>(component: &Component, catalog: &C) -> Self {
        let description = match component.component_category {
            ComponentCategory::Fixed => format_currency(component.amount),
            ComponentCategory::Percentage => describe_formula(
                &[FormulaTerm::percentage(
                    component.amount,
                    component.based_on.clone(),
                )],
                catalog,
            ),
            ComponentCategory::Formula => describe_formula(&component.formula_terms, catalog),
        };

        Self {
            id: component.id.clone(),
            name: component.name.clone(),
            component_type: component.component_type,
            component_category: component.component_category,
            apply_lop_deduction: component.apply_lop_deduction,
            description,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::StructureNotAssigned { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "STRUCTURE_NOT_ASSIGNED",
                    message,
                    "Assign a salary_structure_id to the employee",
                ),
            ),
            EngineError::StructureNotFound { id } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "STRUCTURE_NOT_FOUND",
                    message,
                    format!("The salary structure '{}' is not configured", id),
                ),
            ),
            EngineError::NoEligibleEmployees => {
                ApiErrorResponse::bad_request(ApiError::new("NO_ELIGIBLE_EMPLOYEES", message))
            }
            EngineError::ComponentNotFound { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("COMPONENT_NOT_FOUND", message))
            }
            EngineError::InvalidFormula { .. } | EngineError::InvalidFormulaTerm { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_FORMULA", message))
            }
            EngineError::CircularReference { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CIRCULAR_REFERENCE",
                    "Component configuration contains a cycle",
                    path,
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
