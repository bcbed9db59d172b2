//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the `/breakdown` and
//! `/payroll-run` endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Employee;

use super::response::ApiError;

/// Request body for the `/breakdown` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRequest {
    /// The employee to calculate for. Must have a salary structure.
    pub employee: EmployeeRequest,
    /// Working days to report; the configured default when omitted.
    #[serde(default)]
    pub working_days: Option<u32>,
}

/// Request body for the `/payroll-run` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunRequest {
    /// The employees to run payroll for.
    pub employees: Vec<EmployeeRequest>,
    /// Working days to report; the configured default when omitted.
    #[serde(default)]
    pub working_days: Option<u32>,
}

/// Employee information in a request.
///
/// Converted into an [`Employee`] with [`TryFrom`], which checks the fields
/// the engine itself never validates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// Annual cost to company.
    pub ctc: Decimal,
    /// Days of unpaid leave in the period.
    #[serde(default)]
    pub lop_count: u32,
    /// The salary structure the employee is paid under.
    #[serde(default)]
    pub salary_structure_id: Option<String>,
}

impl TryFrom<EmployeeRequest> for Employee {
    type Error = ApiError;

    fn try_from(req: EmployeeRequest) -> Result<Self, Self::Error> {
        if req.id.trim().is_empty() {
            return Err(ApiError::validation_error("Employee id must not be blank"));
        }
        if req.name.trim().is_empty() {
            return Err(ApiError::validation_error(format!(
                "Employee '{}' must have a name",
                req.id
            )));
        }
        if req.ctc.is_sign_negative() && !req.ctc.is_zero() {
            return Err(ApiError::validation_error(format!(
                "Employee '{}' has a negative ctc: {}",
                req.id, req.ctc
            )));
        }

        Ok(Employee {
            id: req.id,
            name: req.name,
            ctc: req.ctc,
            lop_count: req.lop_count,
            // A blank structure id means unassigned
            salary_structure_id: req.salary_structure_id.filter(|s| !s.trim().is_empty()),
        })
    }
}
