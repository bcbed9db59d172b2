//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for salary breakdowns,
//! payroll runs and the component catalog.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BreakdownRequest, EmployeeRequest, PayrollRunRequest};
pub use response::{ApiError, ComponentListing, ComponentSummary};
pub use state::AppState;
