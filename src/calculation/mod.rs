//! Calculation logic for the payroll engine.
//!
//! This module contains component value resolution over the catalog's
//! reference graph, the formula evaluator, the per-employee breakdown with
//! loss-of-pay proration, payroll runs over many employees, and strict
//! validation helpers for editing layers.

mod breakdown;
mod catalog;
mod component_value;
mod formula;
mod payroll_run;
mod validation;

pub use breakdown::{
    DEFAULT_WORKING_DAYS, LOP_BASIS_DAYS, calculate_employee_breakdown, payable_days,
    prorate_for_lop, round_to_cents,
};
pub use catalog::{CalculatedAmounts, ComponentCatalog};
pub use component_value::calculate_component_amount;
pub use formula::evaluate_formula;
pub use payroll_run::run_payroll;
pub use validation::{describe_formula, validate_catalog, validate_formula};
