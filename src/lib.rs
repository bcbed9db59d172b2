//! Payroll engine for salary component resolution and monthly breakdowns.
//!
//! This crate resolves the monthly value of configured salary components
//! (fixed amounts, percentages of other components and arithmetic formulas),
//! applies loss-of-pay proration and aggregates the results into per-employee
//! breakdowns and payroll runs. An HTTP API exposes the same operations.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod formatting;
pub mod models;
