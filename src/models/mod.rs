//! Core data models for the payroll engine.
//!
//! This module contains the catalog, structure and employee inputs consumed by
//! the engine, and the breakdown records it produces.

mod breakdown;
mod component;
mod employee;
mod salary_structure;

pub use breakdown::{EmployeeSalaryBreakdown, LineItem, PayrollRun};
pub use component::{
    CTC_REFERENCE, Component, ComponentCategory, ComponentRef, ComponentType, FormulaOperator,
    FormulaTerm,
};
pub use employee::{Employee, monthly_ctc};
pub use salary_structure::SalaryStructure;
