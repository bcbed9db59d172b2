//! Payroll runs over many employees.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayrollRun, SalaryStructure};

use super::breakdown::{DEFAULT_WORKING_DAYS, calculate_employee_breakdown, checked_total};
use super::catalog::ComponentCatalog;

/// Runs payroll for every employee with a salary structure.
///
/// Employees are processed in input order. An employee without a structure,
/// or whose structure id is not among `structures`, is skipped. Each
/// breakdown gets its own cache, so results do not depend on which other
/// employees are in the run.
///
/// # Errors
///
/// Returns [`EngineError::NoEligibleEmployees`] when no employee has a
/// structure id at all. Employees whose structure id is unknown do not count
/// towards that check; a run made up only of them is empty. Otherwise fails
/// on the first breakdown that fails (circular references, overflow).
pub fn run_payroll<C: ComponentCatalog + ?Sized>(
    employees: &[Employee],
    structures: &[SalaryStructure],
    catalog: &C,
    working_days: Option<u32>,
) -> EngineResult<PayrollRun> {
    let working_days = working_days.unwrap_or(DEFAULT_WORKING_DAYS);
    if employees.iter().all(|e| e.salary_structure_id.is_none()) {
        warn!(requested = employees.len(), "No employees with salary structures assigned");
        return Err(EngineError::NoEligibleEmployees);
    }

    let mut breakdowns = Vec::with_capacity(employees.len());

    for employee in employees {
        let Some(structure_id) = employee.salary_structure_id.as_deref() else {
            warn!(employee_id = %employee.id, "No salary structure assigned, skipping");
            continue;
        };
        let Some(structure) = structures.iter().find(|s| s.id == structure_id) else {
            warn!(
                employee_id = %employee.id,
                structure_id = %structure_id,
                "Salary structure not found, skipping"
            );
            continue;
        };

        breakdowns.push(calculate_employee_breakdown(
            employee,
            structure,
            catalog,
            Some(working_days),
        )?);
    }

    let total_payroll = checked_total(breakdowns.iter().map(|b| b.net_pay))?;
    let run = PayrollRun {
        id: Uuid::new_v4(),
        date: Utc::now(),
        working_days,
        breakdowns,
        total_payroll,
    };

    info!(
        run_id = %run.id,
        employees = run.employee_count(),
        skipped = employees.len() - run.employee_count(),
        total_payroll = %run.total_payroll,
        "Payroll run completed"
    );

    Ok(run)
}
