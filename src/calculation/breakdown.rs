//! Employee salary breakdown aggregation.
//!
//! This module drives a full calculation for one employee: it resolves every
//! component in the employee's structure, applies loss-of-pay (LOP) proration
//! to eligible earnings, and totals earnings and deductions.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Component, Employee, EmployeeSalaryBreakdown, LineItem, SalaryStructure};

use super::catalog::{CalculatedAmounts, ComponentCatalog};
use super::component_value::Resolver;

/// The fixed number of days LOP proration divides by, regardless of the
/// calendar length of the month.
pub const LOP_BASIS_DAYS: u32 = 30;

/// Working days reported on a breakdown when the caller gives none.
pub const DEFAULT_WORKING_DAYS: u32 = 30;

/// Rounds a monetary amount to cents, halves away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_cents(Decimal::new(10005, 3)), Decimal::new(1001, 2)); // 10.005 → 10.01
/// assert_eq!(round_to_cents(Decimal::new(-10005, 3)), Decimal::new(-1001, 2));
/// ```
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Days paid after loss of pay: `30 - lop_days`.
///
/// Not clamped: more than 30 LOP days yields a negative count.
pub fn payable_days(lop_days: u32) -> i64 {
    i64::from(LOP_BASIS_DAYS) - i64::from(lop_days)
}

/// Scales a monthly amount down to the days actually payable.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if the scaled amount overflows.
pub fn prorate_for_lop(amount: Decimal, lop_days: u32) -> EngineResult<Decimal> {
    let days = payable_days(lop_days);
    amount
        .checked_mul(Decimal::from(days))
        .map(|scaled| scaled / Decimal::from(LOP_BASIS_DAYS))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("{} prorated over {} payable days overflows", amount, days),
        })
}

/// Sums amounts and rounds the total to cents.
pub(crate) fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> EngineResult<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| {
            total
                .checked_add(amount)
                .ok_or_else(|| EngineError::CalculationError {
                    message: format!("total overflows adding {} to {}", amount, total),
                })
        })
        .map(round_to_cents)
}

fn is_lop_prorated(component: &Component, employee: &Employee) -> bool {
    // Deductions are never prorated, whatever their flag says
    component.apply_lop_deduction && component.is_earning() && employee.has_lop()
}

/// Calculates an employee's monthly salary breakdown under a structure.
///
/// The calculation runs in two passes over the structure's components,
/// taken in catalog order:
///
/// 1. Every component's full monthly value is resolved into a fresh cache.
/// 2. Each value is prorated for LOP if the component is an earning flagged
///    with `apply_lop_deduction` and the employee has LOP days, rounded to
///    cents, and filed as an earning or deduction line item.
///
/// Totals are summed from the rounded line items and rounded again. Gross pay
/// equals total earnings; net pay is total earnings minus total deductions.
///
/// `working_days` is reported on the breakdown but never used for proration,
/// which always divides by [`LOP_BASIS_DAYS`]. It defaults to
/// [`DEFAULT_WORKING_DAYS`].
///
/// # Errors
///
/// Returns [`EngineError::CircularReference`] if any component in the
/// structure depends on itself, and [`EngineError::CalculationError`] if an
/// amount or total overflows.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_employee_breakdown;
/// use payroll_engine::models::{Component, ComponentRef, ComponentType, Employee, SalaryStructure};
/// use rust_decimal::Decimal;
///
/// let catalog = vec![
///     Component::fixed("basic", "Basic", ComponentType::Earning, Decimal::new(30_000, 0))
///         .with_lop_deduction(),
///     Component::percentage("pf", "PF", ComponentType::Deduction, Decimal::new(12, 0), "basic"),
/// ];
/// let structure = SalaryStructure {
///     id: "std".to_string(),
///     name: "Standard".to_string(),
///     component_ids: vec!["basic".to_string(), "pf".to_string()],
/// };
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Asha Rao".to_string(),
///     ctc: Decimal::new(600_000, 0),
///     lop_count: 3,
///     salary_structure_id: Some("std".to_string()),
/// };
///
/// let breakdown = calculate_employee_breakdown(&employee, &structure, &catalog, None).unwrap();
/// assert_eq!(breakdown.gross_pay, Decimal::new(27_000, 0));
/// assert_eq!(breakdown.net_pay, Decimal::new(23_400, 0));
/// assert_eq!(breakdown.payable_days, 27);
/// ```
pub fn calculate_employee_breakdown<C: ComponentCatalog + ?Sized>(
    employee: &Employee,
    structure: &SalaryStructure,
    catalog: &C,
    working_days: Option<u32>,
) -> EngineResult<EmployeeSalaryBreakdown> {
    let working_days = working_days.unwrap_or(DEFAULT_WORKING_DAYS);
    let structure_components: Vec<&Component> = catalog
        .components()
        .iter()
        .filter(|c| structure.contains(&c.id))
        .collect();

    let mut cache = CalculatedAmounts::new();
    let mut resolver = Resolver::new(employee.ctc, catalog, &mut cache);

    // Full monthly values first, so proration never feeds into another
    // component's base
    for component in &structure_components {
        resolver.resolve_cached(component)?;
    }

    let mut earnings = Vec::new();
    let mut deductions = Vec::new();

    for component in &structure_components {
        let mut amount = resolver.cached(&component.id).unwrap_or_default();

        if is_lop_prorated(component, employee) {
            amount = prorate_for_lop(amount, employee.lop_count)?;
        }

        let item = LineItem::new(component.name.as_str(), round_to_cents(amount));
        if component.is_earning() {
            earnings.push(item);
        } else {
            deductions.push(item);
        }
    }

    let total_earnings = checked_total(earnings.iter().map(|e| e.amount))?;
    let total_deductions = checked_total(deductions.iter().map(|d| d.amount))?;
    let net_pay = total_earnings
        .checked_sub(total_deductions)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("{} - {} overflows", total_earnings, total_deductions),
        })?;

    info!(
        employee_id = %employee.id,
        structure = %structure.name,
        components = structure_components.len(),
        gross_pay = %total_earnings,
        net_pay = %net_pay,
        "Breakdown calculated"
    );

    Ok(EmployeeSalaryBreakdown {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        structure_name: structure.name.clone(),
        earnings,
        deductions,
        total_earnings,
        total_deductions,
        gross_pay: total_earnings,
        net_pay,
        lop_days: employee.lop_count,
        working_days,
        payable_days: payable_days(employee.lop_count),
    })
}
