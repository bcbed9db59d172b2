//! Calculation output models.
//!
//! This module contains the [`EmployeeSalaryBreakdown`] produced for a single
//! employee and the [`PayrollRun`] that groups breakdowns for a pay cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single named amount on a breakdown.
///
/// # Example
///
/// ```
/// use payroll_engine::models::LineItem;
/// use rust_decimal::Decimal;
///
/// let item = LineItem::new("Basic Salary", Decimal::new(5000000, 2));
/// assert_eq!(item.amount.to_string(), "50000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The component's display name.
    pub name: String,
    /// The paid amount, rounded to cents.
    pub amount: Decimal,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// The monthly salary breakdown for one employee.
///
/// Immutable once produced. `gross_pay` always equals `total_earnings` and
/// `net_pay` equals `total_earnings - total_deductions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSalaryBreakdown {
    /// The employee's id.
    pub employee_id: String,
    /// The employee's name.
    pub employee_name: String,
    /// The name of the salary structure used.
    pub structure_name: String,
    /// Earning line items in catalog order.
    pub earnings: Vec<LineItem>,
    /// Deduction line items in catalog order.
    pub deductions: Vec<LineItem>,
    /// Sum of earning line items.
    pub total_earnings: Decimal,
    /// Sum of deduction line items.
    pub total_deductions: Decimal,
    /// Equal to `total_earnings`.
    pub gross_pay: Decimal,
    /// `total_earnings - total_deductions`.
    pub net_pay: Decimal,
    /// Loss-of-pay days applied.
    pub lop_days: u32,
    /// Working days reported for the period.
    pub working_days: u32,
    /// `30 - lop_days`.
    pub payable_days: i64,
}

/// A payroll run over a set of employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for this run.
    pub id: Uuid,
    /// When the run was computed.
    pub date: DateTime<Utc>,
    /// Working days reported for the period.
    pub working_days: u32,
    /// One breakdown per processed employee.
    pub breakdowns: Vec<EmployeeSalaryBreakdown>,
    /// Sum of every breakdown's net pay.
    pub total_payroll: Decimal,
}

impl PayrollRun {
    /// Returns the number of employees paid in this run.
    pub fn employee_count(&self) -> usize {
        self.breakdowns.len()
    }

    /// Finds the breakdown for an employee.
    pub fn breakdown_for(&self, employee_id: &str) -> Option<&EmployeeSalaryBreakdown> {
        self.breakdowns
            .iter()
            .find(|b| b.employee_id == employee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_breakdown(employee_id: &str, net_pay: Decimal) -> EmployeeSalaryBreakdown {
        EmployeeSalaryBreakdown {
            employee_id: employee_id.to_string(),
            employee_name: "Asha Rao".to_string(),
            structure_name: "Standard".to_string(),
            earnings: vec![LineItem::new("Basic", net_pay)],
            deductions: vec![],
            total_earnings: net_pay,
            total_deductions: Decimal::ZERO,
            gross_pay: net_pay,
            net_pay,
            lop_days: 0,
            working_days: 30,
            payable_days: 30,
        }
    }

    #[test]
    fn test_breakdown_serialization() {
        let breakdown = create_sample_breakdown("emp_001", dec("50000.00"));

        let json = serde_json::to_string(&breakdown).unwrap();
        assert!(json.contains("\"employee_id\":\"emp_001\""));
        assert!(json.contains("\"structure_name\":\"Standard\""));
        assert!(json.contains("\"earnings\":[{\"name\":\"Basic\",\"amount\":\"50000.00\"}]"));
        assert!(json.contains("\"net_pay\":\"50000.00\""));
        assert!(json.contains("\"payable_days\":30"));
    }

    #[test]
    fn test_breakdown_deserialization() {
        let json = r#"{
            "employee_id": "emp_001",
            "employee_name": "Asha Rao",
            "structure_name": "Standard",
            "earnings": [{"name": "Basic", "amount": "27000.00"}],
            "deductions": [{"name": "PF", "amount": "1800.00"}],
            "total_earnings": "27000.00",
            "total_deductions": "1800.00",
            "gross_pay": "27000.00",
            "net_pay": "25200.00",
            "lop_days": 3,
            "working_days": 30,
            "payable_days": 27
        }"#;

        let breakdown: EmployeeSalaryBreakdown = serde_json::from_str(json).unwrap();
        assert_eq!(breakdown.deductions[0].amount, dec("1800.00"));
        assert_eq!(breakdown.net_pay, dec("25200.00"));
        assert_eq!(breakdown.payable_days, 27);
    }

    #[test]
    fn test_payroll_run_lookup() {
        let run = PayrollRun {
            id: Uuid::nil(),
            date: DateTime::parse_from_rfc3339("2026-01-31T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            working_days: 30,
            breakdowns: vec![
                create_sample_breakdown("emp_001", dec("100.00")),
                create_sample_breakdown("emp_002", dec("200.00")),
            ],
            total_payroll: dec("300.00"),
        };

        assert_eq!(run.employee_count(), 2);
        assert_eq!(
            run.breakdown_for("emp_002").map(|b| b.net_pay),
            Some(dec("200.00"))
        );
        assert!(run.breakdown_for("emp_404").is_none());

        let json = serde_json::to_string(&run).unwrap();
        assert!(json.contains("\"id\":\"00000000-0000-0000-0000-000000000000\""));
        assert!(json.contains("\"total_payroll\":\"300.00\""));
    }
}
