//! Employee model.
//!
//! Only the fields the engine reads are modelled: annual CTC, the loss-of-pay
//! day count for the period, and the assigned salary structure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee whose salary is broken down by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
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

impl Employee {
    /// Returns the monthly CTC used as the base for CTC-relative components.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Asha Rao".to_string(),
    ///     ctc: Decimal::new(1_200_000, 0),
    ///     lop_count: 0,
    ///     salary_structure_id: None,
    /// };
    /// assert_eq!(employee.monthly_ctc(), Decimal::new(100_000, 0));
    /// ```
    pub fn monthly_ctc(&self) -> Decimal {
        monthly_ctc(self.ctc)
    }

    /// Returns true if the employee has any loss-of-pay days.
    pub fn has_lop(&self) -> bool {
        self.lop_count > 0
    }
}

/// Converts annual CTC to the monthly base. This is the only place CTC enters
/// a calculation.
pub fn monthly_ctc(annual_ctc: Decimal) -> Decimal {
    annual_ctc / Decimal::from(12)
}
