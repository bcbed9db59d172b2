//! Salary structure model.

use serde::{Deserialize, Serialize};

/// A named set of component ids paid together.
///
/// The order of `component_ids` is irrelevant: line items follow catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Unique identifier for the structure.
    pub id: String,
    /// Display name, copied onto each breakdown.
    pub name: String,
    /// The components belonging to this structure.
    #[serde(default)]
    pub component_ids: Vec<String>,
}

impl SalaryStructure {
    /// Returns true if the component id belongs to this structure.
    pub fn contains(&self, component_id: &str) -> bool {
        self.component_ids.iter().any(|id| id == component_id)
    }
}
