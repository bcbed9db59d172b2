//! Configuration types for the payroll catalog.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::calculation::{ComponentCatalog, DEFAULT_WORKING_DAYS};
use crate::models::{Component, SalaryStructure};

/// Metadata about the payroll configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollMetadata {
    /// The human-readable name of the configuration.
    pub name: String,
    /// The version or effective date of the configuration.
    pub version: String,
    /// ISO currency code amounts are expressed in.
    pub currency: String,
    /// Working days reported when a request does not give any.
    #[serde(default = "default_working_days")]
    pub default_working_days: u32,
}

fn default_working_days() -> u32 {
    DEFAULT_WORKING_DAYS
}

/// Components configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsConfig {
    /// The component catalog, in display order.
    pub components: Vec<Component>,
}

/// Structures configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct StructuresConfig {
    /// The configured salary structures.
    pub structures: Vec<SalaryStructure>,
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    /// Configuration metadata.
    metadata: PayrollMetadata,
    /// Component catalog in file order.
    components: Vec<Component>,
    /// Salary structures.
    structures: Vec<SalaryStructure>,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(
        metadata: PayrollMetadata,
        components: Vec<Component>,
        structures: Vec<SalaryStructure>,
    ) -> Self {
        Self {
            metadata,
            components,
            structures,
        }
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        &self.metadata
    }

    /// Returns all salary structures.
    pub fn structures(&self) -> &[SalaryStructure] {
        &self.structures
    }
}

impl ComponentCatalog for PayrollConfig {
    fn components(&self) -> &[Component] {
        &self.components
    }
}
