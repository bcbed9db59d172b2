//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::calculation::ComponentCatalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{Component, Employee, SalaryStructure};

use super::types::{ComponentsConfig, PayrollConfig, PayrollMetadata, StructuresConfig};

/// Loads and provides access to a payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/standard/
/// ├── payroll.yaml     # Metadata and defaults
/// ├── components.yaml  # Component catalog (order drives line-item order)
/// └── structures.yaml  # Salary structures
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
///
/// let structure = loader.get_structure("struct_standard").unwrap();
/// println!("Structure: {} ({} components)", structure.name, structure.component_ids.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Two components share an id
    ///
    /// References between components are not checked here; see
    /// [`validate_catalog`](crate::calculation::validate_catalog).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PayrollMetadata>(&path.join("payroll.yaml"))?;

        let components_path = path.join("components.yaml");
        let components = Self::load_yaml::<ComponentsConfig>(&components_path)?.components;
        Self::check_unique_ids(&components_path, components.iter().map(|c| c.id.as_str()))?;

        let structures_path = path.join("structures.yaml");
        let structures = Self::load_yaml::<StructuresConfig>(&structures_path)?.structures;
        Self::check_unique_ids(&structures_path, structures.iter().map(|s| s.id.as_str()))?;

        Ok(Self::from_config(PayrollConfig::new(
            metadata, components, structures,
        )))
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn check_unique_ids<'a>(
        path: &Path,
        ids: impl Iterator<Item = &'a str>,
    ) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate id '{}'", id),
                });
            }
        }
        Ok(())
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        self.config.metadata()
    }

    /// Returns the component catalog in configured order.
    pub fn components(&self) -> &[Component] {
        self.config.components()
    }

    /// Returns all salary structures.
    pub fn structures(&self) -> &[SalaryStructure] {
        self.config.structures()
    }

    /// Gets a component by its id.
    pub fn get_component(&self, id: &str) -> EngineResult<&Component> {
        self.config
            .find(id)
            .ok_or_else(|| EngineError::ComponentNotFound { id: id.to_string() })
    }

    /// Gets a salary structure by its id.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/standard")?;
    /// let structure = loader.get_structure("struct_standard")?;
    /// println!("Structure: {}", structure.name);
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn get_structure(&self, id: &str) -> EngineResult<&SalaryStructure> {
        self.config
            .structures()
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| EngineError::StructureNotFound { id: id.to_string() })
    }

    /// Gets the salary structure assigned to an employee.
    pub fn structure_for(&self, employee: &Employee) -> EngineResult<&SalaryStructure> {
        let id = employee.salary_structure_id.as_deref().ok_or_else(|| {
            EngineError::StructureNotAssigned {
                id: employee.id.clone(),
            }
        })?;
        self.get_structure(id)
    }
}
