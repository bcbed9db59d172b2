//! Error types for the payroll engine.
//!
//! Most degenerate inputs (dangling references, division by zero, malformed
//! formulas) resolve to numeric defaults and never reach this type. What is
//! left are configuration failures, lookups made on behalf of callers, strict
//! formula validation, and circular component references.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::StructureNotFound {
///     id: "struct_senior".to_string(),
/// };
/// assert_eq!(error.to_string(), "Salary structure not found: struct_senior");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A payroll component id was not present in the catalog.
    #[error("Component not found: {id}")]
    ComponentNotFound {
        /// The component id that was not found.
        id: String,
    },

    /// A salary structure id was not present in the configuration.
    #[error("Salary structure not found: {id}")]
    StructureNotFound {
        /// The structure id that was not found.
        id: String,
    },

    /// An employee has no salary structure to calculate against.
    #[error("Employee '{id}' has no salary structure assigned")]
    StructureNotAssigned {
        /// The employee id.
        id: String,
    },

    /// A payroll run was requested without any employee assigned to a
    /// salary structure.
    #[error("No employees with salary structures assigned")]
    NoEligibleEmployees,

    /// A component was reached again while it was still being resolved.
    #[error("Circular component reference: {path}")]
    CircularReference {
        /// The chain of component ids forming the cycle, joined by arrows.
        path: String,
    },

    /// A formula failed strict validation.
    #[error("Invalid formula for component '{component_id}': {message}")]
    InvalidFormula {
        /// The component owning the formula.
        component_id: String,
        /// What is wrong with the term sequence.
        message: String,
    },

    /// A persisted formula term could not be decoded.
    #[error("Invalid formula term '{value}': {message}")]
    InvalidFormulaTerm {
        /// The raw term value.
        value: String,
        /// A description of the problem.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
