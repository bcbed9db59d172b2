//! Strict formula and catalog checks, and formula previews.
//!
//! Nothing here is called during a calculation. The engine stays lenient with
//! dangling references and malformed formulas; these checks let an editing
//! layer reject such data before it is saved.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Component, ComponentCategory, ComponentRef, FormulaTerm};

use super::catalog::{CalculatedAmounts, ComponentCatalog};
use super::component_value::calculate_component_amount;

/// Checks that a formula alternates operands and operators.
///
/// Rejects a leading or trailing operator, two operators or two operands in a
/// row, and any reference to `component_id` itself. An empty formula is valid.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::validate_formula;
/// use payroll_engine::models::{FormulaOperator, FormulaTerm};
///
/// let ok = vec![
///     FormulaTerm::component("basic"),
///     FormulaOperator::Add.into(),
///     FormulaTerm::component("hra"),
/// ];
/// assert!(validate_formula("gross", &ok).is_ok());
///
/// let dangling = vec![FormulaTerm::component("basic"), FormulaOperator::Add.into()];
/// assert!(validate_formula("gross", &dangling).is_err());
/// ```
pub fn validate_formula(component_id: &str, terms: &[FormulaTerm]) -> EngineResult<()> {
    let invalid = |message: String| EngineError::InvalidFormula {
        component_id: component_id.to_string(),
        message,
    };

    if terms.first().is_some_and(FormulaTerm::is_operator) {
        return Err(invalid("formula cannot start with an operator".to_string()));
    }
    if terms.last().is_some_and(FormulaTerm::is_operator) {
        return Err(invalid("formula cannot end with an operator".to_string()));
    }

    for (i, pair) in terms.windows(2).enumerate() {
        match (pair[0].is_operator(), pair[1].is_operator()) {
            (true, true) => {
                return Err(invalid(format!("consecutive operators at term {}", i + 1)));
            }
            (false, false) => {
                return Err(invalid(format!("missing operator before term {}", i + 1)));
            }
            _ => {}
        }
    }

    let self_reference = terms
        .iter()
        .filter_map(FormulaTerm::reference)
        .any(|r| r.component_id() == Some(component_id));
    if self_reference {
        return Err(invalid("formula cannot reference its own component".to_string()));
    }

    Ok(())
}

/// Strictly validates a whole catalog.
///
/// Every formula must pass [`validate_formula`], every referenced id must
/// exist, and no component may depend on itself.
///
/// # Errors
///
/// Returns the first problem found, in catalog order: `InvalidFormula`,
/// `ComponentNotFound` or `CircularReference`.
pub fn validate_catalog<C: ComponentCatalog + ?Sized>(catalog: &C) -> EngineResult<()> {
    for component in catalog.components() {
        if component.component_category == ComponentCategory::Formula {
            validate_formula(&component.id, &component.formula_terms)?;
        }
        if let Some(missing) = component
            .dependencies()
            .into_iter()
            .find(|id| catalog.find(id).is_none())
        {
            return Err(EngineError::ComponentNotFound {
                id: missing.to_string(),
            });
        }
    }

    // Any CTC works here; only the reference structure matters
    let mut cache = CalculatedAmounts::new();
    for component in catalog.components() {
        calculate_component_amount(component, Decimal::ZERO, catalog, &mut cache)?;
    }

    Ok(())
}

/// Renders a formula for display, e.g. `Basic * 2 - 60% of HRA`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::describe_formula;
/// use payroll_engine::models::{Component, ComponentRef, ComponentType, FormulaOperator, FormulaTerm};
/// use rust_decimal::Decimal;
///
/// let catalog = vec![Component::fixed("basic", "Basic", ComponentType::Earning, Decimal::ZERO)];
/// let terms = vec![
///     FormulaTerm::percentage(Decimal::new(60, 0), "basic"),
///     FormulaOperator::Add.into(),
///     FormulaTerm::component(ComponentRef::Ctc),
/// ];
/// assert_eq!(describe_formula(&terms, &catalog), "60% of Basic + CTC (Monthly)");
/// ```
pub fn describe_formula<C: ComponentCatalog + ?Sized>(terms: &[FormulaTerm], catalog: &C) -> String {
    terms
        .iter()
        .map(|term| match term {
            FormulaTerm::Operator(op) => op.symbol().to_string(),
            FormulaTerm::Component(reference) => reference_name(reference, catalog).to_string(),
            FormulaTerm::Percentage { percent, reference } => {
                format!(
                    "{}% of {}",
                    percent.normalize(),
                    reference_name(reference, catalog)
                )
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn reference_name<'c, C: ComponentCatalog + ?Sized>(
    reference: &ComponentRef,
    catalog: &'c C,
) -> &'c str {
    match reference {
        ComponentRef::Ctc => "CTC (Monthly)",
        ComponentRef::Component(id) => catalog
            .find(id)
            .map(|c: &Component| c.name.as_str())
            .unwrap_or("Unknown"),
    }
}
