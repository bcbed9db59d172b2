//! Formula evaluation.
//!
//! A formula is a flat, left-to-right sequence of operands and operators with
//! two precedence tiers: `*` and `/` bind tighter than `+` and `-`. There are
//! no parentheses and no unary minus.
//!
//! The evaluator does not validate the sequence. Malformed input (a leading or
//! trailing operator, two operators in a row) is reduced mechanically: a
//! missing operand counts as zero. Use
//! [`validate_formula`](super::validate_formula) to reject such sequences up
//! front.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{ComponentRef, FormulaOperator, FormulaTerm};

use super::catalog::{CalculatedAmounts, ComponentCatalog};
use super::component_value::{Resolver, percent_of};

impl<C: ComponentCatalog + ?Sized> Resolver<'_, C> {
    /// Splits the terms into operand and operator streams, then reduces them.
    pub(crate) fn evaluate_terms(&mut self, terms: &[FormulaTerm]) -> EngineResult<Decimal> {
        let mut operands = Vec::with_capacity(terms.len() / 2 + 1);
        let mut operators = Vec::with_capacity(terms.len() / 2);

        for term in terms {
            match term {
                FormulaTerm::Operator(op) => operators.push(*op),
                FormulaTerm::Component(reference) => {
                    operands.push(self.reference_value(reference)?);
                }
                FormulaTerm::Percentage { percent, reference } => {
                    let base = self.reference_value(reference)?;
                    operands.push(percent_of(base, *percent)?);
                }
            }
        }

        reduce(operands, operators)
    }

    /// Value of a formula operand reference. Unknown ids count as zero.
    fn reference_value(&mut self, reference: &ComponentRef) -> EngineResult<Decimal> {
        match reference {
            ComponentRef::Ctc => Ok(self.monthly_ctc()),
            ComponentRef::Component(id) => match self.lookup(id)? {
                Some(value) => Ok(value),
                None => {
                    warn!(reference = %id, "Formula references unknown component, using zero");
                    Ok(Decimal::ZERO)
                }
            },
        }
    }
}

/// Reduces operand and operator streams with two-tier precedence.
///
/// Pass one folds every `*` and `/` into its neighbours, left to right, without
/// advancing past a reduction so consecutive high-precedence operators chain.
/// Pass two left-folds the remaining `+` and `-`.
pub(crate) fn reduce(
    mut operands: Vec<Decimal>,
    mut operators: Vec<FormulaOperator>,
) -> EngineResult<Decimal> {
    let mut i = 0;
    while i < operators.len() {
        let op = operators[i];
        if !op.is_high_precedence() {
            i += 1;
            continue;
        }

        let left = operands.get(i).copied().unwrap_or_default();
        let right = operands.get(i + 1).copied().unwrap_or_default();
        let reduced = apply(op, left, right)?;

        if i + 1 < operands.len() {
            operands.remove(i + 1);
        }
        match operands.get_mut(i) {
            Some(slot) => *slot = reduced,
            None => operands.push(reduced),
        }
        operators.remove(i);
    }

    let mut result = operands.first().copied().unwrap_or_default();
    for (i, op) in operators.iter().enumerate() {
        let right = operands.get(i + 1).copied().unwrap_or_default();
        result = apply(*op, result, right)?;
    }

    Ok(result)
}

fn apply(op: FormulaOperator, left: Decimal, right: Decimal) -> EngineResult<Decimal> {
    let value = match op {
        FormulaOperator::Add => left.checked_add(right),
        FormulaOperator::Subtract => left.checked_sub(right),
        FormulaOperator::Multiply => left.checked_mul(right),
        // x / 0 is defined as 0
        FormulaOperator::Divide if right.is_zero() => Some(Decimal::ZERO),
        FormulaOperator::Divide => left.checked_div(right),
    };

    value.ok_or_else(|| EngineError::CalculationError {
        message: format!("{} {} {} overflows", left, op, right),
    })
}

/// Evaluates a formula term sequence.
///
/// Component references resolve to the referenced component's value (cache
/// first, otherwise resolved and cached). `ctc` resolves to monthly CTC.
/// Percentage terms take that value and scale it. An id missing from the
/// catalog contributes zero, as does dividing by zero. An empty sequence
/// evaluates to zero.
///
/// # Errors
///
/// Returns [`EngineError::CircularReference`] if a referenced component
/// depends back on a component still being resolved.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{CalculatedAmounts, evaluate_formula};
/// use payroll_engine::models::{Component, ComponentType, FormulaOperator, FormulaTerm};
/// use rust_decimal::Decimal;
///
/// let catalog = vec![
///     Component::fixed("a", "A", ComponentType::Earning, Decimal::new(100, 0)),
///     Component::fixed("two", "Two", ComponentType::Earning, Decimal::new(2, 0)),
///     Component::fixed("b", "B", ComponentType::Earning, Decimal::new(50, 0)),
/// ];
/// let terms = vec![
///     FormulaTerm::component("a"),
///     FormulaOperator::Multiply.into(),
///     FormulaTerm::component("two"),
///     FormulaOperator::Subtract.into(),
///     FormulaTerm::component("b"),
/// ];
///
/// let mut cache = CalculatedAmounts::new();
/// let value = evaluate_formula(&terms, Decimal::ZERO, &catalog, &mut cache).unwrap();
/// assert_eq!(value, Decimal::new(150, 0));
/// ```
pub fn evaluate_formula<C: ComponentCatalog + ?Sized>(
    terms: &[FormulaTerm],
    ctc: Decimal,
    catalog: &C,
    cache: &mut CalculatedAmounts,
) -> EngineResult<Decimal> {
    Resolver::new(ctc, catalog, cache).evaluate_terms(terms)
}
