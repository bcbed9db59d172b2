//! Payroll component model and formula terms.
//!
//! Components reference each other by id, either through `based_on` for
//! percentage components or through the terms of a formula. References are
//! plain ids rather than embedded objects so the resolver can treat the
//! catalog as a graph keyed by stable identifiers.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The sentinel used in persisted data to reference the employee's CTC.
pub const CTC_REFERENCE: &str = "ctc";

/// Whether a component adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Adds to gross pay.
    #[serde(alias = "earnings")]
    Earning,
    /// Subtracted from gross pay to reach net pay.
    #[serde(alias = "deductions")]
    Deduction,
}

/// How a component's monetary value is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    /// `amount` is the monthly value.
    Fixed,
    /// `amount` percent of the `based_on` reference.
    Percentage,
    /// Arithmetic over other components, described by `formula_terms`.
    Formula,
}

/// A reference to a value a component can be derived from.
///
/// Serialized as a bare string: `"ctc"` or a component id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentRef {
    /// The employee's monthly CTC (annual CTC / 12).
    #[default]
    Ctc,
    /// Another component in the catalog.
    Component(String),
}

impl ComponentRef {
    /// Creates a reference to a component by id.
    pub fn component(id: impl Into<String>) -> Self {
        ComponentRef::Component(id.into())
    }

    /// Returns the referenced component id, or `None` for CTC.
    pub fn component_id(&self) -> Option<&str> {
        match self {
            ComponentRef::Ctc => None,
            ComponentRef::Component(id) => Some(id),
        }
    }
}

impl From<String> for ComponentRef {
    fn from(value: String) -> Self {
        if value == CTC_REFERENCE {
            ComponentRef::Ctc
        } else {
            ComponentRef::Component(value)
        }
    }
}

impl From<&str> for ComponentRef {
    fn from(value: &str) -> Self {
        ComponentRef::from(value.to_string())
    }
}

impl From<ComponentRef> for String {
    fn from(value: ComponentRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRef::Ctc => f.write_str(CTC_REFERENCE),
            ComponentRef::Component(id) => f.write_str(id),
        }
    }
}

/// An arithmetic operator inside a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl FormulaOperator {
    /// Returns true for `*` and `/`, which bind tighter than `+` and `-`.
    pub fn is_high_precedence(self) -> bool {
        matches!(self, FormulaOperator::Multiply | FormulaOperator::Divide)
    }

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            FormulaOperator::Add => "+",
            FormulaOperator::Subtract => "-",
            FormulaOperator::Multiply => "*",
            FormulaOperator::Divide => "/",
        }
    }
}

impl FromStr for FormulaOperator {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(FormulaOperator::Add),
            "-" => Ok(FormulaOperator::Subtract),
            "*" => Ok(FormulaOperator::Multiply),
            "/" => Ok(FormulaOperator::Divide),
            other => Err(EngineError::InvalidFormulaTerm {
                value: other.to_string(),
                message: "operator must be one of + - * /".to_string(),
            }),
        }
    }
}

impl fmt::Display for FormulaOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single term of a formula.
///
/// Persisted data stores terms as `{"type": ..., "value": ...}` with the
/// percentage case packed into one string (`"60%basic"`). That encoding is
/// handled at the serde boundary; inside the engine each case has typed fields.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentRef, FormulaTerm};
/// use rust_decimal::Decimal;
///
/// let term: FormulaTerm =
///     serde_json::from_str(r#"{"type": "percentage", "value": "60%basic"}"#).unwrap();
/// assert_eq!(
///     term,
///     FormulaTerm::Percentage {
///         percent: Decimal::new(60, 0),
///         reference: ComponentRef::component("basic"),
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFormulaTerm", into = "RawFormulaTerm")]
pub enum FormulaTerm {
    /// An arithmetic operator.
    Operator(FormulaOperator),
    /// The full value of a component (or monthly CTC).
    Component(ComponentRef),
    /// A percentage of a component (or monthly CTC).
    Percentage {
        /// The percentage magnitude, e.g. `60` for 60%.
        percent: Decimal,
        /// The value the percentage is taken of.
        reference: ComponentRef,
    },
}

impl FormulaTerm {
    /// Shorthand for a component reference term.
    pub fn component(reference: impl Into<ComponentRef>) -> Self {
        FormulaTerm::Component(reference.into())
    }

    /// Shorthand for a percentage-of-component term.
    pub fn percentage(percent: Decimal, reference: impl Into<ComponentRef>) -> Self {
        FormulaTerm::Percentage {
            percent,
            reference: reference.into(),
        }
    }

    /// Returns true if this term is an operator.
    pub fn is_operator(&self) -> bool {
        matches!(self, FormulaTerm::Operator(_))
    }

    /// Returns the reference carried by an operand term.
    pub fn reference(&self) -> Option<&ComponentRef> {
        match self {
            FormulaTerm::Operator(_) => None,
            FormulaTerm::Component(reference) => Some(reference),
            FormulaTerm::Percentage { reference, .. } => Some(reference),
        }
    }
}

impl From<FormulaOperator> for FormulaTerm {
    fn from(op: FormulaOperator) -> Self {
        FormulaTerm::Operator(op)
    }
}

/// The persisted shape of a formula term.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFormulaTerm {
    #[serde(rename = "type")]
    kind: RawTermKind,
    value: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawTermKind {
    Component,
    Percentage,
    Operator,
}

impl TryFrom<RawFormulaTerm> for FormulaTerm {
    type Error = EngineError;

    fn try_from(raw: RawFormulaTerm) -> Result<Self, Self::Error> {
        match raw.kind {
            RawTermKind::Operator => raw.value.parse().map(FormulaTerm::Operator),
            RawTermKind::Component => {
                if raw.value.is_empty() {
                    return Err(EngineError::InvalidFormulaTerm {
                        value: raw.value,
                        message: "component reference cannot be empty".to_string(),
                    });
                }
                Ok(FormulaTerm::Component(ComponentRef::from(raw.value)))
            }
            RawTermKind::Percentage => parse_percentage(&raw.value),
        }
    }
}

impl From<FormulaTerm> for RawFormulaTerm {
    fn from(term: FormulaTerm) -> Self {
        match term {
            FormulaTerm::Operator(op) => RawFormulaTerm {
                kind: RawTermKind::Operator,
                value: op.symbol().to_string(),
            },
            FormulaTerm::Component(reference) => RawFormulaTerm {
                kind: RawTermKind::Component,
                value: reference.to_string(),
            },
            FormulaTerm::Percentage { percent, reference } => RawFormulaTerm {
                kind: RawTermKind::Percentage,
                value: format!("{}%{}", percent.normalize(), reference),
            },
        }
    }
}

/// Parses the packed `"<magnitude>%<reference>"` form.
fn parse_percentage(value: &str) -> Result<FormulaTerm, EngineError> {
    let invalid = |message: &str| EngineError::InvalidFormulaTerm {
        value: value.to_string(),
        message: message.to_string(),
    };

    let (magnitude, reference) = value
        .split_once('%')
        .ok_or_else(|| invalid("expected '<percent>%<component>'"))?;

    if !is_plain_number(magnitude) {
        return Err(invalid("percentage must be a plain decimal number"));
    }
    if reference.is_empty() {
        return Err(invalid("percentage must reference a component"));
    }

    let percent = Decimal::from_str(magnitude)
        .map_err(|e| invalid(&format!("percentage out of range: {}", e)))?;

    Ok(FormulaTerm::Percentage {
        percent,
        reference: ComponentRef::from(reference),
    })
}

/// Matches `digits` or `digits.digits`.
fn is_plain_number(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    match parts.next() {
        Some(frac) => all_digits(whole) && all_digits(frac),
        None => all_digits(whole),
    }
}

/// A configurable payroll component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier for the component.
    pub id: String,
    /// Display name used on line items.
    pub name: String,
    /// Earning or deduction.
    pub component_type: ComponentType,
    /// Fixed, percentage or formula.
    pub component_category: ComponentCategory,
    /// Fixed monthly value or percentage magnitude. Ignored for formulas.
    #[serde(default)]
    pub amount: Decimal,
    /// What a percentage component is a percentage of.
    #[serde(default)]
    pub based_on: ComponentRef,
    /// Ordered formula terms, only meaningful for the formula category.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formula_terms: Vec<FormulaTerm>,
    /// Whether loss-of-pay proration applies.
    #[serde(default)]
    pub apply_lop_deduction: bool,
}

impl Component {
    /// Creates a fixed-amount component.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Component, ComponentType};
    /// use rust_decimal::Decimal;
    ///
    /// let conveyance = Component::fixed("conv", "Conveyance", ComponentType::Earning, Decimal::new(1600, 0));
    /// assert!(conveyance.is_earning());
    /// ```
    pub fn fixed(
        id: impl Into<String>,
        name: impl Into<String>,
        component_type: ComponentType,
        amount: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component_type,
            component_category: ComponentCategory::Fixed,
            amount,
            based_on: ComponentRef::Ctc,
            formula_terms: Vec::new(),
            apply_lop_deduction: false,
        }
    }

    /// Creates a component worth `percent`% of `based_on`.
    pub fn percentage(
        id: impl Into<String>,
        name: impl Into<String>,
        component_type: ComponentType,
        percent: Decimal,
        based_on: impl Into<ComponentRef>,
    ) -> Self {
        Self {
            component_category: ComponentCategory::Percentage,
            based_on: based_on.into(),
            ..Self::fixed(id, name, component_type, percent)
        }
    }

    /// Creates a formula component.
    pub fn formula(
        id: impl Into<String>,
        name: impl Into<String>,
        component_type: ComponentType,
        terms: Vec<FormulaTerm>,
    ) -> Self {
        Self {
            component_category: ComponentCategory::Formula,
            formula_terms: terms,
            ..Self::fixed(id, name, component_type, Decimal::ZERO)
        }
    }

    /// Marks the component as subject to loss-of-pay proration.
    pub fn with_lop_deduction(mut self) -> Self {
        self.apply_lop_deduction = true;
        self
    }

    /// Returns true if the component is an earning.
    pub fn is_earning(&self) -> bool {
        self.component_type == ComponentType::Earning
    }

    /// Returns the component ids this component depends on directly.
    pub fn dependencies(&self) -> Vec<&str> {
        match self.component_category {
            ComponentCategory::Fixed => Vec::new(),
            ComponentCategory::Percentage => self.based_on.component_id().into_iter().collect(),
            ComponentCategory::Formula => self
                .formula_terms
                .iter()
                .filter_map(FormulaTerm::reference)
                .filter_map(ComponentRef::component_id)
                .collect(),
        }
    }
}
