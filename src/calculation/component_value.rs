//! Component value resolution.
//!
//! This module computes the monthly monetary value of a single component,
//! recursively resolving the components it depends on. Results for referenced
//! components are memoized in a [`CalculatedAmounts`] cache so each component
//! is evaluated at most once per run.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Component, ComponentCategory, ComponentRef, monthly_ctc};

use super::catalog::{CalculatedAmounts, ComponentCatalog};

/// Resolution state for one calculation run.
///
/// Holds the run's cache and the chain of components currently being
/// resolved, which is how circular references are detected.
pub(crate) struct Resolver<'a, C: ComponentCatalog + ?Sized> {
    ctc: Decimal,
    catalog: &'a C,
    cache: &'a mut CalculatedAmounts,
    in_progress: Vec<String>,
}

impl<'a, C: ComponentCatalog + ?Sized> Resolver<'a, C> {
    pub(crate) fn new(ctc: Decimal, catalog: &'a C, cache: &'a mut CalculatedAmounts) -> Self {
        Self {
            ctc,
            catalog,
            cache,
            in_progress: Vec::new(),
        }
    }

    /// Computes a component's pre-proration value.
    ///
    /// The component itself is not written to the cache; referenced
    /// components are.
    pub(crate) fn resolve(&mut self, component: &Component) -> EngineResult<Decimal> {
        self.enter(&component.id)?;

        let value = match component.component_category {
            ComponentCategory::Fixed => Ok(component.amount),
            ComponentCategory::Formula => self.evaluate_terms(&component.formula_terms),
            ComponentCategory::Percentage => self.percentage_value(component),
        }?;

        self.in_progress.pop();
        debug!(
            component_id = %component.id,
            category = ?component.component_category,
            value = %value,
            "Resolved component"
        );
        Ok(value)
    }

    /// Resolves a component unless it is already cached, and caches the result.
    pub(crate) fn resolve_cached(&mut self, component: &Component) -> EngineResult<Decimal> {
        if let Some(value) = self.cache.get(&component.id) {
            return Ok(value);
        }

        let value = self.resolve(component)?;
        self.cache.insert(component.id.as_str(), value);
        Ok(value)
    }

    /// Looks a component up by id: cache first, then the catalog.
    ///
    /// A catalog hit is resolved and cached before returning. Returns `None`
    /// for an id that is in neither.
    pub(crate) fn lookup(&mut self, id: &str) -> EngineResult<Option<Decimal>> {
        if let Some(value) = self.cache.get(id) {
            return Ok(Some(value));
        }

        let catalog = self.catalog;
        let Some(component) = catalog.find(id) else {
            return Ok(None);
        };

        let value = self.resolve(component)?;
        self.cache.insert(id, value);
        Ok(Some(value))
    }

    /// Reads a component value from the run's cache.
    pub(crate) fn cached(&self, id: &str) -> Option<Decimal> {
        self.cache.get(id)
    }

    /// The employee's monthly CTC.
    pub(crate) fn monthly_ctc(&self) -> Decimal {
        monthly_ctc(self.ctc)
    }

    fn percentage_value(&mut self, component: &Component) -> EngineResult<Decimal> {
        let base = match &component.based_on {
            ComponentRef::Ctc => self.monthly_ctc(),
            ComponentRef::Component(id) => match self.lookup(id)? {
                Some(value) => value,
                None => {
                    warn!(
                        component_id = %component.id,
                        based_on = %id,
                        "Percentage base not in catalog, falling back to monthly CTC"
                    );
                    self.monthly_ctc()
                }
            },
        };

        percent_of(base, component.amount)
    }

    fn enter(&mut self, id: &str) -> EngineResult<()> {
        if let Some(pos) = self.in_progress.iter().position(|x| x == id) {
            let mut cycle: Vec<&str> = self.in_progress[pos..].iter().map(String::as_str).collect();
            cycle.push(id);
            return Err(EngineError::CircularReference {
                path: cycle.join(" → "),
            });
        }
        self.in_progress.push(id.to_string());
        Ok(())
    }
}

/// Returns `percent`% of `base`.
pub(crate) fn percent_of(base: Decimal, percent: Decimal) -> EngineResult<Decimal> {
    base.checked_mul(percent)
        .map(|scaled| scaled / Decimal::ONE_HUNDRED)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("{}% of {} overflows", percent, base),
        })
}

/// Calculates the monthly value of a component.
///
/// - Fixed components return their amount unchanged.
/// - Percentage components return `amount`% of their base: monthly CTC for
///   `"ctc"`, otherwise the referenced component's value (resolved and cached
///   on a cache miss). A base id missing from the catalog falls back to
///   monthly CTC.
/// - Formula components evaluate their terms (see
///   [`evaluate_formula`](super::evaluate_formula)).
///
/// # Errors
///
/// Returns [`EngineError::CircularReference`] if the component depends on
/// itself, directly or through other components.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{CalculatedAmounts, calculate_component_amount};
/// use payroll_engine::models::{Component, ComponentRef, ComponentType};
/// use rust_decimal::Decimal;
///
/// let basic = Component::percentage(
///     "basic", "Basic", ComponentType::Earning, Decimal::new(50, 0), ComponentRef::Ctc,
/// );
/// let catalog = vec![basic.clone()];
/// let mut cache = CalculatedAmounts::new();
///
/// let amount =
///     calculate_component_amount(&basic, Decimal::new(1_200_000, 0), &catalog, &mut cache).unwrap();
/// assert_eq!(amount, Decimal::new(50_000, 0));
/// ```
pub fn calculate_component_amount<C: ComponentCatalog + ?Sized>(
    component: &Component,
    ctc: Decimal,
    catalog: &C,
    cache: &mut CalculatedAmounts,
) -> EngineResult<Decimal> {
    Resolver::new(ctc, catalog, cache).resolve(component)
}
