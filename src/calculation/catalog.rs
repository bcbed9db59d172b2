//! Component catalog access and the per-run amounts cache.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::Component;

/// Read-only access to the full component catalog.
///
/// The engine only needs ordered iteration (for structure filtering) and
/// lookup by id (for resolving references). Slices and vectors of components
/// implement this directly; callers that index their catalog differently can
/// provide their own implementation.
pub trait ComponentCatalog {
    /// Returns every component in stable catalog order.
    fn components(&self) -> &[Component];

    /// Finds a component by id.
    fn find(&self, id: &str) -> Option<&Component> {
        self.components().iter().find(|c| c.id == id)
    }
}

impl ComponentCatalog for [Component] {
    fn components(&self) -> &[Component] {
        self
    }
}

impl ComponentCatalog for Vec<Component> {
    fn components(&self) -> &[Component] {
        self
    }
}

/// Pre-proration component values computed during one breakdown run.
///
/// Scoped to a single calculation; a component present here is never
/// evaluated again in the same run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatedAmounts {
    amounts: HashMap<String, Decimal>,
}

impl CalculatedAmounts {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for a component.
    pub fn get(&self, id: &str) -> Option<Decimal> {
        self.amounts.get(id).copied()
    }

    /// Stores a component's value.
    pub fn insert(&mut self, id: impl Into<String>, amount: Decimal) {
        self.amounts.insert(id.into(), amount);
    }
}
