/// Cargo carried by a single rocket.
/// Quantities are whole units; a cargo type at zero is absent, never stored as 0.

use std::collections::BTreeMap;

use crate::catalog::{CargoAmount, CargoId, CargoType, Catalog};

#[derive(Debug, Clone, Copy, PartialEq)]
struct CargoEntry {
    amount: u32,
    unit_weight: f64,
}

/// Per-rocket cargo manifest keyed by catalog identity.
/// Iteration (and therefore `snapshot`) is ordered by cargo id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CargoLedger {
    entries: BTreeMap<CargoId, CargoEntry>,
}

impl CargoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from a loadout, skipping ids the catalog doesn't know.
    pub fn from_amounts(catalog: &Catalog, amounts: &[CargoAmount]) -> Self {
        let mut ledger = Self::new();
        for amount in amounts {
            match catalog.cargo_type(amount.cargo) {
                Some(cargo) => ledger.set(cargo, amount.amount),
                None => log::warn!("ignoring unknown cargo {} in loadout", amount.cargo),
            }
        }
        ledger
    }

    /// Set the carried quantity. Zero removes the entry.
    pub fn set(&mut self, cargo: &CargoType, amount: u32) {
        if amount == 0 {
            self.entries.remove(&cargo.id);
        } else {
            self.entries.insert(
                cargo.id,
                CargoEntry {
                    amount,
                    unit_weight: cargo.unit_weight,
                },
            );
        }
    }

    /// Add units, returns the new quantity
    pub fn add(&mut self, cargo: &CargoType, amount: u32) -> u32 {
        let total = self.get(cargo.id).saturating_add(amount);
        self.set(cargo, total);
        total
    }

    /// Remove up to `amount` units, returns how many were actually removed
    pub fn remove(&mut self, cargo: &CargoType, amount: u32) -> u32 {
        let current = self.get(cargo.id);
        let removed = amount.min(current);
        self.set(cargo, current - removed);
        removed
    }

    /// Quantity carried, 0 if absent
    pub fn get(&self, cargo: CargoId) -> u32 {
        self.entries.get(&cargo).map(|e| e.amount).unwrap_or(0)
    }

    pub fn contains(&self, cargo: CargoId) -> bool {
        self.entries.contains_key(&cargo)
    }

    /// Sum of quantity × unit weight over every entry
    pub fn total_weight(&self) -> f64 {
        self.entries
            .values()
            .map(|e| e.amount as f64 * e.unit_weight)
            .sum()
    }

    /// Ordered copy of the manifest for events and displays
    pub fn snapshot(&self) -> Vec<CargoAmount> {
        self.entries
            .iter()
            .map(|(id, e)| CargoAmount::new(*id, e.amount))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
