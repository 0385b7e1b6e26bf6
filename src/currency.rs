use std::collections::BTreeMap;

use crate::catalog::{Catalog, CurrencyAmount, CurrencyId};
use crate::events::{EventQueue, GameEvent};

/// Player balances, one per catalog currency.
/// Every mutation queues a `CurrencyChanged` for the displays.
#[derive(Debug, Clone, Default)]
pub struct CurrencyLedger {
    balances: BTreeMap<CurrencyId, i64>,
}

impl CurrencyLedger {
    /// Every catalog currency starts at zero
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            balances: catalog.currencies.iter().map(|c| (c.id, 0)).collect(),
        }
    }

    /// New ledger holding the catalog's starting balances
    pub fn with_starting_balances(catalog: &Catalog, events: &mut EventQueue) -> Self {
        let mut ledger = Self::new(catalog);
        ledger.add_all(&catalog.starting_currency, 1, events);
        ledger
    }

    /// Current balance (0 for currencies never seen)
    pub fn get(&self, currency: CurrencyId) -> i64 {
        self.balances.get(&currency).copied().unwrap_or(0)
    }

    /// Add to a single balance (rewards, refunds)
    pub fn add(&mut self, currency: CurrencyId, amount: i64, events: &mut EventQueue) {
        *self.balances.entry(currency).or_insert(0) += amount;
        events.push(GameEvent::CurrencyChanged);
    }

    /// Add every amount × multiplier
    pub fn add_all(&mut self, amounts: &[CurrencyAmount], multiplier: u32, events: &mut EventQueue) {
        for amount in amounts {
            self.add(amount.currency, amount.amount * i64::from(multiplier), events);
        }
    }

    /// Check every required amount × multiplier is covered
    pub fn can_afford(&self, cost: &[CurrencyAmount], multiplier: u32) -> bool {
        self.can_afford_with_credit(cost, multiplier, &[])
    }

    /// Like `can_afford`, counting `credit` (e.g. a pending refund) as already paid in
    pub fn can_afford_with_credit(
        &self,
        cost: &[CurrencyAmount],
        multiplier: u32,
        credit: &[CurrencyAmount],
    ) -> bool {
        cost.iter().all(|required| {
            let credited: i64 = credit
                .iter()
                .filter(|c| c.currency == required.currency)
                .map(|c| c.amount)
                .sum();
            self.get(required.currency) + credited >= required.amount * i64::from(multiplier)
        })
    }

    /// Deduct cost × multiplier without checking
    /// Callers check `can_afford` first; this can drive a balance negative
    pub fn spend(&mut self, cost: &[CurrencyAmount], multiplier: u32, events: &mut EventQueue) {
        for amount in cost {
            *self.balances.entry(amount.currency).or_insert(0) -= amount.amount * i64::from(multiplier);
        }
        events.push(GameEvent::CurrencyChanged);
    }

    /// Ordered (currency, balance) pairs
    pub fn balances(&self) -> Vec<CurrencyAmount> {
        self.balances
            .iter()
            .map(|(id, amount)| CurrencyAmount::new(*id, *amount))
            .collect()
    }
}
