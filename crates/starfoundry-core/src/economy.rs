//! The economy model: current quantities, owned producers, purchased
//! upgrades, derived effects, and the cost/affordability/output math.
//!
//! `EconomyState` is an owned, passed-by-reference value with no ambient
//! access; the tick engine is the only mutator of quantities during normal
//! play (purchases and restore go through the methods here).

use crate::catalog::{Catalog, ProducerDef};
use crate::event::EventLog;
use crate::id::{ProducerId, UpgradeId};
use crate::resource::{ResourceKind, ResourceVec};
use crate::upgrade::Effects;

/// Cap on purchased upgrades accepted from a restored snapshot.
pub const MAX_PURCHASED_UPGRADES: usize = 32;

/// Cost of the next unit of a blueprint: `ceil(base * growth^owned)` per
/// resource. Growth compounds per unit already owned.
pub fn producer_cost(def: &ProducerDef, owned: u32) -> ResourceVec {
    let scale = def.cost_growth.powi(owned as i32);
    let mut cost = ResourceVec::ZERO;
    for (kind, base) in def.base_cost.iter() {
        if base > 0.0 {
            cost.set(kind, (base * scale).ceil());
        }
    }
    cost
}

/// Mutable session economy state.
#[derive(Debug, Clone)]
pub struct EconomyState {
    /// Current quantity per resource. Never negative; Energy never exceeds
    /// its storage cap.
    pub resources: ResourceVec,
    /// Owned count per producer, dense by [`ProducerId`].
    owned: Vec<u32>,
    /// Purchased upgrades, insertion order, no duplicates.
    purchased: Vec<UpgradeId>,
    /// Derived modifiers. Recomputed, never persisted.
    pub effects: Effects,
    /// Bounded recent-events log.
    pub log: EventLog,
    /// Timestamp of the last engine invocation, epoch milliseconds.
    pub last_update_ms: i64,
    /// Stardust multiplier imported from a legacy save. 1 when absent.
    pub legacy_stardust_bonus: f64,
}

impl EconomyState {
    /// Fresh new-game state.
    pub fn new(catalog: &Catalog, now_ms: i64) -> Self {
        Self {
            resources: ResourceVec::ZERO,
            owned: vec![0; catalog.producer_count()],
            purchased: Vec::new(),
            effects: Effects::baseline(catalog.producer_count()),
            log: EventLog::new(),
            last_update_ms: now_ms,
            legacy_stardust_bonus: 1.0,
        }
    }

    // -----------------------------------------------------------------------
    // Producers
    // -----------------------------------------------------------------------

    pub fn owned(&self, id: ProducerId) -> u32 {
        self.owned.get(id.0 as usize).copied().unwrap_or(0)
    }

    pub(crate) fn increment_owned(&mut self, id: ProducerId) {
        if let Some(count) = self.owned.get_mut(id.0 as usize) {
            *count += 1;
        }
    }

    pub(crate) fn set_owned(&mut self, id: ProducerId, count: u32) {
        if let Some(slot) = self.owned.get_mut(id.0 as usize) {
            *slot = count;
        }
    }

    /// Next-unit cost for a producer.
    pub fn next_cost(&self, catalog: &Catalog, id: ProducerId) -> Option<ResourceVec> {
        let def = catalog.producer(id)?;
        Some(producer_cost(def, self.owned(id)))
    }

    /// True when the blueprint has no prerequisite, or it is purchased.
    pub fn is_unlocked(&self, def: &ProducerDef) -> bool {
        match def.requires_upgrade {
            None => true,
            Some(required) => self.has_purchased(required),
        }
    }

    /// Per-unit output rates with producer and global multipliers applied.
    pub fn per_unit_output(&self, def: &ProducerDef, id: ProducerId) -> ResourceVec {
        let producer_mult = self.effects.producer_mult(id);
        let mut out = ResourceVec::ZERO;
        for (kind, base) in def.outputs.iter() {
            if base > 0.0 {
                out.set(kind, base * producer_mult * self.effects.global_mult[kind]);
            }
        }
        out
    }

    /// Total Energy upkeep rate for all owned units of a producer.
    pub fn total_upkeep(&self, def: &ProducerDef, id: ProducerId) -> f64 {
        def.energy_upkeep * self.effects.producer_mult(id) * self.owned(id) as f64
    }

    // -----------------------------------------------------------------------
    // Wallet
    // -----------------------------------------------------------------------

    /// True iff every resource in `cost` is covered by current quantities.
    pub fn can_afford(&self, cost: &ResourceVec) -> bool {
        cost.iter().all(|(kind, amount)| self.resources[kind] >= amount)
    }

    /// Subtract a cost, floored at zero per resource. Safe to call without
    /// a prior affordability check.
    pub fn spend(&mut self, cost: &ResourceVec) {
        for (kind, amount) in cost.iter() {
            let remaining = (self.resources[kind] - amount).max(0.0);
            self.resources.set(kind, remaining);
        }
    }

    // -----------------------------------------------------------------------
    // Upgrades
    // -----------------------------------------------------------------------

    pub fn purchased(&self) -> &[UpgradeId] {
        &self.purchased
    }

    pub fn has_purchased(&self, id: UpgradeId) -> bool {
        self.purchased.contains(&id)
    }

    /// Record a purchase. Returns false (and changes nothing) on duplicates.
    pub(crate) fn mark_purchased(&mut self, id: UpgradeId) -> bool {
        if self.has_purchased(id) {
            return false;
        }
        self.purchased.push(id);
        true
    }

    /// Replace the purchased set from a restored snapshot: deduplicated,
    /// capped at [`MAX_PURCHASED_UPGRADES`].
    pub(crate) fn restore_purchased(&mut self, ids: Vec<UpgradeId>) {
        self.purchased.clear();
        for id in ids {
            if self.purchased.len() >= MAX_PURCHASED_UPGRADES {
                break;
            }
            if !self.purchased.contains(&id) {
                self.purchased.push(id);
            }
        }
    }

    /// Wipe all progress back to new-game state.
    pub fn reset(&mut self, catalog: &Catalog, now_ms: i64) {
        self.resources = ResourceVec::ZERO;
        self.owned = vec![0; catalog.producer_count()];
        self.purchased.clear();
        self.legacy_stardust_bonus = 1.0;
        self.effects = Effects::baseline(catalog.producer_count());
        self.log.clear();
        self.last_update_ms = now_ms;
    }
}
