//! The tick engine: applies elapsed wall-clock time to the economy.
//!
//! # Two-Phase Delta Computation
//!
//! Each [`Engine::apply_delta`] call runs two phases:
//!
//! 1. **Theoretical** -- sum nominal per-second outputs and Energy upkeep
//!    across every owned producer, with upgrade multipliers applied.
//! 2. **Constrained** -- balance Energy supply (stock plus concurrent
//!    production) against upkeep demand, derive the satisfaction ratio,
//!    scale the non-Energy outputs of upkeep-bearing producers by it, and
//!    apply the resulting gains.
//!
//! The computation is time-scale invariant: one call for `Δt` yields the
//! same final state (up to floating-point rounding) as repeated calls
//! summing to `Δt`. The offline reconciler relies on this to replay hours
//! of absence as a single step.
//!
//! Energy production is never throttled by its own consumption in the same
//! step; only consumption is capped by supply.

use crate::catalog::Catalog;
use crate::economy::{EconomyState, producer_cost};
use crate::id::{ProducerId, UpgradeId};
use crate::resource::{ENERGY_STORAGE_CAP, ResourceKind, ResourceVec};
use crate::upgrade::Effects;

/// Below this satisfaction ratio the scarcity warning may fire.
pub const ENERGY_WARNING_THRESHOLD: f64 = 0.98;

/// Seconds between scarcity warnings while the condition persists.
pub const ENERGY_WARNING_COOLDOWN_SECS: f64 = 12.0;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Actual rates and Energy accounting from the most recent applied delta.
/// Consumed by presentation and by the scarcity-warning policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMetrics {
    /// Actual per-second production rates after energy scaling.
    pub rates: ResourceVec,
    /// Theoretical Energy upkeep demand, per second.
    pub energy_upkeep_rate: f64,
    /// Energy actually consumed, per second.
    pub energy_consumption_rate: f64,
    /// Fraction of upkeep demand satisfied. 1 when there is no demand.
    pub energy_ratio: f64,
    /// Energy production rate minus actual consumption rate.
    pub net_energy_rate: f64,
}

impl Default for TickMetrics {
    fn default() -> Self {
        Self {
            rates: ResourceVec::ZERO,
            energy_upkeep_rate: 0.0,
            energy_consumption_rate: 0.0,
            energy_ratio: 1.0,
            net_energy_rate: 0.0,
        }
    }
}

/// Resource gains realized by one applied delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeltaGains {
    pub stardust: f64,
    pub research: f64,
    /// Signed change in banked Energy.
    pub net_energy: f64,
}

/// Outcome of a [`Engine::tick`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub metrics: TickMetrics,
    pub gains: DeltaGains,
    /// Elapsed seconds this tick covered (zero for stale timestamps).
    pub elapsed_secs: f64,
    /// True when the cooldown-gated scarcity warning fired this tick.
    pub energy_strained: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a purchase was rejected. Rejection never mutates state.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PurchaseError {
    #[error("unknown producer id {0:?}")]
    UnknownProducer(ProducerId),
    #[error("unknown upgrade id {0:?}")]
    UnknownUpgrade(UpgradeId),
    #[error("'{0}' requires an upgrade that has not been researched")]
    Locked(String),
    #[error("'{0}' has already been researched")]
    AlreadyPurchased(String),
    #[error("insufficient resources for '{0}'")]
    Unaffordable(String),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the catalog and the economy state, and is the sole mutator of
/// resource quantities during normal play.
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    pub state: EconomyState,
    metrics: TickMetrics,
    /// Seconds until the scarcity warning may fire again.
    warning_cooldown: f64,
}

impl Engine {
    pub fn new(catalog: Catalog, now_ms: i64) -> Self {
        let state = EconomyState::new(&catalog, now_ms);
        Self {
            catalog,
            state,
            metrics: TickMetrics::default(),
            warning_cooldown: 0.0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Metrics from the most recent applied delta.
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// Recompute derived effects from the purchased set. Invoked after
    /// every purchase and every restore.
    pub fn recompute_effects(&mut self) {
        self.state.effects = Effects::recompute(
            &self.catalog,
            self.state.purchased(),
            self.state.legacy_stardust_bonus,
        );
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Nominal totals for every producer with a nonzero owned count:
    /// `(per-producer contributions, summed rates, summed upkeep rate)`.
    fn theoretical_totals(&self) -> (Vec<(ResourceVec, f64)>, ResourceVec, f64) {
        let mut contributions = Vec::new();
        let mut rates = ResourceVec::ZERO;
        let mut upkeep_rate = 0.0;
        for (id, def) in self.catalog.producers() {
            let count = self.state.owned(id);
            if count == 0 {
                continue;
            }
            let per_unit = self.state.per_unit_output(def, id);
            let mut outputs = ResourceVec::ZERO;
            for (kind, rate) in per_unit.iter() {
                if rate > 0.0 {
                    let total = rate * count as f64;
                    outputs.set(kind, total);
                    rates.add(kind, total);
                }
            }
            let upkeep = self.state.total_upkeep(def, id);
            upkeep_rate += upkeep;
            contributions.push((outputs, upkeep));
        }
        (contributions, rates, upkeep_rate)
    }

    /// Apply `dt_secs` of production to the economy.
    ///
    /// `dt_secs <= 0` is a no-op returning the previous metrics unchanged.
    pub fn apply_delta(&mut self, dt_secs: f64) -> (TickMetrics, DeltaGains) {
        if dt_secs <= 0.0 {
            return (self.metrics, DeltaGains::default());
        }

        let (contributions, theoretical, upkeep_rate) = self.theoretical_totals();

        // Energy accounting for this step. Concurrent production counts
        // toward supply; consumption is capped by what is available.
        let prev_energy = self.state.resources[ResourceKind::Energy];
        let energy_produced_rate = theoretical[ResourceKind::Energy];
        let energy_produced = energy_produced_rate * dt_secs;
        let energy_required = upkeep_rate * dt_secs;
        let energy_available = prev_energy + energy_produced;
        let energy_spent = energy_required.min(energy_available);
        let (energy_ratio, consumption_rate) = if energy_required > 0.0 {
            (energy_spent / energy_required, energy_spent / dt_secs)
        } else {
            (1.0, 0.0)
        };

        // Energy generation runs at the full theoretical rate; scarcity
        // only idles the non-Energy outputs of upkeep-bearing producers.
        let mut rates = ResourceVec::of(ResourceKind::Energy, energy_produced_rate);
        for (outputs, upkeep) in &contributions {
            let scale = if *upkeep > 0.0 { energy_ratio } else { 1.0 };
            rates.add(ResourceKind::Stardust, outputs[ResourceKind::Stardust] * scale);
            rates.add(ResourceKind::Research, outputs[ResourceKind::Research] * scale);
        }

        let stardust_gain = rates[ResourceKind::Stardust] * dt_secs;
        let research_gain = rates[ResourceKind::Research] * dt_secs;
        let energy_final = (energy_available - energy_spent)
            .max(0.0)
            .min(ENERGY_STORAGE_CAP);

        self.state.resources.add(ResourceKind::Stardust, stardust_gain);
        self.state.resources.add(ResourceKind::Research, research_gain);
        self.state.resources.set(ResourceKind::Energy, energy_final);

        let metrics = TickMetrics {
            rates,
            energy_upkeep_rate: upkeep_rate,
            energy_consumption_rate: consumption_rate,
            energy_ratio,
            net_energy_rate: rates[ResourceKind::Energy] - consumption_rate,
        };
        self.metrics = metrics;

        let gains = DeltaGains {
            stardust: stardust_gain,
            research: research_gain,
            net_energy: energy_final - prev_energy,
        };
        (metrics, gains)
    }

    /// Advance to `now_ms`: apply the elapsed delta, overwrite the
    /// last-update timestamp, and drive the scarcity-warning cooldown.
    pub fn tick(&mut self, now_ms: i64) -> TickOutcome {
        let dt_secs = (now_ms - self.state.last_update_ms) as f64 / 1000.0;
        self.state.last_update_ms = now_ms;

        let (metrics, gains) = self.apply_delta(dt_secs);

        let elapsed = dt_secs.max(0.0);
        self.warning_cooldown = (self.warning_cooldown - elapsed).max(0.0);
        let mut energy_strained = false;
        if metrics.energy_ratio < ENERGY_WARNING_THRESHOLD && self.warning_cooldown <= 0.0 {
            self.state
                .log
                .push("Energy reserves strained; some facilities are idling.", now_ms);
            self.warning_cooldown = ENERGY_WARNING_COOLDOWN_SECS;
            energy_strained = true;
        }

        TickOutcome {
            metrics,
            gains,
            elapsed_secs: elapsed,
            energy_strained,
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Grant the derived manual-action yields. Energy is capped.
    pub fn manual_action(&mut self) {
        let yields = self.state.effects.click_yield;
        for (kind, amount) in yields.iter() {
            if amount <= 0.0 {
                continue;
            }
            match kind {
                ResourceKind::Energy => {
                    let capped =
                        (self.state.resources[ResourceKind::Energy] + amount).min(ENERGY_STORAGE_CAP);
                    self.state.resources.set(ResourceKind::Energy, capped);
                }
                _ => self.state.resources.add(kind, amount),
            }
        }
    }

    /// Buy one unit of a producer. Returns the cost paid.
    pub fn buy_producer(
        &mut self,
        id: ProducerId,
        now_ms: i64,
    ) -> Result<ResourceVec, PurchaseError> {
        let def = self
            .catalog
            .producer(id)
            .ok_or(PurchaseError::UnknownProducer(id))?;
        if !self.state.is_unlocked(def) {
            return Err(PurchaseError::Locked(def.key.clone()));
        }
        let cost = producer_cost(def, self.state.owned(id));
        if !self.state.can_afford(&cost) {
            return Err(PurchaseError::Unaffordable(def.key.clone()));
        }
        let name = def.name.clone();
        self.state.spend(&cost);
        self.state.increment_owned(id);
        self.state
            .log
            .push(format!("{name} deployed. Infrastructure scaling."), now_ms);
        Ok(cost)
    }

    /// Purchase a one-time upgrade and recompute derived effects.
    pub fn purchase_upgrade(&mut self, id: UpgradeId, now_ms: i64) -> Result<(), PurchaseError> {
        let def = self
            .catalog
            .upgrade(id)
            .ok_or(PurchaseError::UnknownUpgrade(id))?;
        if self.state.has_purchased(id) {
            return Err(PurchaseError::AlreadyPurchased(def.key.clone()));
        }
        if !self.state.can_afford(&def.cost) {
            return Err(PurchaseError::Unaffordable(def.key.clone()));
        }
        let cost = def.cost;
        let name = def.name.clone();
        self.state.spend(&cost);
        self.state.mark_purchased(id);
        self.recompute_effects();
        self.state
            .log
            .push(format!("{name} integrated into the command network."), now_ms);
        Ok(())
    }

    /// Wipe all progress back to new-game state.
    pub fn reset(&mut self, now_ms: i64) {
        self.state.reset(&self.catalog, now_ms);
        self.metrics = TickMetrics::default();
        self.warning_cooldown = 0.0;
        self.state
            .log
            .push("All systems reset. Fresh star harness initiated.", now_ms);
    }
}
