//! Shared fixtures for unit, integration, and property tests.
//!
//! Gated behind the `test-utils` feature (enabled for the crate's own
//! tests via the dev-dependency on itself).

use crate::catalog::{Catalog, CatalogBuilder, EffectSpec, ProducerSpec, UpgradeSpec};
use crate::economy::EconomyState;
use crate::engine::Engine;
use crate::id::ProducerId;
use crate::resource::{ResourceKind, ResourceVec};

/// A small catalog exercising every mechanic: plain production, Energy
/// generation, upkeep-bearing production, a locked multi-output producer,
/// click bonuses, and both multiplier shapes.
pub fn mini_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    b.register_producer(ProducerSpec {
        key: "collector".into(),
        name: "Dust Collector".into(),
        base_cost: ResourceVec::of(ResourceKind::Stardust, 10.0),
        cost_growth: Some(1.15),
        outputs: ResourceVec::of(ResourceKind::Stardust, 0.1),
        ..Default::default()
    });
    b.register_producer(ProducerSpec {
        key: "reactor".into(),
        name: "Tri-Core Reactor".into(),
        base_cost: ResourceVec::of(ResourceKind::Stardust, 260.0),
        cost_growth: Some(1.19),
        outputs: ResourceVec::of(ResourceKind::Energy, 4.5),
        ..Default::default()
    });
    let mut lab_cost = ResourceVec::of(ResourceKind::Stardust, 720.0);
    lab_cost.set(ResourceKind::Energy, 140.0);
    b.register_producer(ProducerSpec {
        key: "lab".into(),
        name: "Research Lab".into(),
        base_cost: lab_cost,
        cost_growth: Some(1.21),
        outputs: ResourceVec::of(ResourceKind::Research, 1.8),
        energy_upkeep: 3.2,
        ..Default::default()
    });
    let mut forge_outputs = ResourceVec::of(ResourceKind::Stardust, 60.0);
    forge_outputs.set(ResourceKind::Energy, 1.0);
    b.register_producer(ProducerSpec {
        key: "forge".into(),
        name: "Aetherforge Spire".into(),
        base_cost: ResourceVec::of(ResourceKind::Stardust, 3400.0),
        cost_growth: Some(1.22),
        outputs: forge_outputs,
        energy_upkeep: 6.0,
        requires_upgrade: Some("megastructure".into()),
        ..Default::default()
    });
    b.register_upgrade(UpgradeSpec {
        key: "protocols".into(),
        name: "Precision Extraction Protocols".into(),
        cost: ResourceVec::of(ResourceKind::Research, 45.0),
        effects: vec![
            EffectSpec::ClickBonus {
                resource: ResourceKind::Stardust,
                amount: 2.0,
            },
            EffectSpec::ClickBonus {
                resource: ResourceKind::Energy,
                amount: 1.0,
            },
        ],
        ..Default::default()
    });
    b.register_upgrade(UpgradeSpec {
        key: "collector_ai".into(),
        name: "Collector Overseer AI".into(),
        cost: ResourceVec::of(ResourceKind::Research, 120.0),
        effects: vec![EffectSpec::ProducerMultiplier {
            producer: "collector".into(),
            factor: 1.5,
        }],
        ..Default::default()
    });
    b.register_upgrade(UpgradeSpec {
        key: "containment".into(),
        name: "Stellar Containment Grid".into(),
        cost: ResourceVec::of(ResourceKind::Research, 260.0),
        effects: vec![EffectSpec::GlobalMultiplier {
            resource: ResourceKind::Stardust,
            factor: 1.55,
        }],
        ..Default::default()
    });
    b.register_upgrade(UpgradeSpec {
        key: "megastructure".into(),
        name: "Aetherforge Megastructure".into(),
        cost: ResourceVec::of(ResourceKind::Research, 620.0),
        effects: vec![EffectSpec::GlobalMultiplier {
            resource: ResourceKind::Stardust,
            factor: 1.4,
        }],
        ..Default::default()
    });
    match b.build() {
        Ok(catalog) => catalog,
        Err(e) => panic!("mini_catalog must build: {e}"),
    }
}

/// An engine over [`mini_catalog`] with the given start timestamp.
pub fn engine_at(now_ms: i64) -> Engine {
    Engine::new(mini_catalog(), now_ms)
}

/// Add resources directly, bypassing production.
pub fn grant(state: &mut EconomyState, kind: ResourceKind, amount: f64) {
    state.resources.add(kind, amount);
}

/// Set a producer's owned count directly, bypassing purchase.
pub fn set_owned(state: &mut EconomyState, id: ProducerId, count: u32) {
    state.set_owned(id, count);
}
