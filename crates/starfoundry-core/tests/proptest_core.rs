//! Property-based tests for the Starfoundry core engine.
//!
//! Uses proptest to generate random economies and tick schedules, then
//! verify the numeric invariants hold: bounded quantities, time-scale
//! invariance, idempotent effect recomputation, and exact persistence
//! round trips.

use proptest::prelude::*;
use starfoundry_core::engine::Engine;
use starfoundry_core::resource::{ENERGY_STORAGE_CAP, ResourceKind};
use starfoundry_core::save::{self, LoadOutcome, MemoryStore};
use starfoundry_core::test_utils::{engine_at, grant, set_owned};
use starfoundry_core::upgrade::Effects;

// ===========================================================================
// Generators
// ===========================================================================

/// Owned counts for (collector, reactor, lab, forge).
fn arb_counts() -> impl Strategy<Value = (u32, u32, u32, u32)> {
    (0..50u32, 0..20u32, 0..20u32, 0..5u32)
}

/// Starting resource quantities, kept far below the Energy storage cap so
/// cap clamping cannot mask divergence.
fn arb_resources() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.0..1e6f64, 0.0..1e6f64, 0.0..1e6f64)
}

/// Build an engine with the given counts and starting quantities.
fn build_engine(
    counts: (u32, u32, u32, u32),
    resources: (f64, f64, f64),
) -> Engine {
    let mut engine = engine_at(0);
    let ids = [
        engine.catalog().producer_id("collector").unwrap(),
        engine.catalog().producer_id("reactor").unwrap(),
        engine.catalog().producer_id("lab").unwrap(),
        engine.catalog().producer_id("forge").unwrap(),
    ];
    for (id, count) in ids.into_iter().zip([counts.0, counts.1, counts.2, counts.3]) {
        set_owned(&mut engine.state, id, count);
    }
    grant(&mut engine.state, ResourceKind::Stardust, resources.0);
    grant(&mut engine.state, ResourceKind::Energy, resources.1);
    grant(&mut engine.state, ResourceKind::Research, resources.2);
    engine
}

fn assert_rel_close(a: f64, b: f64) -> Result<(), TestCaseError> {
    let scale = 1.0f64.max(a.abs()).max(b.abs());
    prop_assert!(
        (a - b).abs() <= 1e-9 * scale,
        "diverged: {a} vs {b}"
    );
    Ok(())
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// One step of Δt equals two steps of Δt/2 up to rounding.
    #[test]
    fn tick_splitting_is_invariant(
        counts in arb_counts(),
        resources in arb_resources(),
        dt in 0.01..1_000.0f64,
    ) {
        let mut whole = build_engine(counts, resources);
        whole.apply_delta(dt);

        let mut split = build_engine(counts, resources);
        split.apply_delta(dt / 2.0);
        split.apply_delta(dt / 2.0);

        for kind in ResourceKind::ALL {
            assert_rel_close(whole.state.resources[kind], split.state.resources[kind])?;
        }
    }

    /// A zero-length delta changes nothing.
    #[test]
    fn zero_delta_changes_nothing(
        counts in arb_counts(),
        resources in arb_resources(),
    ) {
        let mut engine = build_engine(counts, resources);
        let before = engine.state.resources;
        engine.apply_delta(0.0);
        prop_assert_eq!(engine.state.resources, before);
    }

    /// Quantities stay within bounds across arbitrary tick schedules:
    /// nothing goes negative, Energy never exceeds its cap, and Stardust
    /// and Research never decrease.
    #[test]
    fn quantities_stay_bounded(
        counts in arb_counts(),
        resources in arb_resources(),
        steps in proptest::collection::vec(0.0..600.0f64, 1..30),
    ) {
        let mut engine = build_engine(counts, resources);
        let mut prev_stardust = engine.state.resources[ResourceKind::Stardust];
        let mut prev_research = engine.state.resources[ResourceKind::Research];
        for dt in steps {
            engine.apply_delta(dt);
            for kind in ResourceKind::ALL {
                prop_assert!(engine.state.resources[kind] >= 0.0);
            }
            prop_assert!(engine.state.resources[ResourceKind::Energy] <= ENERGY_STORAGE_CAP);
            prop_assert!(engine.state.resources[ResourceKind::Stardust] >= prev_stardust);
            prop_assert!(engine.state.resources[ResourceKind::Research] >= prev_research);
            prev_stardust = engine.state.resources[ResourceKind::Stardust];
            prev_research = engine.state.resources[ResourceKind::Research];
        }
    }

    /// The satisfaction ratio is always in [0, 1].
    #[test]
    fn energy_ratio_is_a_fraction(
        counts in arb_counts(),
        resources in arb_resources(),
        dt in 0.01..3_600.0f64,
    ) {
        let mut engine = build_engine(counts, resources);
        let (metrics, _) = engine.apply_delta(dt);
        prop_assert!((0.0..=1.0).contains(&metrics.energy_ratio));
    }

    /// Recomputing derived effects is idempotent and order-insensitive
    /// over any purchased subset.
    #[test]
    fn effect_recompute_is_idempotent(mask in 0u8..16) {
        let mut engine = engine_at(0);
        grant(&mut engine.state, ResourceKind::Research, 1e9);
        let keys = ["protocols", "collector_ai", "containment", "megastructure"];
        for (i, key) in keys.iter().enumerate() {
            if mask & (1 << i) != 0 {
                let id = engine.catalog().upgrade_id(key).unwrap();
                engine.purchase_upgrade(id, 0).unwrap();
            }
        }
        let once = engine.state.effects.clone();
        engine.recompute_effects();
        prop_assert_eq!(&engine.state.effects, &once);

        let again = Effects::recompute(engine.catalog(), engine.state.purchased(), 1.0);
        prop_assert_eq!(&again, &once);
    }

    /// A save/load round trip restores quantities and counts exactly.
    #[test]
    fn save_load_round_trip_is_exact(
        counts in arb_counts(),
        resources in arb_resources(),
        dt in 0.0..600.0f64,
    ) {
        let mut engine = build_engine(counts, resources);
        engine.apply_delta(dt);

        let mut store = MemoryStore::new();
        save::save(&engine, &mut store, 0).unwrap();

        let mut restored = engine_at(0);
        let report = save::load(&mut restored, &store, 0).unwrap();
        prop_assert_eq!(report.outcome, LoadOutcome::LoadedCurrent);
        prop_assert_eq!(restored.state.resources, engine.state.resources);
        for (id, _) in engine.catalog().producers() {
            prop_assert_eq!(restored.state.owned(id), engine.state.owned(id));
        }
    }
}
